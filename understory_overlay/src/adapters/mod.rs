// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host surfaces backed by other Understory crates.
//!
//! Enabled via feature flags so hosts with their own element model do not pull
//! them in.

#[cfg(feature = "box_tree_adapter")]
pub mod box_tree;
