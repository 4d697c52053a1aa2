// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay configuration.

use understory_placement::{HorizontalPreference, VerticalPreference};

use crate::animate::AnimationClasses;
use crate::id::OverlayId;
use crate::watch::MutationStrategy;

/// Construction-time settings of an [`Overlay`](crate::Overlay).
///
/// Fill in what you need and take the rest from `Default`:
///
/// ```
/// use understory_overlay::{OverlayConfig, OverlayId};
/// use understory_placement::VerticalPreference;
///
/// let config = OverlayConfig {
///     id: Some(OverlayId::new("account-menu")),
///     vertical: VerticalPreference::Below,
///     ..Default::default()
/// };
/// assert!(!config.render_in_place);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OverlayConfig {
    /// Explicit id. When `None` one is taken from the global allocator.
    pub id: Option<OverlayId>,
    /// Keep the content in normal flow next to the trigger instead of the
    /// shared outlet.
    pub render_in_place: bool,
    /// Horizontal placement preference.
    pub horizontal: HorizontalPreference,
    /// Vertical placement preference.
    pub vertical: VerticalPreference,
    /// Give the content the trigger's width.
    pub match_trigger_width: bool,
    /// Listen for touch inputs when dismissing.
    pub touch_capable: bool,
    /// How content mutations are reported by the host.
    pub mutation_strategy: MutationStrategy,
    /// Marker classes used by the show and hide transitions.
    pub classes: AnimationClasses,
    /// Start disabled.
    pub disabled: bool,
    /// Overlay this one is nested in.
    ///
    /// Nesting is also discovered from the page when the trigger sits inside
    /// another overlay's content; this is only needed when it does not.
    pub parent: Option<OverlayId>,
}
