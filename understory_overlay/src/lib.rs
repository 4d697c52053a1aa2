// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_overlay --heading-base-level=0

//! Understory Overlay: dropdown and popover lifecycle.
//!
//! An [`Overlay`] pairs a trigger element with floating content and takes care of everything
//! between "the user clicked the trigger" and "the panel is gone again":
//!
//! - Open and close requests, optionally guarded by [gates](gate) that may answer later.
//! - Placement through [`understory_placement`], recomputed whenever the page scrolls, resizes,
//!   or the content changes, with the very first placement written straight onto the element.
//! - Dismissal on outside pointer or touch input, aware of nested overlays and touch scrolling.
//! - Show and hide transitions driven by marker classes, with the exit played on a copy.
//!
//! ## Host integration
//!
//! The overlay never owns the page. Hosts implement [`Surface`] for their element model and lend
//! it to each call. With the default `box_tree_adapter` feature,
//! [`SceneSurface`](adapters::box_tree::SceneSurface) provides one over an Understory box tree.
//!
//! Everything is driven by the host's event loop:
//! - [`Overlay::trigger_clicked`], [`Overlay::open`], [`Overlay::close`], [`Overlay::toggle`].
//! - [`Overlay::handle_pointer`] for every page-level pointer or touch input.
//! - [`Overlay::handle_environment`] for scroll, resize, orientation and content mutations.
//! - [`Overlay::frame`] once per animation frame and [`Overlay::animation_ended`].
//! - [`Overlay::poll_gate`] when a deferred gate's waker fires.
//!
//! Notifications are queued and drained with [`Overlay::take_events`].
//!
//! Overlays on one page share an [`OverlayRegistry`]; that is how a click inside a child dropdown
//! is recognised as belonging to its parent.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_overlay::adapters::box_tree::SceneSurface;
//! use understory_overlay::{Overlay, OverlayConfig, OverlayEvent, OverlayRegistry, PointerInput, Transition};
//!
//! let mut page = SceneSurface::new(600.0, 800.0);
//! let trigger = page.insert(page.document(), Rect::new(20.0, 20.0, 120.0, 50.0));
//! let registry = OverlayRegistry::new_shared();
//!
//! let mut menu = Overlay::new(&mut page, registry.clone(), trigger, OverlayConfig::default()).unwrap();
//! let panel = page.insert(menu.outlet(), Rect::new(0.0, 0.0, 200.0, 120.0));
//! menu.set_content(&mut page, Some(panel));
//!
//! assert_eq!(menu.trigger_clicked(&mut page), Transition::Opened);
//! let placement = menu.current_placement().unwrap();
//! assert_eq!(placement.top, Some(50.0));
//!
//! // A press somewhere else on the page dismisses the menu.
//! let outside = page.insert(page.document(), Rect::new(400.0, 400.0, 500.0, 500.0));
//! assert_eq!(menu.handle_pointer(&mut page, PointerInput::pointer_down(outside)), Transition::Closed);
//! assert!(page.is_hidden(panel));
//! assert_eq!(
//!     menu.take_events(),
//!     vec![OverlayEvent::Opened, OverlayEvent::PlacementChanged(placement), OverlayEvent::Closed],
//! );
//! ```
//!
//! ## Logging
//!
//! Lifecycle transitions are reported through [`tracing`] at `debug` level, placement and
//! dismissal decisions at `trace`, and failing gates at `warn`. No subscriber is installed.

pub mod adapters;
pub mod animate;
pub mod config;
pub mod controller;
pub mod dismiss;
pub mod error;
pub mod gate;
pub mod id;
pub mod registry;
pub mod surface;
pub mod watch;

pub use animate::{AnimationClasses, AnimationCoordinator, Completed};
pub use config::OverlayConfig;
pub use controller::{Listeners, Overlay, OverlayEvent, Transition};
pub use dismiss::{DismissalCoordinator, PointerInput, PointerKind, Verdict};
pub use error::{GateError, RegistryError};
pub use gate::{Gate, GateFuture, GateOutcome};
pub use id::{IdAllocator, OverlayId, SequentialIds};
pub use registry::{OverlayEntry, OverlayRegistry, SharedRegistry};
pub use surface::{PositionChanges, Surface};
pub use watch::{
    EnvironmentEvent, EnvironmentWatcher, LegacyEventSource, MutationEvent, MutationRecord,
    MutationSource, MutationStrategy, ObserverSource,
};

pub use understory_placement as placement;
