// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Environment watching: which page changes should trigger a reposition.
//!
//! An [`EnvironmentWatcher`] holds the subscriptions of one open overlay.
//! Floating panels relocated to the outlet follow scroll, resize and
//! orientation changes as well as mutations inside their content. In-place
//! panels flow with the page, so only an in-place panel resolved *above* its
//! trigger needs to watch its content, to keep resting on top of the trigger
//! as the content grows or shrinks.
//!
//! Mutation notifications come from one of two [`MutationSource`]s chosen once
//! when the watcher is built, see [`MutationStrategy`].

use std::fmt;

use understory_placement::VerticalPosition;

/// Change to the child list somewhere inside the observed content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MutationRecord {
    /// Number of nodes added.
    pub added: usize,
    /// Number of nodes removed.
    pub removed: usize,
}

/// A mutation notification, in either delivery style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationEvent {
    /// A batch of records from a native observer.
    Records(Vec<MutationRecord>),
    /// Legacy single-node insertion event.
    NodeInserted,
    /// Legacy single-node removal event.
    NodeRemoved,
}

/// Something happened to the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvironmentEvent {
    /// The page scrolled.
    Scroll,
    /// The viewport was resized.
    Resize,
    /// The device orientation changed.
    OrientationChange,
    /// The content's subtree changed.
    Mutation(MutationEvent),
}

/// How mutation notifications are delivered on this host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MutationStrategy {
    /// Batched records from a native mutation observer.
    #[default]
    Observer,
    /// Per-node insertion and removal events, for hosts without an observer.
    LegacyEvents,
}

impl MutationStrategy {
    /// Build the source for this strategy.
    pub fn source(self) -> Box<dyn MutationSource> {
        match self {
            Self::Observer => Box::new(ObserverSource::default()),
            Self::LegacyEvents => Box::new(LegacyEventSource::default()),
        }
    }
}

/// A subscription to mutations inside the floating content.
pub trait MutationSource: fmt::Debug {
    /// Begin observing.
    fn start(&mut self);
    /// Stop observing. Safe to call when not observing.
    fn stop(&mut self);
    /// Returns true while observing.
    fn is_active(&self) -> bool;
    /// Returns true if `event` should trigger a reposition.
    fn wants_reposition(&self, event: &MutationEvent) -> bool;
}

/// Native observer: reacts when the first record of a batch adds or removes
/// nodes.
#[derive(Debug, Default)]
pub struct ObserverSource {
    active: bool,
}

impl MutationSource for ObserverSource {
    fn start(&mut self) {
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn wants_reposition(&self, event: &MutationEvent) -> bool {
        match event {
            MutationEvent::Records(records) => {
                self.active
                    && records
                        .first()
                        .is_some_and(|r| r.added > 0 || r.removed > 0)
            }
            _ => false,
        }
    }
}

/// Legacy insertion/removal events.
#[derive(Debug, Default)]
pub struct LegacyEventSource {
    active: bool,
}

impl MutationSource for LegacyEventSource {
    fn start(&mut self) {
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn wants_reposition(&self, event: &MutationEvent) -> bool {
        self.active
            && matches!(
                event,
                MutationEvent::NodeInserted | MutationEvent::NodeRemoved
            )
    }
}

/// Subscriptions held by one overlay while it is open.
#[derive(Debug)]
pub struct EnvironmentWatcher {
    viewport: bool,
    mutations: Box<dyn MutationSource>,
}

impl EnvironmentWatcher {
    /// Create an idle watcher using the given mutation strategy.
    pub fn new(strategy: MutationStrategy) -> Self {
        Self {
            viewport: false,
            mutations: strategy.source(),
        }
    }

    /// Subscribe for an open overlay, replacing earlier subscriptions.
    ///
    /// `vertical` is the side resolved by the latest reposition, if any.
    pub fn subscribe(&mut self, render_in_place: bool, vertical: Option<VerticalPosition>) {
        self.viewport = !render_in_place;
        if !render_in_place || vertical == Some(VerticalPosition::Above) {
            self.mutations.start();
        } else {
            self.mutations.stop();
        }
    }

    /// Drop every subscription. Idempotent.
    pub fn unsubscribe(&mut self) {
        self.viewport = false;
        self.mutations.stop();
    }

    /// Returns true while scroll, resize and orientation events are followed.
    pub fn is_watching_viewport(&self) -> bool {
        self.viewport
    }

    /// Returns true while content mutations are followed.
    pub fn is_watching_mutations(&self) -> bool {
        self.mutations.is_active()
    }

    /// Returns true if any subscription is held.
    pub fn is_subscribed(&self) -> bool {
        self.viewport || self.mutations.is_active()
    }

    /// Returns true if `event` should trigger a reposition.
    pub fn wants_reposition(&self, event: &EnvironmentEvent) -> bool {
        match event {
            EnvironmentEvent::Scroll
            | EnvironmentEvent::Resize
            | EnvironmentEvent::OrientationChange => self.viewport,
            EnvironmentEvent::Mutation(m) => self.mutations.wants_reposition(m),
        }
    }
}

impl Default for EnvironmentWatcher {
    fn default() -> Self {
        Self::new(MutationStrategy::default())
    }
}
