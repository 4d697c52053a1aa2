// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay state machine.

use core::fmt;
use core::fmt::Debug;
use core::hash::Hash;
use core::task::{Context, Poll};

use futures::FutureExt;
use futures::task::noop_waker_ref;
use understory_placement::{
    DefaultPositioner, HorizontalPosition, HorizontalPreference, PlacementOptions, Positioner,
    VerticalPosition, VerticalPreference,
};

use crate::animate::{AnimationCoordinator, Completed};
use crate::config::OverlayConfig;
use crate::dismiss::{DismissalCoordinator, PointerInput, Verdict};
use crate::error::{GateError, RegistryError};
use crate::gate::{Gate, GateFuture, GateOutcome};
use crate::id::{IdAllocator, OverlayId, SequentialIds};
use crate::registry::SharedRegistry;
use crate::surface::{PositionChanges, Surface};
use crate::watch::{EnvironmentEvent, EnvironmentWatcher};

/// Outcome of an open or close request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The overlay is now open.
    Opened,
    /// The overlay is now closed.
    Closed,
    /// A gate is still deciding; drive it with [`Overlay::poll_gate`].
    Pending,
    /// A gate refused, or failed.
    Vetoed,
    /// Nothing to do: already in the requested state, disabled, destroyed,
    /// or another request is waiting on a gate.
    Ignored,
}

/// Notification for the host, drained with [`Overlay::take_events`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OverlayEvent {
    /// The overlay opened.
    Opened,
    /// The overlay closed.
    Closed,
    /// A reposition produced a new placement.
    PlacementChanged(PositionChanges),
}

/// Which page-level subscriptions an overlay currently holds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Listeners {
    /// Pointer-down capture for dismissal.
    pub dismissal: bool,
    /// Touch capture for dismissal.
    pub touch: bool,
    /// Scroll, resize and orientation.
    pub viewport: bool,
    /// Content mutations.
    pub mutations: bool,
}

impl Listeners {
    /// Returns true if any subscription is held.
    pub fn any(&self) -> bool {
        self.dismissal || self.touch || self.viewport || self.mutations
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum GateKind {
    Open,
    Close { skip_focus: bool },
}

struct PendingGate {
    kind: GateKind,
    future: GateFuture,
}

enum GateStep {
    Allowed,
    Denied,
    Waiting(GateFuture),
}

/// One dropdown or popover.
///
/// An overlay pairs a trigger element with floating content. It does not own
/// the page: every call that reads geometry or touches elements borrows a
/// [`Surface`]. Inputs and page changes are forwarded by the host through
/// [`handle_pointer`](Self::handle_pointer) and
/// [`handle_environment`](Self::handle_environment); animation progress
/// through [`frame`](Self::frame) and [`animation_ended`](Self::animation_ended).
pub struct Overlay<E: Copy + Eq + Hash + Debug> {
    id: OverlayId,
    registry: SharedRegistry<E>,
    trigger: E,
    content: Option<E>,
    outlet: E,
    render_in_place: bool,
    horizontal: HorizontalPreference,
    vertical: VerticalPreference,
    match_trigger_width: bool,
    positioner: Box<dyn Positioner>,
    open: bool,
    disabled: bool,
    destroyed: bool,
    previous_horizontal: Option<HorizontalPosition>,
    previous_vertical: Option<VerticalPosition>,
    current: Option<PositionChanges>,
    recorded_top: Option<f64>,
    before_open: Option<Gate>,
    before_close: Option<Gate>,
    pending: Option<PendingGate>,
    dismissal: DismissalCoordinator,
    watcher: EnvironmentWatcher,
    animation: AnimationCoordinator<E>,
    events: Vec<OverlayEvent>,
}

impl<E: Copy + Eq + Hash + Debug> fmt::Debug for Overlay<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("id", &self.id)
            .field("trigger", &self.trigger)
            .field("content", &self.content)
            .field("open", &self.open)
            .field("disabled", &self.disabled)
            .field("pending", &self.pending.as_ref().map(|p| p.kind))
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<E: Copy + Eq + Hash + Debug> Overlay<E> {
    /// Create a closed overlay for `trigger`, taking its id from the global
    /// allocator unless the config names one.
    pub fn new<S>(
        surface: &mut S,
        registry: SharedRegistry<E>,
        trigger: E,
        config: OverlayConfig,
    ) -> Result<Self, RegistryError>
    where
        S: Surface<Element = E>,
    {
        Self::with_allocator(surface, registry, trigger, config, SequentialIds::global())
    }

    /// Like [`new`](Self::new), with an explicit id allocator.
    pub fn with_allocator<S>(
        surface: &mut S,
        registry: SharedRegistry<E>,
        trigger: E,
        config: OverlayConfig,
        ids: &dyn IdAllocator,
    ) -> Result<Self, RegistryError>
    where
        S: Surface<Element = E>,
    {
        let id = config.id.unwrap_or_else(|| ids.allocate());
        registry
            .borrow_mut()
            .register(id.clone(), trigger, config.parent)?;
        let outlet = surface.ensure_outlet();
        tracing::debug!(overlay = %id, ?trigger, "overlay created");
        Ok(Self {
            id,
            registry,
            trigger,
            content: None,
            outlet,
            render_in_place: config.render_in_place,
            horizontal: config.horizontal,
            vertical: config.vertical,
            match_trigger_width: config.match_trigger_width,
            positioner: Box::new(DefaultPositioner),
            open: false,
            disabled: config.disabled,
            destroyed: false,
            previous_horizontal: None,
            previous_vertical: None,
            current: None,
            recorded_top: None,
            before_open: None,
            before_close: None,
            pending: None,
            dismissal: DismissalCoordinator::new(config.touch_capable),
            watcher: EnvironmentWatcher::new(config.mutation_strategy),
            animation: AnimationCoordinator::new(config.classes),
            events: Vec::new(),
        })
    }

    /// The overlay's id.
    pub fn id(&self) -> &OverlayId {
        &self.id
    }

    /// Id the floating content element should carry.
    pub fn content_id(&self) -> String {
        self.id.content_id()
    }

    /// The trigger element.
    pub fn trigger(&self) -> E {
        self.trigger
    }

    /// The mounted content element, if any.
    pub fn content(&self) -> Option<E> {
        self.content
    }

    /// The shared outlet that hosts relocated content.
    pub fn outlet(&self) -> E {
        self.outlet
    }

    /// Returns true if content stays next to the trigger.
    pub fn renders_in_place(&self) -> bool {
        self.render_in_place
    }

    /// Returns true while open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns true while disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns true while a gate is deciding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns true once [`destroy`](Self::destroy) ran.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The live placement. `None` while closed, and while open until the
    /// first successful reposition.
    pub fn current_placement(&self) -> Option<PositionChanges> {
        self.current
    }

    /// Horizontal alignment remembered for the next reposition.
    pub fn previous_horizontal(&self) -> Option<HorizontalPosition> {
        self.previous_horizontal
    }

    /// Vertical side remembered for the next reposition.
    pub fn previous_vertical(&self) -> Option<VerticalPosition> {
        self.previous_vertical
    }

    /// Subscriptions currently held.
    pub fn listeners(&self) -> Listeners {
        let dismissal = self.dismissal.is_active();
        Listeners {
            dismissal,
            touch: dismissal && self.dismissal.is_touch_capable(),
            viewport: self.watcher.is_watching_viewport(),
            mutations: self.watcher.is_watching_mutations(),
        }
    }

    /// Number of show or hide transitions still running.
    pub fn pending_animations(&self) -> usize {
        self.animation.pending()
    }

    /// Drain notifications in the order they were raised.
    pub fn take_events(&mut self) -> Vec<OverlayEvent> {
        core::mem::take(&mut self.events)
    }

    /// Gate consulted before opening.
    pub fn set_before_open(&mut self, gate: Option<Gate>) {
        self.before_open = gate;
    }

    /// Gate consulted before closing.
    pub fn set_before_close(&mut self, gate: Option<Gate>) {
        self.before_close = gate;
    }

    /// Change placement preferences. Applies from the next reposition.
    pub fn set_preferences(&mut self, horizontal: HorizontalPreference, vertical: VerticalPreference) {
        self.horizontal = horizontal;
        self.vertical = vertical;
    }

    /// Give the content the trigger's width. Applies from the next reposition.
    pub fn set_match_trigger_width(&mut self, matched: bool) {
        self.match_trigger_width = matched;
    }

    /// Replace the placement rules.
    pub fn set_positioner(&mut self, positioner: Box<dyn Positioner>) {
        self.positioner = positioner;
    }

    /// Report the content element appearing (`Some`) or going away (`None`).
    ///
    /// Content that appears while open is positioned, watched and animated in
    /// right away.
    pub fn set_content<S>(&mut self, surface: &mut S, content: Option<E>)
    where
        S: Surface<Element = E>,
    {
        if self.destroyed || self.content == content {
            return;
        }
        if let Some(old) = self.content {
            self.watcher.unsubscribe();
            self.animation.cancel(old);
        }
        self.content = content;
        self.registry.borrow_mut().set_content(&self.id, content);
        if self.open {
            if let Some(el) = content {
                self.recorded_top = None;
                self.mount(surface, el);
            }
        }
    }

    /// Request opening.
    pub fn open<S>(&mut self, surface: &mut S) -> Transition
    where
        S: Surface<Element = E>,
    {
        if self.destroyed || self.disabled || self.open || self.pending.is_some() {
            return Transition::Ignored;
        }
        match Self::run_gate(&self.id, self.before_open.as_mut()) {
            GateStep::Allowed => {
                self.finish_open(surface);
                Transition::Opened
            }
            GateStep::Denied => {
                tracing::debug!(overlay = %self.id, "open vetoed");
                Transition::Vetoed
            }
            GateStep::Waiting(future) => {
                self.pending = Some(PendingGate {
                    kind: GateKind::Open,
                    future,
                });
                Transition::Pending
            }
        }
    }

    /// Request closing. Focus returns to a focusable trigger unless
    /// `skip_focus` is set.
    pub fn close<S>(&mut self, surface: &mut S, skip_focus: bool) -> Transition
    where
        S: Surface<Element = E>,
    {
        if self.destroyed || self.disabled || !self.open || self.pending.is_some() {
            return Transition::Ignored;
        }
        match Self::run_gate(&self.id, self.before_close.as_mut()) {
            GateStep::Allowed => {
                self.finish_close(surface, skip_focus);
                Transition::Closed
            }
            GateStep::Denied => {
                tracing::debug!(overlay = %self.id, "close vetoed");
                Transition::Vetoed
            }
            GateStep::Waiting(future) => {
                self.pending = Some(PendingGate {
                    kind: GateKind::Close { skip_focus },
                    future,
                });
                Transition::Pending
            }
        }
    }

    /// Close if open, open otherwise.
    pub fn toggle<S>(&mut self, surface: &mut S) -> Transition
    where
        S: Surface<Element = E>,
    {
        if self.open {
            self.close(surface, false)
        } else {
            self.open(surface)
        }
    }

    /// The trigger was activated.
    pub fn trigger_clicked<S>(&mut self, surface: &mut S) -> Transition
    where
        S: Surface<Element = E>,
    {
        if self.disabled {
            return Transition::Ignored;
        }
        self.toggle(surface)
    }

    /// Disable the overlay, closing it at once.
    ///
    /// The close gate is not consulted, a pending gate is dropped, and focus
    /// stays where it is.
    pub fn disable<S>(&mut self, surface: &mut S)
    where
        S: Surface<Element = E>,
    {
        if self.destroyed {
            return;
        }
        self.disabled = true;
        if self.pending.take().is_some() {
            tracing::debug!(overlay = %self.id, "pending gate dropped by disable");
        }
        if self.open {
            self.finish_close(surface, true);
        }
    }

    /// Re-enable the overlay. Does not open it.
    pub fn enable(&mut self) {
        self.disabled = false;
    }

    /// Drive a pending gate.
    ///
    /// Returns `Ready(Transition::Ignored)` when nothing is pending. Hosts
    /// call this when the gate's waker fires; any executor works.
    pub fn poll_gate<S>(&mut self, cx: &mut Context<'_>, surface: &mut S) -> Poll<Transition>
    where
        S: Surface<Element = E>,
    {
        let Some(pending) = self.pending.as_mut() else {
            return Poll::Ready(Transition::Ignored);
        };
        let result = match pending.future.poll_unpin(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };
        let kind = pending.kind;
        self.pending = None;
        let allowed = Self::gate_allows(&self.id, result);
        Poll::Ready(match (kind, allowed) {
            (_, false) => {
                tracing::debug!(overlay = %self.id, ?kind, "transition vetoed");
                Transition::Vetoed
            }
            (GateKind::Open, true) => {
                self.finish_open(surface);
                Transition::Opened
            }
            (GateKind::Close { skip_focus }, true) => {
                self.finish_close(surface, skip_focus);
                Transition::Closed
            }
        })
    }

    /// Recompute and apply the placement.
    ///
    /// Returns `None` without changing anything when closed or when the
    /// trigger or content cannot be measured.
    pub fn reposition<S>(&mut self, surface: &mut S) -> Option<PositionChanges>
    where
        S: Surface<Element = E>,
    {
        if !self.open {
            return None;
        }
        let content = self.content?;
        let trigger_rect = surface.bounds(self.trigger)?;
        let floating = surface.bounds(content)?.size();
        let viewport = surface.viewport();
        let options = PlacementOptions {
            horizontal: self.horizontal,
            vertical: self.vertical,
            match_trigger_width: self.match_trigger_width,
            previous_horizontal: self.previous_horizontal,
            previous_vertical: self.previous_vertical,
        };
        let changes: PositionChanges = if self.render_in_place {
            self.positioner
                .position_in_place(trigger_rect, floating, viewport, &options)
                .into()
        } else {
            self.positioner
                .position(trigger_rect, floating, viewport, &options)
                .into()
        };

        // First placement since opening goes straight to the element so it
        // never paints at its default position.
        if changes.has_style() && self.recorded_top.is_none() {
            surface.apply_style(content, &changes);
        }
        self.recorded_top = changes.top;
        self.previous_horizontal = changes.horizontal;
        self.previous_vertical = changes.vertical;
        self.current = Some(changes);
        self.watcher.subscribe(self.render_in_place, changes.vertical);
        self.mark_sides(surface, content, Some(&changes));
        self.events.push(OverlayEvent::PlacementChanged(changes));
        tracing::trace!(overlay = %self.id, ?changes, "repositioned");
        Some(changes)
    }

    /// Forward a page-level pointer or touch input. Outside inputs close the
    /// overlay without restoring focus.
    pub fn handle_pointer<S>(&mut self, surface: &mut S, input: PointerInput<E>) -> Transition
    where
        S: Surface<Element = E>,
    {
        let verdict = {
            let registry = self.registry.borrow();
            self.dismissal.handle(input, &*surface, &*registry, &self.id)
        };
        match verdict {
            Verdict::Ignore => Transition::Ignored,
            Verdict::Dismiss => self.close(surface, true),
        }
    }

    /// Forward a page change. Returns the new placement when the change was
    /// one this overlay follows.
    pub fn handle_environment<S>(
        &mut self,
        surface: &mut S,
        event: &EnvironmentEvent,
    ) -> Option<PositionChanges>
    where
        S: Surface<Element = E>,
    {
        if !self.watcher.wants_reposition(event) {
            return None;
        }
        self.reposition(surface)
    }

    /// Advance animations by one frame.
    pub fn frame<S>(&mut self, surface: &mut S) -> Vec<Completed<E>>
    where
        S: Surface<Element = E>,
    {
        self.animation.frame(surface)
    }

    /// The host finished animating `element`.
    pub fn animation_ended<S>(&mut self, surface: &mut S, element: E) -> Option<Completed<E>>
    where
        S: Surface<Element = E>,
    {
        self.animation.animation_ended(surface, element)
    }

    /// Release every subscription and leave the registry. Safe to call more
    /// than once, and on overlays that never opened.
    pub fn destroy<S>(&mut self, surface: &mut S)
    where
        S: Surface<Element = E>,
    {
        if self.destroyed {
            return;
        }
        self.teardown_listeners();
        self.animation.flush(surface);
        self.pending = None;
        self.open = false;
        self.clear_placement();
        self.registry.borrow_mut().unregister(&self.id);
        self.destroyed = true;
        tracing::debug!(overlay = %self.id, "overlay destroyed");
    }

    fn run_gate(id: &OverlayId, gate: Option<&mut Gate>) -> GateStep {
        let Some(gate) = gate else {
            return GateStep::Allowed;
        };
        let allowed = match gate.evaluate() {
            GateOutcome::Ready(allowed) => allowed,
            GateOutcome::Deferred(mut future) => {
                let mut cx = Context::from_waker(noop_waker_ref());
                match future.poll_unpin(&mut cx) {
                    Poll::Ready(result) => Self::gate_allows(id, result),
                    Poll::Pending => return GateStep::Waiting(future),
                }
            }
        };
        if allowed {
            GateStep::Allowed
        } else {
            GateStep::Denied
        }
    }

    fn gate_allows(id: &OverlayId, result: Result<bool, GateError>) -> bool {
        match result {
            Ok(allowed) => allowed,
            Err(error) => {
                tracing::warn!(overlay = %id, %error, "gate failed; keeping current state");
                false
            }
        }
    }

    fn finish_open<S>(&mut self, surface: &mut S)
    where
        S: Surface<Element = E>,
    {
        self.open = true;
        self.clear_placement();
        self.registry.borrow_mut().set_open(&self.id, true);
        self.events.push(OverlayEvent::Opened);
        self.dismissal.activate();
        tracing::debug!(overlay = %self.id, "opened");
        if let Some(content) = self.content {
            self.mount(surface, content);
        }
    }

    fn mount<S>(&mut self, surface: &mut S, content: E)
    where
        S: Surface<Element = E>,
    {
        surface.set_hidden(content, false);
        if self.reposition(surface).is_none() {
            self.watcher.subscribe(self.render_in_place, None);
        }
        self.animation.begin_in(surface, content);
    }

    fn finish_close<S>(&mut self, surface: &mut S, skip_focus: bool)
    where
        S: Surface<Element = E>,
    {
        self.teardown_listeners();
        self.registry.borrow_mut().set_open(&self.id, false);
        if let Some(content) = self.content {
            self.animation.begin_out(surface, content);
            self.mark_sides(surface, content, None);
        }
        self.clear_placement();
        self.open = false;
        self.events.push(OverlayEvent::Closed);
        tracing::debug!(overlay = %self.id, skip_focus, "closed");
        if !skip_focus && surface.is_focusable(self.trigger) {
            surface.focus(self.trigger);
        }
    }

    /// Tag the content with modifier classes for its resolved side and
    /// alignment, dropping stale ones.
    fn mark_sides<S>(&self, surface: &mut S, content: E, changes: Option<&PositionChanges>)
    where
        S: Surface<Element = E>,
    {
        let vertical = changes.and_then(|c| c.vertical);
        let horizontal = changes.and_then(|c| c.horizontal);
        let sides = [
            (VerticalPosition::Above.as_str(), vertical == Some(VerticalPosition::Above)),
            (VerticalPosition::Below.as_str(), vertical == Some(VerticalPosition::Below)),
            (HorizontalPosition::Left.as_str(), horizontal == Some(HorizontalPosition::Left)),
            (HorizontalPosition::Right.as_str(), horizontal == Some(HorizontalPosition::Right)),
            (HorizontalPosition::Center.as_str(), horizontal == Some(HorizontalPosition::Center)),
        ];
        let classes = self.animation.classes();
        for (side, on) in sides {
            let class = classes.placement(side);
            if on {
                surface.add_class(content, &class);
            } else {
                surface.remove_class(content, &class);
            }
        }
    }

    fn teardown_listeners(&mut self) {
        self.dismissal.deactivate();
        self.watcher.unsubscribe();
    }

    fn clear_placement(&mut self) {
        self.previous_horizontal = None;
        self.previous_vertical = None;
        self.current = None;
        self.recorded_top = None;
    }
}

impl<E: Copy + Eq + Hash + Debug> Drop for Overlay<E> {
    fn drop(&mut self) {
        if self.destroyed {
            return;
        }
        if let Ok(mut registry) = self.registry.try_borrow_mut() {
            registry.unregister(&self.id);
        }
    }
}
