// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Show and hide transitions driven by marker classes.
//!
//! Showing tags the content with the *transitioning-in* class and, on the next
//! frame, waits for whatever animation the host is running on it before
//! swapping to *transitioned-in*. Hiding deep-copies the content, tags the
//! copy *transitioning-out*, and removes the copy once its animation has
//! finished. The real content is reset to *transitioning-in* and hidden at
//! once.
//!
//! The coordinator never sleeps or spawns: the host calls
//! [`AnimationCoordinator::frame`] once per animation frame and
//! [`AnimationCoordinator::animation_ended`] when an element's animation ends.

use crate::surface::Surface;

/// Marker class names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationClasses {
    /// Set while the show animation runs.
    pub transitioning_in: String,
    /// Set once the show animation finished.
    pub transitioned_in: String,
    /// Set on the exit copy while the hide animation runs.
    pub transitioning_out: String,
    /// Prefix of the placement modifiers, such as `<prefix>--above`.
    pub placement_prefix: String,
}

impl AnimationClasses {
    /// Modifier class for a resolved side or alignment, e.g. `"above"`.
    pub fn placement(&self, side: &str) -> String {
        format!("{}--{side}", self.placement_prefix)
    }
}

impl Default for AnimationClasses {
    fn default() -> Self {
        Self {
            transitioning_in: "understory-overlay--transitioning-in".into(),
            transitioned_in: "understory-overlay--transitioned-in".into(),
            transitioning_out: "understory-overlay--transitioning-out".into(),
            placement_prefix: "understory-overlay".into(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage {
    NextFrame,
    AnimationEnd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Finish {
    SwapIn,
    Remove,
}

#[derive(Copy, Clone, Debug)]
struct Wait<E> {
    element: E,
    stage: Stage,
    finish: Finish,
}

/// A transition that completed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Completed<E> {
    /// The element now carries the transitioned-in class.
    ShownIn(E),
    /// The exit copy was removed from the page.
    Removed(E),
}

/// Pending transitions of one overlay's content.
#[derive(Clone, Debug)]
pub struct AnimationCoordinator<E> {
    classes: AnimationClasses,
    waits: Vec<Wait<E>>,
}

impl<E: Copy + Eq> AnimationCoordinator<E> {
    /// Create a coordinator using the given class names.
    pub fn new(classes: AnimationClasses) -> Self {
        Self {
            classes,
            waits: Vec::new(),
        }
    }

    /// The class names in use.
    pub fn classes(&self) -> &AnimationClasses {
        &self.classes
    }

    /// Number of transitions still waiting.
    pub fn pending(&self) -> usize {
        self.waits.len()
    }

    /// Returns true when nothing is waiting.
    pub fn is_idle(&self) -> bool {
        self.waits.is_empty()
    }

    /// Start the show transition on `element`.
    pub fn begin_in<S>(&mut self, surface: &mut S, element: E)
    where
        S: Surface<Element = E>,
    {
        self.cancel(element);
        surface.remove_class(element, &self.classes.transitioned_in);
        surface.add_class(element, &self.classes.transitioning_in);
        self.waits.push(Wait {
            element,
            stage: Stage::NextFrame,
            finish: Finish::SwapIn,
        });
    }

    /// Start the hide transition for `element`.
    ///
    /// Returns the exit copy, or `None` when the host could not copy the
    /// element; in that case there is nothing to animate. The live element is
    /// put back into the transitioning-in state, ready for the next show, and
    /// hidden.
    pub fn begin_out<S>(&mut self, surface: &mut S, element: E) -> Option<E>
    where
        S: Surface<Element = E>,
    {
        self.cancel(element);
        let copy = surface.clone_element(element);
        if let Some(copy) = copy {
            surface.remove_class(copy, &self.classes.transitioned_in);
            surface.remove_class(copy, &self.classes.transitioning_in);
            surface.add_class(copy, &self.classes.transitioning_out);
            self.waits.push(Wait {
                element: copy,
                stage: Stage::NextFrame,
                finish: Finish::Remove,
            });
        }
        surface.remove_class(element, &self.classes.transitioned_in);
        surface.add_class(element, &self.classes.transitioning_in);
        surface.set_hidden(element, true);
        copy
    }

    /// Advance to a new animation frame.
    ///
    /// Transitions scheduled before this call check whether their element is
    /// animating: if so they wait for [`animation_ended`](Self::animation_ended),
    /// otherwise they complete now.
    pub fn frame<S>(&mut self, surface: &mut S) -> Vec<Completed<E>>
    where
        S: Surface<Element = E>,
    {
        let mut done = Vec::new();
        let mut waits = core::mem::take(&mut self.waits);
        waits.retain_mut(|w| {
            if w.stage != Stage::NextFrame {
                return true;
            }
            if surface.is_animating(w.element) {
                w.stage = Stage::AnimationEnd;
                return true;
            }
            done.push(self.complete(surface, *w));
            false
        });
        self.waits = waits;
        done
    }

    /// Report that the host finished animating `element`.
    pub fn animation_ended<S>(&mut self, surface: &mut S, element: E) -> Option<Completed<E>>
    where
        S: Surface<Element = E>,
    {
        let at = self
            .waits
            .iter()
            .position(|w| w.element == element && w.stage == Stage::AnimationEnd)?;
        let wait = self.waits.remove(at);
        Some(self.complete(surface, wait))
    }

    /// Drop the pending show transition of `element`, if any.
    pub fn cancel(&mut self, element: E) {
        self.waits
            .retain(|w| !(w.element == element && w.finish == Finish::SwapIn));
    }

    /// Complete every exit immediately and drop pending shows.
    pub fn flush<S>(&mut self, surface: &mut S)
    where
        S: Surface<Element = E>,
    {
        for w in core::mem::take(&mut self.waits) {
            if w.finish == Finish::Remove {
                surface.remove_element(w.element);
            }
        }
    }

    fn complete<S>(&self, surface: &mut S, wait: Wait<E>) -> Completed<E>
    where
        S: Surface<Element = E>,
    {
        match wait.finish {
            Finish::SwapIn => {
                surface.remove_class(wait.element, &self.classes.transitioning_in);
                surface.add_class(wait.element, &self.classes.transitioned_in);
                Completed::ShownIn(wait.element)
            }
            Finish::Remove => {
                surface.remove_element(wait.element);
                Completed::Removed(wait.element)
            }
        }
    }
}

impl<E: Copy + Eq> Default for AnimationCoordinator<E> {
    fn default() -> Self {
        Self::new(AnimationClasses::default())
    }
}
