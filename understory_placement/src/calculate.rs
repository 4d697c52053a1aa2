// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement calculators: page-absolute and in-place.

use kurbo::{Rect, Size};

use crate::types::{
    HorizontalAnchor, HorizontalPosition, HorizontalPreference, InPlacePlacement,
    PlacementOptions, PlacementStyle, ResolvedPlacement, VerticalPosition, VerticalPreference,
    Viewport,
};

/// Compute page-absolute coordinates for a floating panel rendered into a
/// detached top-level outlet.
///
/// `trigger` is the trigger's bounding box in viewport coordinates and
/// `floating` is the panel's natural size. The result is a pure function of
/// the inputs: calling it again with the same arguments returns the same
/// placement.
///
/// ## `Auto` resolution
///
/// Horizontally, the panel switches to right alignment only if it does not fit
/// left-aligned and strictly more of it would be visible right-aligned (and
/// symmetrically for left). Otherwise the previous alignment is kept.
///
/// Vertically, the panel only leaves its previous side when that side no
/// longer has room and the other side does. This keeps the panel from
/// flapping while the page scrolls.
pub fn calculate_position(
    trigger: Rect,
    floating: Size,
    viewport: Viewport,
    options: &PlacementOptions,
) -> ResolvedPlacement {
    let scroll = viewport.scroll;
    let viewport_width = viewport.size.width;
    let trigger_width = trigger.width();
    let trigger_height = trigger.height();

    let (floating_width, width) = if options.match_trigger_width {
        (trigger_width, Some(trigger_width))
    } else {
        (floating.width, None)
    };

    let horizontal = match options.horizontal {
        HorizontalPreference::Auto => auto_horizontal(
            trigger.x0,
            trigger_width,
            floating_width,
            viewport_width,
            options.previous_horizontal,
        ),
        HorizontalPreference::Left => HorizontalPosition::Left,
        HorizontalPreference::Right => HorizontalPosition::Right,
        HorizontalPreference::Center => HorizontalPosition::Center,
    };

    let trigger_left_with_scroll = trigger.x0 + scroll.x;
    let anchor = match horizontal {
        HorizontalPosition::Right => {
            HorizontalAnchor::Right(viewport_width - (trigger_left_with_scroll + trigger_width))
        }
        HorizontalPosition::Center => HorizontalAnchor::Left(
            trigger_left_with_scroll + (trigger_width - floating_width) / 2.0,
        ),
        HorizontalPosition::Left => HorizontalAnchor::Left(trigger_left_with_scroll),
    };

    let trigger_top_with_scroll = trigger.y0 + scroll.y;
    let vertical = match options.vertical {
        VerticalPreference::Above => VerticalPosition::Above,
        VerticalPreference::Below => VerticalPosition::Below,
        VerticalPreference::Auto => {
            let viewport_bottom = scroll.y + viewport.size.height;
            let room_below =
                trigger_top_with_scroll + trigger_height + floating.height < viewport_bottom;
            let room_above = trigger.y0 > floating.height;
            auto_vertical(options.previous_vertical, room_below, room_above)
        }
    };
    let top = match vertical {
        VerticalPosition::Above => trigger_top_with_scroll - floating.height,
        VerticalPosition::Below => trigger_top_with_scroll + trigger_height,
    };

    ResolvedPlacement {
        horizontal,
        vertical,
        style: PlacementStyle { top, anchor, width },
    }
}

/// Compute the partial placement for a panel rendered in normal flow next to
/// its trigger.
///
/// Horizontal alignment is resolved only for `Auto`: right-aligned when a
/// left-aligned panel would cross the viewport's right edge. A vertical side
/// and an element-relative `top` are produced only for an explicit `Above`;
/// normal flow already places the panel below.
pub fn calculate_in_place_position(
    trigger: Rect,
    floating: Size,
    viewport: Viewport,
    options: &PlacementOptions,
) -> InPlacePlacement {
    let mut out = InPlacePlacement::default();
    if options.horizontal == HorizontalPreference::Auto {
        let viewport_right = viewport.scroll.x + viewport.size.width;
        out.horizontal = Some(if trigger.x0 + floating.width > viewport_right {
            HorizontalPosition::Right
        } else {
            HorizontalPosition::Left
        });
    }
    if options.vertical == VerticalPreference::Above {
        out.vertical = Some(VerticalPosition::Above);
        out.top = Some(-floating.height);
    }
    out
}

/// Pixels of the panel that would be visible left-aligned and right-aligned.
fn visible_spans(
    trigger_left: f64,
    trigger_width: f64,
    floating_width: f64,
    viewport_width: f64,
) -> (f64, f64) {
    let trigger_right = trigger_left + trigger_width;
    let left = viewport_width.min(trigger_left + floating_width) - trigger_left.max(0.0);
    let right = viewport_width.min(trigger_right) - (trigger_right - floating_width).max(0.0);
    (left, right)
}

fn auto_horizontal(
    trigger_left: f64,
    trigger_width: f64,
    floating_width: f64,
    viewport_width: f64,
    previous: Option<HorizontalPosition>,
) -> HorizontalPosition {
    let (left_visible, right_visible) =
        visible_spans(trigger_left, trigger_width, floating_width, viewport_width);
    if floating_width > left_visible && right_visible > left_visible {
        HorizontalPosition::Right
    } else if floating_width > right_visible && left_visible > right_visible {
        HorizontalPosition::Left
    } else {
        previous.unwrap_or_default()
    }
}

fn auto_vertical(
    previous: Option<VerticalPosition>,
    room_below: bool,
    room_above: bool,
) -> VerticalPosition {
    match previous {
        Some(VerticalPosition::Below) if !room_below && room_above => VerticalPosition::Above,
        Some(VerticalPosition::Above) if !room_above && room_below => VerticalPosition::Below,
        Some(previous) => previous,
        None if room_below => VerticalPosition::Below,
        None => VerticalPosition::Above,
    }
}

/// A strategy for placing floating panels.
///
/// Overlays hold a positioner so that callers can swap in their own placement
/// rules; [`DefaultPositioner`] runs [`calculate_position`] and
/// [`calculate_in_place_position`].
pub trait Positioner {
    /// Page-absolute placement for a panel living in the shared outlet.
    fn position(
        &self,
        trigger: Rect,
        floating: Size,
        viewport: Viewport,
        options: &PlacementOptions,
    ) -> ResolvedPlacement;

    /// Partial placement for a panel rendered in place.
    fn position_in_place(
        &self,
        trigger: Rect,
        floating: Size,
        viewport: Viewport,
        options: &PlacementOptions,
    ) -> InPlacePlacement;
}

/// The built-in placement rules.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultPositioner;

impl Positioner for DefaultPositioner {
    fn position(
        &self,
        trigger: Rect,
        floating: Size,
        viewport: Viewport,
        options: &PlacementOptions,
    ) -> ResolvedPlacement {
        calculate_position(trigger, floating, viewport, options)
    }

    fn position_in_place(
        &self,
        trigger: Rect,
        floating: Size,
        viewport: Viewport,
        options: &PlacementOptions,
    ) -> InPlacePlacement {
        calculate_in_place_position(trigger, floating, viewport, options)
    }
}
