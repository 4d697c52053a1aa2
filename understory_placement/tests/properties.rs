// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property checks for the placement calculators.

use kurbo::{Rect, Size};
use proptest::prelude::*;
use understory_placement::{
    HorizontalPosition, PlacementOptions, VerticalPosition, Viewport, calculate_position,
};

fn geometry() -> impl Strategy<Value = (Rect, Size, Viewport)> {
    (
        -200.0..1200.0_f64,
        -200.0..1200.0_f64,
        1.0..400.0_f64,
        1.0..100.0_f64,
        1.0..800.0_f64,
        1.0..800.0_f64,
        100.0..1600.0_f64,
        100.0..1200.0_f64,
        0.0..2000.0_f64,
    )
        .prop_map(|(x, y, tw, th, fw, fh, vw, vh, sy)| {
            (
                Rect::new(x, y, x + tw, y + th),
                Size::new(fw, fh),
                Viewport::new(vw, vh).with_scroll(0.0, sy),
            )
        })
}

fn previous_horizontal() -> impl Strategy<Value = Option<HorizontalPosition>> {
    prop_oneof![
        Just(None),
        Just(Some(HorizontalPosition::Left)),
        Just(Some(HorizontalPosition::Right)),
        Just(Some(HorizontalPosition::Center)),
    ]
}

proptest! {
    #[test]
    fn auto_placement_is_idempotent(
        (t, floating, viewport) in geometry(),
        previous in previous_horizontal(),
        match_width in any::<bool>(),
    ) {
        let options = PlacementOptions {
            previous_horizontal: previous,
            match_trigger_width: match_width,
            ..PlacementOptions::default()
        };
        let a = calculate_position(t, floating, viewport, &options);
        let b = calculate_position(t, floating, viewport, &options);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn feeding_back_the_result_is_stable(
        (t, floating, viewport) in geometry(),
    ) {
        let first = calculate_position(t, floating, viewport, &PlacementOptions::default());
        let options = PlacementOptions {
            previous_horizontal: Some(first.horizontal),
            previous_vertical: Some(first.vertical),
            ..PlacementOptions::default()
        };
        let second = calculate_position(t, floating, viewport, &options);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn below_stays_below_while_it_fits(
        (t, floating, viewport) in geometry(),
    ) {
        let options = PlacementOptions {
            previous_vertical: Some(VerticalPosition::Below),
            ..PlacementOptions::default()
        };
        let bottom = viewport.scroll.y + viewport.size.height;
        let room_below = t.y0 + viewport.scroll.y + t.height() + floating.height < bottom;
        let out = calculate_position(t, floating, viewport, &options);
        if room_below {
            prop_assert_eq!(out.vertical, VerticalPosition::Below);
        }
    }

    #[test]
    fn matched_width_equals_trigger_width(
        (t, floating, viewport) in geometry(),
    ) {
        let options = PlacementOptions {
            match_trigger_width: true,
            ..PlacementOptions::default()
        };
        let out = calculate_position(t, floating, viewport, &options);
        prop_assert_eq!(out.style.width, Some(t.width()));
    }

    #[test]
    fn anchor_side_follows_alignment(
        (t, floating, viewport) in geometry(),
        previous in previous_horizontal(),
    ) {
        let options = PlacementOptions {
            previous_horizontal: previous,
            ..PlacementOptions::default()
        };
        let out = calculate_position(t, floating, viewport, &options);
        let anchored_right = out.style.anchor.right().is_some();
        prop_assert_eq!(anchored_right, out.horizontal == HorizontalPosition::Right);
        prop_assert!(out.style.anchor.left().is_some() != anchored_right);
    }
}
