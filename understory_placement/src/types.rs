// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for placement: preferences, resolved sides, styles, and the viewport.

use kurbo::{Size, Vec2};

/// Requested vertical side for the floating panel.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum VerticalPreference {
    /// Pick the side with room, preferring the previous side when it still fits.
    #[default]
    Auto,
    /// Always place the panel above the trigger.
    Above,
    /// Always place the panel below the trigger.
    Below,
}

/// Requested horizontal alignment for the floating panel.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HorizontalPreference {
    /// Pick the alignment that shows more of the panel.
    #[default]
    Auto,
    /// Align the left edges of panel and trigger.
    Left,
    /// Align the right edges of panel and trigger.
    Right,
    /// Center the panel on the trigger.
    Center,
}

/// Resolved vertical side.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VerticalPosition {
    /// Panel rests above the trigger.
    Above,
    /// Panel hangs below the trigger.
    Below,
}

impl VerticalPosition {
    /// Lowercase name, suitable for modifier class names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

impl From<VerticalPosition> for VerticalPreference {
    fn from(position: VerticalPosition) -> Self {
        match position {
            VerticalPosition::Above => Self::Above,
            VerticalPosition::Below => Self::Below,
        }
    }
}

/// Resolved horizontal alignment.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HorizontalPosition {
    /// Left edges aligned.
    #[default]
    Left,
    /// Right edges aligned.
    Right,
    /// Centered on the trigger.
    Center,
}

impl HorizontalPosition {
    /// Lowercase name, suitable for modifier class names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

impl From<HorizontalPosition> for HorizontalPreference {
    fn from(position: HorizontalPosition) -> Self {
        match position {
            HorizontalPosition::Left => Self::Left,
            HorizontalPosition::Right => Self::Right,
            HorizontalPosition::Center => Self::Center,
        }
    }
}

/// Horizontal offset of the panel, measured from exactly one page edge.
///
/// A style never carries both a left and a right offset; the enum makes the
/// other one unrepresentable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HorizontalAnchor {
    /// Distance from the left edge of the page.
    Left(f64),
    /// Distance from the right edge of the viewport.
    Right(f64),
}

impl HorizontalAnchor {
    /// The left offset, if anchored on the left.
    pub const fn left(self) -> Option<f64> {
        match self {
            Self::Left(v) => Some(v),
            Self::Right(_) => None,
        }
    }

    /// The right offset, if anchored on the right.
    pub const fn right(self) -> Option<f64> {
        match self {
            Self::Left(_) => None,
            Self::Right(v) => Some(v),
        }
    }
}

/// Style values to apply to the floating element, in page pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementStyle {
    /// Page-absolute top coordinate.
    pub top: f64,
    /// Left or right offset.
    pub anchor: HorizontalAnchor,
    /// Explicit width, emitted only when matching the trigger width.
    pub width: Option<f64>,
}

/// Output of [`calculate_position`](crate::calculate_position).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolvedPlacement {
    /// Chosen horizontal alignment.
    pub horizontal: HorizontalPosition,
    /// Chosen vertical side.
    pub vertical: VerticalPosition,
    /// Coordinates realizing the choice.
    pub style: PlacementStyle,
}

/// Output of [`calculate_in_place_position`](crate::calculate_in_place_position).
///
/// In-place panels flow with the document, so only the parts that differ from
/// normal flow are resolved. Every field may be absent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InPlacePlacement {
    /// Set only when the horizontal preference is `Auto`.
    pub horizontal: Option<HorizontalPosition>,
    /// Set only when the vertical preference is `Above`.
    pub vertical: Option<VerticalPosition>,
    /// Element-relative top offset; set together with `vertical`.
    pub top: Option<f64>,
}

/// Visible area and page scroll at calculation time.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Inner width and height of the viewport.
    pub size: Size,
    /// Page scroll offset (`x` = left, `y` = top).
    pub scroll: Vec2,
}

impl Viewport {
    /// A viewport of the given size with no scroll.
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            scroll: Vec2::ZERO,
        }
    }

    /// Returns a copy with the given page scroll offset.
    pub const fn with_scroll(mut self, left: f64, top: f64) -> Self {
        self.scroll = Vec2::new(left, top);
        self
    }
}

/// Inputs that steer a placement computation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PlacementOptions {
    /// Horizontal preference.
    pub horizontal: HorizontalPreference,
    /// Vertical preference.
    pub vertical: VerticalPreference,
    /// Force the panel to the trigger's width.
    pub match_trigger_width: bool,
    /// Horizontal alignment chosen by the previous computation in this open session.
    pub previous_horizontal: Option<HorizontalPosition>,
    /// Vertical side chosen by the previous computation in this open session.
    pub previous_vertical: Option<VerticalPosition>,
}
