//! Rectangle types.
//!
//! These are used for detection bounding boxes and the canvas-space
//! containment checks of the pointing arbiter.

use std::fmt;

/// An axis-aligned rectangle in canvas coordinates.
///
/// Rectangles are allowed to have zero height and/or width. Negative dimensions are not allowed.
/// The Y axis points down, as on a canvas: [`Rect::bottom`] returns the *largest* Y coordinate
/// covered by the rectangle.
#[derive(Clone, Copy, PartialEq)]
pub struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Rect {
    /// Creates a rectangle extending downwards and right from a point.
    #[inline]
    pub fn from_top_left(top_left_x: f32, top_left_y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0, "width={width}, height={height}");
        Self {
            x: top_left_x,
            y: top_left_y,
            w: width,
            h: height,
        }
    }

    /// Creates a rectangle extending outwards from a center point.
    #[inline]
    pub fn from_center(x_center: f32, y_center: f32, width: f32, height: f32) -> Self {
        Self::from_top_left(x_center - width * 0.5, y_center - height * 0.5, width, height)
    }

    /// Returns the X coordinate of the left side of the rectangle.
    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Returns the Y coordinate of the top side of the rectangle.
    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.w
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.h
    }

    /// Returns the X coordinate of the right side of the rectangle.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Returns the Y coordinate of the bottom side of the rectangle (the largest covered Y).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Scales position and size by per-axis factors.
    ///
    /// This maps a rectangle from one coordinate space into another one anchored at the same
    /// origin (eg. from video frame pixels into canvas pixels).
    #[must_use]
    pub fn scale_axes(&self, sx: f32, sy: f32) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
            w: self.w * sx,
            h: self.h * sy,
        }
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect @ ({},{}), size {}x{}",
            self.x, self.y, self.w, self.h
        )
    }
}
