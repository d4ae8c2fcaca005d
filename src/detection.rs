//! Object detection results.
//!
//! The actual detector lives in the external vision-task runtime (see [`crate::vision`]); this
//! module only defines the result types that flow through the rest of the pipeline.

use crate::rect::Rect;
use crate::render::{Align, Canvas, Color};
use crate::video::Resolution;
use crate::vision::Category;

/// The detections extracted from one video frame.
///
/// The runtime's output order is authoritative: it is preserved as-is and the pointing arbiter
/// uses it for first-match selection. Detections are never re-sorted by score.
#[derive(Debug, Clone, Default)]
pub struct Detections {
    vec: Vec<Detection>,
}

impl Detections {
    pub fn new() -> Self {
        Self { vec: Vec::new() }
    }

    pub fn push(&mut self, detection: Detection) {
        self.vec.push(detection);
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    /// Returns an iterator yielding the stored detections, in the runtime's order.
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.vec.iter()
    }

    /// Rescales all bounding boxes from the coordinate space of the producing frame into the
    /// display canvas space.
    pub fn rescale(&mut self, from: Resolution, to: Resolution) {
        let sx = to.width() as f32 / from.width() as f32;
        let sy = to.height() as f32 / from.height() as f32;
        for det in &mut self.vec {
            det.rect = det.rect.scale_axes(sx, sy);
        }
    }
}

impl FromIterator<Detection> for Detections {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        Self {
            vec: iter.into_iter().collect(),
        }
    }
}

/// A detected object: a bounding box plus its classification candidates.
#[derive(Debug, Clone)]
pub struct Detection {
    rect: Rect,
    categories: Vec<Category>,
}

impl Detection {
    /// Creates a detection.
    ///
    /// `categories` is ordered highest-confidence first, as produced by the runtime.
    ///
    /// # Panics
    ///
    /// Panics when `categories` is empty.
    pub fn new(rect: Rect, categories: Vec<Category>) -> Self {
        assert!(
            !categories.is_empty(),
            "detection must have at least one category",
        );
        Self { rect, categories }
    }

    /// Returns the axis-aligned bounding rectangle containing the detected object.
    #[inline]
    pub fn bounding_rect(&self) -> Rect {
        self.rect
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The highest-confidence category.
    #[inline]
    pub fn top_category(&self) -> &Category {
        &self.categories[0]
    }

    /// Draws the bounding box and the top category label onto the overlay canvas.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let top = self.top_category();
        canvas.rect(self.rect, Color::from_rgb8(250, 230, 140));
        canvas.text(
            self.rect.x() + 5.0,
            self.rect.y() - 10.0,
            15.0,
            Align::Left,
            &format!("{} ({:.2})", top.name(), top.score()),
            Color::WHITE,
        );
    }
}
