//! Video frame plumbing.
//!
//! Frames are produced by a camera collaborator and handed to the vision-task runtime without
//! being inspected by this crate, so their pixel contents are opaque here. Only the frame's
//! [`Resolution`] is interpreted, to map detection output into canvas coordinates.

pub mod camera;

use std::{fmt, sync::Arc};

/// Resolution (width and height) of an image or canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Creates a new resolution.
    ///
    /// # Panics
    ///
    /// Panics when `width` or `height` are 0.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(
            width != 0 && height != 0,
            "attempted to create resolution with 0 area: {width}x{height}",
        );
        Self { width, height }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single camera frame.
///
/// The pixel data is an opaque byte buffer in whatever format the producing [`VideoSource`] and
/// the consuming vision-task runtime agreed on. Frames are cheap to clone.
///
/// [`VideoSource`]: camera::VideoSource
#[derive(Clone)]
pub struct Frame {
    resolution: Resolution,
    data: Arc<[u8]>,
}

impl Frame {
    pub fn new(resolution: Resolution, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            resolution,
            data: data.into(),
        }
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({}, {} bytes)", self.resolution, self.data.len())
    }
}
