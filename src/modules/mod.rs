pub mod input;
pub mod threshold;
pub mod contour;
pub mod filter;
pub mod centroid;
pub mod output;

use std::sync::Arc;

use image::{GrayImage, RgbImage};
use imageproc::point::Point;

use crate::error::FrameError;

/// 8-bit, 3-channel color image in RGB order.
pub type Frame = RgbImage;

/// Single-channel binary image; every pixel is 0 or 255.
pub type Mask = GrayImage;

/// Closed polygon boundary, in extraction order.
pub type Contour = Vec<Point<i32>>;

/// Convex hull of a contour, same representation as [`Contour`].
pub type Hull = Contour;

/// Outcome of one pipeline iteration.
///
/// `center_x` is [`TrackingResult::NOT_FOUND_X`] when nothing was found;
/// consumers must check `found` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingResult {
	pub found: bool,
	pub center_x: f64,
}

impl TrackingResult {
	pub const NOT_FOUND_X: f64 = -1.;

	pub fn found(center_x: f64) -> Self {
		Self {
			found: true,
			center_x,
		}
	}

	pub fn missing() -> Self {
		Self {
			found: false,
			center_x: Self::NOT_FOUND_X,
		}
	}
}

/// Produces raw frames from a device or file.
pub trait InputModule: Send {
	fn grab(&mut self) -> Result<Frame, FrameError>;
}

/// Hands a worker the most recent frame, blocking until one is available.
pub trait FrameSource: Send {
	fn next_frame(&mut self) -> Result<Arc<Frame>, FrameError>;
}

pub trait ThresholdModule {
	fn run(&self, frame: &Frame, mask: &mut Mask);
}

pub trait FilterModule {
	fn run(&self, contour: &Contour) -> bool;
}

pub trait OutputModule: Send + Sync {
	fn publish(&self, key_prefix: &str, result: &TrackingResult);
}
