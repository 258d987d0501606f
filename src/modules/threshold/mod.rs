mod erode;
mod hsv;

pub use erode::Erode;
pub use hsv::{rgb_to_hsv, HsvThreshold, Interval};

use crate::modules::Mask;
use image::Luma;

/// Flips every mask pixel between 0 and 255.
pub fn invert(mask: &mut Mask) {
	for p in mask.pixels_mut() {
		*p = Luma([255 - p.0[0]]);
	}
}
