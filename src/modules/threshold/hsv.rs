use crate::modules::ThresholdModule;
use crate::modules::{Frame, Mask};

use image::Luma;

/// Closed interval `[min, max]`.
pub type Interval = [f64; 2];

/// Segments a frame by hue, saturation and value ranges.
///
/// Hue is in half-degree units (`0..=180`), saturation and value in `0..=255`,
/// the same domain the tuned thresholds were picked in.
#[derive(Debug, Clone, PartialEq)]
pub struct HsvThreshold {
	hue: Interval,
	saturation: Interval,
	value: Interval,
}

impl ThresholdModule for HsvThreshold {
	fn run(&self, frame: &Frame, mask: &mut Mask) {
		if mask.dimensions() != frame.dimensions() {
			*mask = Mask::new(frame.width(), frame.height());
		}

		for (src, dst) in frame.pixels().zip(mask.pixels_mut()) {
			let [h, s, v] = rgb_to_hsv(src.0);
			*dst = if self.contains(h, s, v) { Luma([255]) } else { Luma([0]) };
		}
	}
}

impl HsvThreshold {
	pub fn new(hue: Interval, saturation: Interval, value: Interval) -> Self {
		Self {
			hue,
			saturation,
			value,
		}
	}

	fn contains(&self, h: u8, s: u8, v: u8) -> bool {
		in_interval(&self.hue, h) && in_interval(&self.saturation, s) && in_interval(&self.value, v)
	}
}

fn in_interval(range: &Interval, x: u8) -> bool {
	let x = f64::from(x);
	range[0] <= x && x <= range[1]
}

/// Converts one 8-bit RGB pixel to 8-bit HSV with hue in `0..180`.
///
/// Rounds half up, so results agree with the usual 8-bit BGR-to-HSV tables.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
	let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
	let v = r.max(g).max(b);
	let diff = v - r.min(g).min(b);

	let s = if v == 0 { 0 } else { (255 * diff + v / 2) / v };

	let h = if diff == 0 {
		0
	} else {
		let num = if v == r {
			g - b
		} else if v == g {
			b - r + 2 * diff
		} else {
			r - g + 4 * diff
		};
		let h = (f64::from(num) * 30. / f64::from(diff) + 0.5).floor() as i32;
		if h < 0 { h + 180 } else { h }
	};

	[h as u8, s as u8, v as u8]
}
