//! Boundary extraction from binary masks.

mod geometry;

pub use geometry::{arc_length, area, bounding_rect, convex_hull, BoundingRect};

use crate::modules::{Contour, Mask};

use imageproc::contours::BorderType;
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Which boundaries a [`ContourFinder`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContourMode {
	/// Every boundary, holes included, with the hierarchy dropped.
	#[default]
	List,
	/// Only boundaries that no other region encloses.
	External,
}

/// Finds the boundaries of the foreground regions of a mask.
///
/// The mask is traced inside a one-pixel background frame, so regions
/// touching the image edge are closed off by it like any other region.
/// Straight horizontal, vertical and diagonal runs are collapsed to their
/// end points, so a filled rectangle yields four vertices.
#[derive(Debug, Clone)]
pub struct ContourFinder {
	mode: ContourMode,
	padded: Mask,
}

impl ContourFinder {
	pub fn new(mode: ContourMode) -> Self {
		Self {
			mode,
			padded: Mask::new(0, 0),
		}
	}

	/// Replaces the contents of `out` with the boundaries found in `mask`.
	pub fn run(&mut self, mask: &Mask, out: &mut Vec<Contour>) {
		out.clear();
		let (w, h) = mask.dimensions();
		if w == 0 || h == 0 {
			return;
		}

		// the frame is never written, so it stays background
		if self.padded.dimensions() != (w + 2, h + 2) {
			self.padded = Mask::new(w + 2, h + 2);
		}
		let (w, pw) = (w as usize, w as usize + 2);
		let padded: &mut [u8] = &mut self.padded;
		for (y, row) in mask.as_raw().chunks_exact(w).enumerate() {
			let start = (y + 1) * pw + 1;
			padded[start..start + w].copy_from_slice(row);
		}

		let mode = self.mode;
		let traced = imageproc::contours::find_contours::<i32>(&self.padded);
		out.extend(
			traced
				.into_iter()
				.filter(|c| match mode {
					ContourMode::List => true,
					ContourMode::External => matches!(c.border_type, BorderType::Outer) && c.parent.is_none(),
				})
				.map(|c| compress_runs(c.points.into_iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect()))
				.filter(|c| !c.is_empty()),
		);
	}
}

fn compress_runs(mut points: Vec<Point<i32>>) -> Contour {
	points.dedup();
	while points.len() > 1 && points.first() == points.last() {
		points.pop();
	}

	let n = points.len();
	if n < 3 {
		return points;
	}

	let step = |a: Point<i32>, b: Point<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());
	(0..n)
		.filter(|&i| {
			let prev = points[(i + n - 1) % n];
			let next = points[(i + 1) % n];
			step(prev, points[i]) != step(points[i], next)
		})
		.map(|i| points[i])
		.collect()
}
