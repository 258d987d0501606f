use crate::modules::contour::{arc_length, area, bounding_rect, convex_hull};
use crate::modules::FilterModule;
use crate::modules::Contour;

use serde::{Deserialize, Serialize};

/// Geometric bounds a contour must meet to count as a target.
///
/// Every bound is inclusive. Solidity is `100 * area / hull_area`. Bounds
/// are not validated: a minimum above its maximum rejects everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeCriteria {
	pub min_area: f64,
	pub min_perimeter: f64,
	pub min_width: f64,
	pub max_width: f64,
	pub min_height: f64,
	pub max_height: f64,
	pub min_solidity: f64,
	pub max_solidity: f64,
	pub min_vertices: f64,
	pub max_vertices: f64,
	pub min_ratio: f64,
	pub max_ratio: f64,
}

impl Default for ShapeCriteria {
	fn default() -> Self {
		Self {
			min_area: 0.,
			min_perimeter: 0.,
			min_width: 0.,
			max_width: 1000.,
			min_height: 0.,
			max_height: 1000.,
			min_solidity: 0.,
			max_solidity: 100.,
			min_vertices: 0.,
			max_vertices: 1_000_000.,
			min_ratio: 0.,
			max_ratio: 1000.,
		}
	}
}

/// Keeps contours that satisfy all of a [`ShapeCriteria`] at once.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFilter {
	criteria: ShapeCriteria,
}

impl FilterModule for ShapeFilter {
	fn run(&self, contour: &Contour) -> bool {
		let c = &self.criteria;

		let bb = match bounding_rect(contour) {
			Some(bb) => bb,
			None => return false,
		};
		let width = f64::from(bb.width);
		let height = f64::from(bb.height);
		if !within(width, c.min_width, c.max_width) || !within(height, c.min_height, c.max_height) {
			return false;
		}

		let cnt_area = area(contour);
		if cnt_area < c.min_area || arc_length(contour) < c.min_perimeter {
			return false;
		}

		let hull_area = area(&convex_hull(contour));
		if hull_area <= 0. {
			return false;
		}
		if !within(100. * cnt_area / hull_area, c.min_solidity, c.max_solidity) {
			return false;
		}

		if !within(contour.len() as f64, c.min_vertices, c.max_vertices) {
			return false;
		}

		within(width / height, c.min_ratio, c.max_ratio)
	}
}

impl ShapeFilter {
	pub fn new(criteria: ShapeCriteria) -> Self {
		Self { criteria }
	}

	/// Copies the contours that pass into `out`, keeping their order.
	pub fn filter_into(&self, contours: &[Contour], out: &mut Vec<Contour>) {
		out.clear();
		out.extend(contours.iter().filter(|cnt| self.run(cnt)).cloned());
	}
}

fn within(x: f64, min: f64, max: f64) -> bool {
	min <= x && x <= max
}
