use crate::modules::Hull;

use imageproc::point::Point;

/// Axis-aligned bounds of a point set, counted in pixels (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingRect {
	pub x: i32,
	pub y: i32,
	pub width: i32,
	pub height: i32,
}

pub fn bounding_rect(points: &[Point<i32>]) -> Option<BoundingRect> {
	let first = points.first()?;
	let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
	for p in &points[1..] {
		min_x = min_x.min(p.x);
		max_x = max_x.max(p.x);
		min_y = min_y.min(p.y);
		max_y = max_y.max(p.y);
	}
	Some(BoundingRect {
		x: min_x,
		y: min_y,
		width: max_x - min_x + 1,
		height: max_y - min_y + 1,
	})
}

/// Unsigned area enclosed by the closed polygon `points`.
pub fn area(points: &[Point<i32>]) -> f64 {
	imageproc::geometry::contour_area(points)
}

/// Perimeter of the closed polygon `points`.
pub fn arc_length(points: &[Point<i32>]) -> f64 {
	imageproc::geometry::arc_length(points, true)
}

/// Smallest convex polygon containing `points`, without collinear vertices.
///
/// Fewer than three distinct points are returned as-is (sorted,
/// deduplicated); collinear input collapses to its two end points.
pub fn convex_hull(points: &[Point<i32>]) -> Hull {
	// the hull's angular sort needs distinct points
	let mut pts = points.to_vec();
	pts.sort_by_key(|p| (p.x, p.y));
	pts.dedup();
	if pts.len() < 3 {
		return pts;
	}
	imageproc::geometry::convex_hull(pts)
}

#[cfg(test)]
fn cross(o: Point<i32>, a: Point<i32>, b: Point<i32>) -> i64 {
	let (ox, oy) = (i64::from(o.x), i64::from(o.y));
	(i64::from(a.x) - ox) * (i64::from(b.y) - oy) - (i64::from(a.y) - oy) * (i64::from(b.x) - ox)
}
