use crate::modules::{Hull, TrackingResult};

use itertools::{Itertools, MinMaxResult};

/// Reduces the hulls of one frame to a single horizontal position.
///
/// The x extremes are pooled over every point of every hull and the result
/// is their midpoint. A target split into several blobs (partial occlusion)
/// still reports one position, but two genuinely separate same-colored
/// objects are merged as well, and a stray blob that survives filtering
/// drags the estimate toward it.
pub fn estimate(hulls: &[Hull]) -> TrackingResult {
	match hulls.iter().flatten().map(|p| p.x).minmax() {
		MinMaxResult::NoElements => TrackingResult::missing(),
		MinMaxResult::OneElement(x) => TrackingResult::found(f64::from(x)),
		MinMaxResult::MinMax(min, max) => TrackingResult::found((f64::from(min) + f64::from(max)) / 2.),
	}
}
