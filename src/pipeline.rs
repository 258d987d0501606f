//! The per-frame stage chain: HSV threshold, optional invert, erode, find
//! contours, filter contours, convex hulls, then the centroid estimate.
//!
//! One [`Pipeline`] type serves every target; the targets differ only in
//! their [`PipelineConfig`].

use crate::modules::centroid;
use crate::modules::contour::{self, ContourFinder, ContourMode};
use crate::modules::filter::{ShapeCriteria, ShapeFilter};
use crate::modules::threshold::{self, Erode, HsvThreshold, Interval};
use crate::modules::ThresholdModule;
use crate::modules::{Contour, Frame, Hull, Mask, TrackingResult};

use serde::{Deserialize, Serialize};

/// Tuning for one pipeline instance. Fixed for the life of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
	pub hue: Interval,
	pub saturation: Interval,
	pub value: Interval,
	/// Invert the threshold mask before eroding.
	pub invert: bool,
	pub erode_kernel: u32,
	pub erode_iterations: u32,
	pub contour_mode: ContourMode,
	pub filter: ShapeCriteria,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			hue: [0., 180.],
			saturation: [0., 255.],
			value: [0., 255.],
			invert: false,
			erode_kernel: 3,
			erode_iterations: 0,
			contour_mode: ContourMode::List,
			filter: ShapeCriteria::default(),
		}
	}
}

impl PipelineConfig {
	/// Orange ball.
	pub fn cargo() -> Self {
		Self {
			hue: [0., 47.512365169462136],
			saturation: [146.97851887981145, 255.],
			value: [137.69789253343086, 255.],
			erode_iterations: 1,
			filter: ShapeCriteria {
				min_area: 60.,
				min_vertices: 16.,
				..ShapeCriteria::default()
			},
			..Self::default()
		}
	}

	/// Yellow hatch panel.
	pub fn hatch() -> Self {
		Self {
			hue: [25.423728813559322, 180.],
			saturation: [163.27683615819208, 255.],
			value: [77.04776856480918, 255.],
			filter: ShapeCriteria {
				min_area: 25.,
				min_perimeter: 83.,
				min_width: 12.,
				min_height: 22.,
				..ShapeCriteria::default()
			},
			..Self::default()
		}
	}
}

/// A configured stage chain with its own intermediate buffers.
///
/// Buffers are overwritten on every [`process`](Self::process) call and can
/// be inspected afterwards.
pub struct Pipeline {
	invert: bool,
	threshold: HsvThreshold,
	erode: Erode,
	contours: ContourFinder,
	filter: ShapeFilter,

	threshold_output: Mask,
	erode_output: Mask,
	contours_output: Vec<Contour>,
	filter_output: Vec<Contour>,
	hulls_output: Vec<Hull>,
}

impl Pipeline {
	pub fn new(config: PipelineConfig) -> Self {
		Self {
			threshold: HsvThreshold::new(config.hue, config.saturation, config.value),
			erode: Erode::new(config.erode_kernel, config.erode_iterations),
			contours: ContourFinder::new(config.contour_mode),
			filter: ShapeFilter::new(config.filter),
			invert: config.invert,

			threshold_output: Mask::new(0, 0),
			erode_output: Mask::new(0, 0),
			contours_output: Vec::new(),
			filter_output: Vec::new(),
			hulls_output: Vec::new(),
		}
	}

	/// Runs every stage on `frame` and reduces the surviving hulls to one
	/// result. Deterministic: the same frame always gives the same result.
	pub fn process(&mut self, frame: &Frame) -> TrackingResult {
		self.threshold.run(frame, &mut self.threshold_output);
		if self.invert {
			threshold::invert(&mut self.threshold_output);
		}

		self.erode.run(&self.threshold_output, &mut self.erode_output);

		self.contours.run(&self.erode_output, &mut self.contours_output);

		// filter on the raw contour, estimate on its hull
		self.filter.filter_into(&self.contours_output, &mut self.filter_output);
		self.hulls_output.clear();
		self.hulls_output.extend(self.filter_output.iter().map(|cnt| contour::convex_hull(cnt)));

		centroid::estimate(&self.hulls_output)
	}

	pub fn threshold_output(&self) -> &Mask {
		&self.threshold_output
	}

	pub fn erode_output(&self) -> &Mask {
		&self.erode_output
	}

	pub fn contours(&self) -> &[Contour] {
		&self.contours_output
	}

	pub fn filtered_contours(&self) -> &[Contour] {
		&self.filter_output
	}

	pub fn hulls(&self) -> &[Hull] {
		&self.hulls_output
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::Rgb;

	// orange ball, roughly round
	fn cargo_frame() -> Frame {
		let mut frame = Frame::from_pixel(160, 120, Rgb([20, 30, 40]));
		for y in 0..120 {
			for x in 0..160 {
				let (dx, dy) = (x as i32 - 70, y as i32 - 60);
				if dx * dx + dy * dy <= 15 * 15 {
					frame.put_pixel(x, y, Rgb([255, 120, 0]));
				}
			}
		}
		frame
	}

	#[test]
	fn mask_matches_frame_size() {
		let mut pipeline = Pipeline::new(PipelineConfig::default());
		pipeline.process(&Frame::new(33, 17));
		assert_eq!(pipeline.threshold_output().dimensions(), (33, 17));
		assert_eq!(pipeline.erode_output().dimensions(), (33, 17));

		pipeline.process(&Frame::new(8, 64));
		assert_eq!(pipeline.erode_output().dimensions(), (8, 64));
	}

	#[test]
	fn cargo_tuning_finds_an_orange_ball() {
		let mut pipeline = Pipeline::new(PipelineConfig::cargo());
		let result = pipeline.process(&cargo_frame());

		assert!(result.found);
		assert!((result.center_x - 70.).abs() <= 1.);
		assert_eq!(pipeline.hulls().len(), 1);
		assert!(pipeline.filtered_contours()[0].len() >= 16);
	}

	#[test]
	fn hatch_tuning_ignores_the_ball() {
		let mut pipeline = Pipeline::new(PipelineConfig::hatch());
		assert_eq!(pipeline.process(&cargo_frame()), TrackingResult::missing());
	}

	#[test]
	fn invert_tracks_the_background() {
		// a dark frame with a bright bar; inverting selects everything but the bar
		let mut frame = Frame::from_pixel(60, 40, Rgb([0, 0, 0]));
		for y in 0..40 {
			for x in 25..35 {
				frame.put_pixel(x, y, Rgb([255, 255, 255]));
			}
		}
		let config = PipelineConfig {
			value: [200., 255.],
			invert: true,
			contour_mode: ContourMode::External,
			..PipelineConfig::default()
		};
		let mut pipeline = Pipeline::new(config);
		let result = pipeline.process(&frame);

		assert!(result.found);
		assert_eq!(pipeline.contours().len(), 2);
		assert_eq!(result.center_x, 29.5);
	}

	#[test]
	fn buffers_are_overwritten_each_frame() {
		let mut pipeline = Pipeline::new(PipelineConfig::cargo());
		pipeline.process(&cargo_frame());
		assert!(!pipeline.contours().is_empty());

		let result = pipeline.process(&Frame::new(160, 120));
		assert!(!result.found);
		assert!(pipeline.contours().is_empty());
		assert!(pipeline.hulls().is_empty());
	}

	#[test]
	fn inverted_regions_on_the_frame_edges_are_kept_apart() {
		// both sides of a centered bar touch the frame edge once inverted
		let mut frame = Frame::from_pixel(60, 40, Rgb([0, 0, 0]));
		for y in 0..40 {
			for x in 25..35 {
				frame.put_pixel(x, y, Rgb([255, 255, 255]));
			}
		}
		let config = PipelineConfig {
			value: [200., 255.],
			invert: true,
			contour_mode: ContourMode::External,
			..PipelineConfig::default()
		};
		let mut pipeline = Pipeline::new(config);
		pipeline.process(&frame);

		let mut extents: Vec<_> = pipeline
			.contours()
			.iter()
			.filter_map(|c| contour::bounding_rect(c))
			.map(|r| (r.x, r.width))
			.collect();
		extents.sort();
		assert_eq!(extents, vec![(0, 25), (35, 25)]);
	}
}
