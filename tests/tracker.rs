use ferrotrack::modules::input::LatestFrame;
use ferrotrack::modules::output::ResultTable;
use ferrotrack::modules::{FrameSource, OutputModule};
use ferrotrack::{Frame, FrameError, Pipeline, PipelineConfig, Tracker, TrackerState, TrackingResult};

use image::Rgb;
use parking_lot::Mutex;

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct Recorder {
	published: Mutex<Vec<(String, TrackingResult)>>,
}

impl OutputModule for Recorder {
	fn publish(&self, key_prefix: &str, result: &TrackingResult) {
		self.published.lock().push((key_prefix.to_string(), *result));
	}
}

impl Recorder {
	fn results(&self, prefix: &str) -> Vec<TrackingResult> {
		self.published
			.lock()
			.iter()
			.filter(|(p, _)| p == prefix)
			.map(|(_, r)| *r)
			.collect()
	}
}

/// Hands out a fixed list of frames, then fails.
struct Scripted(VecDeque<Arc<Frame>>);

impl FrameSource for Scripted {
	fn next_frame(&mut self) -> Result<Arc<Frame>, FrameError> {
		self.0
			.pop_front()
			.ok_or_else(|| FrameError::Disconnected("script exhausted".to_string()))
	}
}

/// Repeats one frame forever.
struct Endless(Arc<Frame>);

impl FrameSource for Endless {
	fn next_frame(&mut self) -> Result<Arc<Frame>, FrameError> {
		thread::sleep(Duration::from_millis(1));
		Ok(Arc::clone(&self.0))
	}
}

fn blank() -> Frame {
	Frame::new(64, 48)
}

// red block on the left, blue block on the right
fn two_targets() -> Frame {
	let mut frame = Frame::from_pixel(120, 60, Rgb([10, 10, 10]));
	for y in 10..40 {
		for x in 10..30 {
			frame.put_pixel(x, y, Rgb([240, 10, 10]));
		}
		for x in 80..110 {
			frame.put_pixel(x, y, Rgb([10, 10, 240]));
		}
	}
	frame
}

fn red() -> PipelineConfig {
	PipelineConfig {
		hue: [0., 10.],
		saturation: [200., 255.],
		value: [200., 255.],
		..PipelineConfig::default()
	}
}

fn blue() -> PipelineConfig {
	PipelineConfig {
		hue: [110., 130.],
		..red()
	}
}

fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
	let start = Instant::now();
	while start.elapsed() < timeout {
		if done() {
			return true;
		}
		thread::sleep(Duration::from_millis(5));
	}
	done()
}

#[test]
fn publishes_once_per_frame_then_fails_on_fault() {
	let recorder = Arc::new(Recorder::default());
	let frames = vec![Arc::new(two_targets()), Arc::new(blank()), Arc::new(two_targets())];
	let tracker = Tracker::new("cargo", Pipeline::new(red()), Scripted(frames.into()), recorder.clone());

	let handle = tracker.spawn().unwrap();
	assert_eq!(handle.join(), TrackerState::Failed);

	let results = recorder.results("cargo");
	assert_eq!(results.len(), 3);
	assert_eq!(results[0], TrackingResult::found(19.5));
	assert_eq!(results[1], TrackingResult::missing());
	assert_eq!(results[2], TrackingResult::found(19.5));
}

#[test]
fn stop_exits_at_iteration_boundary() {
	let recorder = Arc::new(Recorder::default());
	let tracker = Tracker::new("hatch", Pipeline::new(blue()), Endless(Arc::new(two_targets())), recorder.clone());
	let handle = tracker.spawn().unwrap();

	assert!(wait_until(Duration::from_secs(5), || recorder.results("hatch").len() >= 3));
	assert_eq!(handle.state(), TrackerState::Running);

	handle.stop();
	assert_eq!(handle.join(), TrackerState::Stopped);

	let results = recorder.results("hatch");
	assert!(results.iter().all(|r| *r == TrackingResult::found(94.5)));
}

#[test]
fn stop_while_waiting_for_a_frame() {
	let latest = LatestFrame::new();
	let table = ResultTable::new();
	let tracker = Tracker::new("cargo", Pipeline::new(red()), latest.reader(), Arc::new(table.clone()));
	let handle = tracker.spawn().unwrap();

	assert!(wait_until(Duration::from_secs(5), || handle.state() == TrackerState::Running));
	handle.stop();
	latest.close();

	assert_eq!(handle.join(), TrackerState::Stopped);
	assert_eq!(table.result("cargo"), None);
}

#[test]
fn closing_the_source_without_stop_is_a_failure() {
	let latest = LatestFrame::new();
	let tracker = Tracker::new("cargo", Pipeline::new(red()), latest.reader(), Arc::new(ResultTable::new()));
	let handle = tracker.spawn().unwrap();

	latest.fault("camera unplugged");
	assert_eq!(handle.join(), TrackerState::Failed);
}

#[test]
fn two_trackers_share_one_source() {
	let latest = LatestFrame::new();
	let table = ResultTable::new();
	let output: Arc<dyn OutputModule> = Arc::new(table.clone());

	let cargo = Tracker::new("cargo", Pipeline::new(red()), latest.reader(), Arc::clone(&output))
		.spawn()
		.unwrap();
	let hatch = Tracker::new("hatch", Pipeline::new(blue()), latest.reader(), output).spawn().unwrap();
	assert_eq!(cargo.name(), "cargo");
	assert_eq!(hatch.name(), "hatch");

	let producer = {
		let latest = latest.clone();
		thread::spawn(move || {
			while latest.is_open() {
				latest.push(two_targets());
				thread::sleep(Duration::from_millis(2));
			}
		})
	};

	assert!(wait_until(Duration::from_secs(5), || {
		table.result("cargo").is_some() && table.result("hatch").is_some()
	}));
	assert_eq!(table.result("cargo"), Some(TrackingResult::found(19.5)));
	assert_eq!(table.result("hatch"), Some(TrackingResult::found(94.5)));

	cargo.stop();
	hatch.stop();
	latest.close();
	assert_eq!(cargo.join(), TrackerState::Stopped);
	assert_eq!(hatch.join(), TrackerState::Stopped);
	producer.join().unwrap();
}

#[test]
fn one_failure_leaves_the_other_running() {
	let recorder = Arc::new(Recorder::default());
	let failing = Tracker::new("cargo", Pipeline::new(red()), Scripted(VecDeque::new()), recorder.clone())
		.spawn()
		.unwrap();
	let healthy = Tracker::new("hatch", Pipeline::new(blue()), Endless(Arc::new(two_targets())), recorder.clone())
		.spawn()
		.unwrap();

	assert!(wait_until(Duration::from_secs(5), || failing.is_finished()));
	assert_eq!(failing.state(), TrackerState::Failed);
	assert!(!healthy.is_finished());
	assert_eq!(failing.join(), TrackerState::Failed);
	assert!(recorder.results("cargo").is_empty());

	let before = recorder.results("hatch").len();
	assert!(wait_until(Duration::from_secs(5), || recorder.results("hatch").len() > before));
	assert_eq!(healthy.state(), TrackerState::Running);

	healthy.stop();
	assert_eq!(healthy.join(), TrackerState::Stopped);
}
