//! Tracking loop: one worker thread per pipeline.
//!
//! ```text
//! Idle -> Running -> Stopped   (stop requested)
//!                 -> Failed    (frame acquisition fault)
//! ```
//!
//! A worker pulls a frame, runs its pipeline and publishes the result, one
//! iteration at a time. A miss is published like any other result. A stop
//! request is honoured between iterations, never in the middle of one.

use crate::error::Result;
use crate::modules::{FrameSource, OutputModule};
use crate::pipeline::Pipeline;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const FPS_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
	Idle,
	Running,
	Stopped,
	Failed,
}

struct Control {
	stop: AtomicBool,
	state: Mutex<TrackerState>,
}

impl Control {
	fn stop_requested(&self) -> bool {
		self.stop.load(Ordering::Acquire)
	}

	fn set(&self, state: TrackerState) {
		*self.state.lock() = state;
	}
}

/// A pipeline bound to its frame source and publisher, ready to run.
pub struct Tracker<S> {
	name: String,
	pipeline: Pipeline,
	source: S,
	output: Arc<dyn OutputModule>,
}

impl<S> Tracker<S>
where
	S: FrameSource + 'static,
{
	/// `name` doubles as the key prefix results are published under.
	pub fn new(name: impl Into<String>, pipeline: Pipeline, source: S, output: Arc<dyn OutputModule>) -> Self {
		Self {
			name: name.into(),
			pipeline,
			source,
			output,
		}
	}

	/// Starts the loop on a dedicated thread named after the pipeline.
	pub fn spawn(self) -> Result<TrackerHandle> {
		let control = Arc::new(Control {
			stop: AtomicBool::new(false),
			state: Mutex::new(TrackerState::Idle),
		});

		let name = self.name.clone();
		let worker_control = Arc::clone(&control);
		let thread = thread::Builder::new()
			.name(format!("track-{}", name))
			.spawn(move || self.run(&worker_control))?;

		Ok(TrackerHandle { name, control, thread })
	}

	fn run(mut self, control: &Control) -> TrackerState {
		control.set(TrackerState::Running);
		info!(pipeline = %self.name, "tracking started");

		let mut frames = 0u32;
		let mut window = Instant::now();

		let state = loop {
			if control.stop_requested() {
				break TrackerState::Stopped;
			}

			let frame = match self.source.next_frame() {
				Ok(frame) => frame,
				Err(_) if control.stop_requested() => break TrackerState::Stopped,
				Err(e) => {
					error!(pipeline = %self.name, error = %e, "frame acquisition failed");
					break TrackerState::Failed;
				}
			};

			// stopped while waiting: drop the frame unprocessed
			if control.stop_requested() {
				break TrackerState::Stopped;
			}

			let result = self.pipeline.process(&frame);
			self.output.publish(&self.name, &result);

			// FPS
			frames += 1;
			let elapsed = window.elapsed();
			if elapsed >= FPS_WINDOW {
				debug!(pipeline = %self.name, fps = f64::from(frames) / elapsed.as_secs_f64(), "frame rate");
				frames = 0;
				window = Instant::now();
			}
		};

		control.set(state);
		info!(pipeline = %self.name, state = ?state, "tracking ended");
		state
	}
}

/// Owner's side of a running [`Tracker`].
pub struct TrackerHandle {
	name: String,
	control: Arc<Control>,
	thread: JoinHandle<TrackerState>,
}

impl TrackerHandle {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn state(&self) -> TrackerState {
		*self.control.state.lock()
	}

	/// Asks the worker to exit after its current iteration.
	///
	/// A worker blocked waiting for a frame only notices once the source
	/// delivers one or is closed.
	pub fn stop(&self) {
		self.control.stop.store(true, Ordering::Release);
	}

	pub fn is_finished(&self) -> bool {
		self.thread.is_finished()
	}

	/// Waits for the worker to exit. A panicked worker counts as failed.
	pub fn join(self) -> TrackerState {
		match self.thread.join() {
			Ok(state) => state,
			Err(_) => {
				error!(pipeline = %self.name, "tracking thread panicked");
				self.control.set(TrackerState::Failed);
				TrackerState::Failed
			}
		}
	}
}
