use crate::error::{Error, FrameError, Result};
use crate::modules::{Frame, InputModule};

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// Replays one image file at a fixed frame rate.
pub struct StillInput {
	frame: Frame,
	interval: Duration,
	last: Option<Instant>,
}

impl InputModule for StillInput {
	fn grab(&mut self) -> std::result::Result<Frame, FrameError> {
		if let Some(last) = self.last {
			let elapsed = last.elapsed();
			if elapsed < self.interval {
				thread::sleep(self.interval - elapsed);
			}
		}
		self.last = Some(Instant::now());
		Ok(self.frame.clone())
	}
}

impl StillInput {
	pub fn open(path: &Path, fps: u32) -> Result<Self> {
		let frame = image::open(path)
			.map_err(|source| Error::Image {
				path: path.to_path_buf(),
				source,
			})?
			.to_rgb8();
		Ok(Self::from_frame(frame, fps))
	}

	pub fn from_frame(frame: Frame, fps: u32) -> Self {
		Self {
			frame,
			interval: Duration::from_secs_f64(1. / f64::from(fps.max(1))),
			last: None,
		}
	}
}
