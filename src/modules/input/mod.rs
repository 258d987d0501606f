mod latest;
mod still;
#[cfg(feature = "camera")]
mod picamera;

pub use latest::{FrameReader, LatestFrame};
pub use still::StillInput;
#[cfg(feature = "camera")]
pub use picamera::PiCameraInput;

use crate::error::Result;
use crate::modules::InputModule;

use tracing::{error, info};

use std::thread::{self, JoinHandle};

/// Runs `input` on its own thread, publishing every grabbed frame to
/// `latest` until it is closed. A failed grab faults `latest`, which in turn
/// fails every reader.
pub fn spawn_capture<I>(mut input: I, latest: LatestFrame, name: &str) -> Result<JoinHandle<()>>
where
	I: InputModule + 'static,
{
	let name = name.to_string();
	let handle = thread::Builder::new().name(format!("capture-{}", name)).spawn(move || {
		info!(input = %name, "capture started");
		while latest.is_open() {
			match input.grab() {
				Ok(frame) => latest.push(frame),
				Err(e) => {
					error!(input = %name, error = %e, "frame grab failed");
					latest.fault(e.to_string());
					break;
				}
			}
		}
		info!(input = %name, "capture stopped");
	})?;
	Ok(handle)
}
