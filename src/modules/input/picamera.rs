use crate::config::InputSettings;
use crate::error::{Error, FrameError, Result};
use crate::modules::{Frame, InputModule};

use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{VideoCapture, CAP_ANY, CAP_PROP_FPS, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH};

use tracing::info;

pub struct PiCameraInput {
	cap: VideoCapture,
	bgr: Mat,
	rgb: Mat,
}

impl InputModule for PiCameraInput {
	fn grab(&mut self) -> std::result::Result<Frame, FrameError> {
		let read = self.cap.read(&mut self.bgr).map_err(disconnected)?;
		if !read || self.bgr.empty() {
			return Err(FrameError::Disconnected("camera returned no frame".to_string()));
		}

		imgproc::cvt_color(&self.bgr, &mut self.rgb, imgproc::COLOR_BGR2RGB, 0).map_err(disconnected)?;
		let size = self.rgb.size().map_err(disconnected)?;
		let data = self.rgb.data_bytes().map_err(disconnected)?.to_vec();

		Frame::from_raw(size.width as u32, size.height as u32, data)
			.ok_or_else(|| FrameError::Disconnected("camera frame has unexpected layout".to_string()))
	}
}

impl PiCameraInput {
	pub fn open(settings: &InputSettings) -> Result<Self> {
		let mut cap = VideoCapture::new(settings.device, CAP_ANY)?;
		if !cap.is_opened()? {
			return Err(Error::Camera(format!("camera {} failed to open", settings.device)));
		}
		cap.set(CAP_PROP_FRAME_HEIGHT, f64::from(settings.height))?;
		cap.set(CAP_PROP_FRAME_WIDTH, f64::from(settings.width))?;
		cap.set(CAP_PROP_FPS, f64::from(settings.fps))?;

		info!(
			device = settings.device,
			width = settings.width,
			height = settings.height,
			fps = settings.fps,
			"camera opened"
		);

		Ok(Self {
			cap,
			bgr: Mat::default(),
			rgb: Mat::default(),
		})
	}
}

fn disconnected(err: opencv::Error) -> FrameError {
	FrameError::Disconnected(err.message)
}
