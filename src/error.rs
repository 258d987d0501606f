use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a frame. Fatal to the worker that sees it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
	#[error("frame source closed")]
	Closed,

	#[error("frame source disconnected: {0}")]
	Disconnected(String),
}

#[derive(Error, Debug)]
pub enum Error {
	#[error("could not read settings file '{path}': {source}")]
	SettingsIo {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("could not parse settings: {0}")]
	Settings(#[from] toml::de::Error),

	#[error("could not encode built-in settings: {0}")]
	SettingsEncode(#[from] toml::ser::Error),

	#[error("could not load image '{path}': {source}")]
	Image {
		path: PathBuf,
		#[source]
		source: image::ImageError,
	},

	#[error("camera error: {0}")]
	Camera(String),

	#[error("networktables error: {0}")]
	NetworkTables(String),

	#[error("could not spawn thread: {0}")]
	Spawn(#[from] std::io::Error),
}

#[cfg(feature = "camera")]
impl From<opencv::Error> for Error {
	fn from(err: opencv::Error) -> Self {
		Error::Camera(err.message)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
