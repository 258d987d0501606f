use crate::error::{Error, Result};
use crate::pipeline::PipelineConfig;

use serde::Deserialize;

use std::fs;
use std::path::{Path, PathBuf};

pub const CARGO: &str = "cargo";
pub const HATCH: &str = "hatch";

/// Everything read from the settings file, once, at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
	pub input: InputSettings,
	pub output: OutputSettings,
	pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
	#[default]
	Camera,
	Still,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputSettings {
	pub source: InputKind,
	pub device: i32,
	pub width: u32,
	pub height: u32,
	pub fps: u32,
	/// Image replayed when `source = "still"`.
	pub path: Option<PathBuf>,
}

impl Default for InputSettings {
	fn default() -> Self {
		Self {
			source: InputKind::Camera,
			device: 0,
			width: 320,
			height: 240,
			fps: 30,
			path: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
	pub networktables: bool,
	pub ip: String,
}

impl Default for OutputSettings {
	fn default() -> Self {
		Self {
			networktables: false,
			ip: "10.75.28.2".to_string(),
		}
	}
}

/// Tunings for the two pipelines.
///
/// Each section is laid over the built-in tuning of the same name, so a key
/// missing from the file (or a whole missing section) keeps its built-in
/// value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineSettings {
	#[serde(default = "PipelineConfig::cargo")]
	pub cargo: PipelineConfig,
	#[serde(default = "PipelineConfig::hatch")]
	pub hatch: PipelineConfig,
}

impl Default for PipelineSettings {
	fn default() -> Self {
		Self {
			cargo: PipelineConfig::cargo(),
			hatch: PipelineConfig::hatch(),
		}
	}
}

impl VisionSettings {
	pub fn load(path: &Path) -> Result<Self> {
		let content = fs::read_to_string(path).map_err(|source| Error::SettingsIo {
			path: path.to_path_buf(),
			source,
		})?;
		content.parse()
	}
}

impl std::str::FromStr for VisionSettings {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		let mut table: toml::Table = toml::from_str(s)?;

		if let Some(toml::Value::Table(pipelines)) = table.get_mut("pipeline") {
			for (name, builtin) in [(CARGO, PipelineConfig::cargo()), (HATCH, PipelineConfig::hatch())] {
				let mut tuning = toml::Value::try_from(builtin)?;
				if let Some(section) = pipelines.remove(name) {
					merge(&mut tuning, section);
				}
				pipelines.insert(name.to_string(), tuning);
			}
		}

		Ok(toml::Value::Table(table).try_into()?)
	}
}

/// Recursively overwrites `base` with every key present in `over`.
fn merge(base: &mut toml::Value, over: toml::Value) {
	match (base, over) {
		(toml::Value::Table(base), toml::Value::Table(over)) => {
			for (key, value) in over {
				match base.get_mut(&key) {
					Some(slot) => merge(slot, value),
					None => {
						base.insert(key, value);
					}
				}
			}
		}
		(base, over) => *base = over,
	}
}
