use ferrotrack::config::{InputKind, InputSettings, OutputSettings, VisionSettings, CARGO, HATCH};
use ferrotrack::modules::input::{spawn_capture, LatestFrame, StillInput};
use ferrotrack::modules::output::ResultTable;
use ferrotrack::modules::OutputModule;
use ferrotrack::{Pipeline, Tracker};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

#[derive(Parser, Debug)]
#[command(version, about = "Track cargo and hatch targets and publish their position")]
struct Args {
	/// Settings file
	#[arg(short, long, default_value = "vset.toml")]
	config: PathBuf,
}

// Main
fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();

	//Load Vision Settings
	let vset = VisionSettings::load(&args.config)
		.with_context(|| format!("loading settings from {}", args.config.display()))?;

	//Input Module
	let latest = LatestFrame::new();
	let capture = start_input(&vset.input, latest.clone())?;

	//Output Module
	let output = start_output(&vset.output)?;

	//Trackers
	let cargo = Tracker::new(CARGO, Pipeline::new(vset.pipeline.cargo.clone()), latest.reader(), Arc::clone(&output))
		.spawn()
		.context("starting cargo tracker")?;
	let hatch = Tracker::new(HATCH, Pipeline::new(vset.pipeline.hatch.clone()), latest.reader(), output)
		.spawn()
		.context("starting hatch tracker")?;

	let cargo_state = cargo.join();
	let hatch_state = hatch.join();

	latest.close();
	if capture.join().is_err() {
		bail!("capture thread panicked");
	}

	info!(cargo = ?cargo_state, hatch = ?hatch_state, "all trackers ended");
	Ok(())
}

fn start_input(settings: &InputSettings, latest: LatestFrame) -> anyhow::Result<JoinHandle<()>> {
	match settings.source {
		InputKind::Still => {
			let path = match &settings.path {
				Some(path) => path,
				None => bail!("input.path is required for a still input"),
			};
			let input = StillInput::open(path, settings.fps)?;
			info!(path = %path.display(), fps = settings.fps, "replaying still image");
			Ok(spawn_capture(input, latest, "still")?)
		}
		InputKind::Camera => start_camera(settings, latest),
	}
}

#[cfg(feature = "camera")]
fn start_camera(settings: &InputSettings, latest: LatestFrame) -> anyhow::Result<JoinHandle<()>> {
	use ferrotrack::modules::input::PiCameraInput;

	let input = PiCameraInput::open(settings).context("opening camera")?;
	Ok(spawn_capture(input, latest, "picamera")?)
}

#[cfg(not(feature = "camera"))]
fn start_camera(_settings: &InputSettings, _latest: LatestFrame) -> anyhow::Result<JoinHandle<()>> {
	bail!("built without the `camera` feature; use a still input or rebuild with --features camera")
}

#[cfg(feature = "networktables")]
fn start_output(settings: &OutputSettings) -> anyhow::Result<Arc<dyn OutputModule>> {
	use ferrotrack::modules::output::NetworkTable;

	if settings.networktables {
		let table = NetworkTable::connect(settings, &[CARGO, HATCH]).context("connecting to networktables")?;
		return Ok(Arc::new(table));
	}
	Ok(Arc::new(ResultTable::new()))
}

#[cfg(not(feature = "networktables"))]
fn start_output(settings: &OutputSettings) -> anyhow::Result<Arc<dyn OutputModule>> {
	if settings.networktables {
		bail!("built without the `networktables` feature; set output.networktables = false or rebuild");
	}
	Ok(Arc::new(ResultTable::new()))
}
