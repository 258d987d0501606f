mod table;
#[cfg(feature = "networktables")]
mod networktable;

pub use table::{EntryValue, ResultTable};
#[cfg(feature = "networktables")]
pub use networktable::NetworkTable;

/// Key of the boolean "target in view" entry for a pipeline.
pub fn tracking_key(prefix: &str) -> String {
	format!("{}Tracking", prefix)
}

/// Key of the horizontal center entry for a pipeline, in pixels.
pub fn center_key(prefix: &str) -> String {
	format!("{}CenterPix", prefix)
}
