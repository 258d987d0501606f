use crate::modules::output::{center_key, tracking_key};
use crate::modules::{OutputModule, TrackingResult};

use parking_lot::RwLock;
use tracing::debug;

use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryValue {
	Boolean(bool),
	Double(f64),
}

/// In-process key/value store for tracking results.
///
/// Cloning shares the same table. Writers and readers may be on any thread;
/// the two entries of one result are written one after the other, not
/// atomically.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
	entries: Arc<RwLock<HashMap<String, EntryValue>>>,
}

impl OutputModule for ResultTable {
	fn publish(&self, key_prefix: &str, result: &TrackingResult) {
		self.set(tracking_key(key_prefix), EntryValue::Boolean(result.found));
		self.set(center_key(key_prefix), EntryValue::Double(result.center_x));
		debug!(pipeline = key_prefix, found = result.found, center_x = result.center_x, "published");
	}
}

impl ResultTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<EntryValue> {
		self.entries.read().get(key).copied()
	}

	/// Reads back the last result published under `key_prefix`.
	pub fn result(&self, key_prefix: &str) -> Option<TrackingResult> {
		let entries = self.entries.read();
		match (entries.get(&tracking_key(key_prefix)), entries.get(&center_key(key_prefix))) {
			(Some(EntryValue::Boolean(found)), Some(EntryValue::Double(center_x))) => Some(TrackingResult {
				found: *found,
				center_x: *center_x,
			}),
			_ => None,
		}
	}

	fn set(&self, key: String, value: EntryValue) {
		self.entries.write().insert(key, value);
	}
}
