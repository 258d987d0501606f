use nt::*;

use crate::config::OutputSettings;
use crate::error::{Error, Result};
use crate::modules::output::{center_key, tracking_key};
use crate::modules::{OutputModule, TrackingResult};

use parking_lot::Mutex;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use std::collections::HashMap;

struct Entries {
	tracking_id: u16,
	center_id: u16,
}

/// Publishes results to a NetworkTables server.
pub struct NetworkTable {
	client: Mutex<NetworkTables<Client>>,
	entries: HashMap<String, Entries>,

	// keeps the client's background tasks alive
	_runtime: Mutex<Runtime>,
}

impl OutputModule for NetworkTable {
	fn publish(&self, key_prefix: &str, result: &TrackingResult) {
		let entries = match self.entries.get(key_prefix) {
			Some(entries) => entries,
			None => {
				warn!(pipeline = key_prefix, "no networktables entries for pipeline");
				return;
			}
		};

		let client = self.client.lock();
		client.update_entry(entries.tracking_id, EntryValue::Boolean(result.found));
		client.update_entry(entries.center_id, EntryValue::Double(result.center_x));
	}
}

impl NetworkTable {
	pub fn connect(settings: &OutputSettings, prefixes: &[&str]) -> Result<Self> {
		let mut runtime = Runtime::new().map_err(|e| Error::NetworkTables(e.to_string()))?;

		let client = runtime
			.block_on(NetworkTables::connect(&settings.ip, "ferrotrack"))
			.map_err(|e| Error::NetworkTables(e.to_string()))?;
		info!(ip = %settings.ip, "connected to networktables");

		let mut entries = HashMap::new();
		for &prefix in prefixes {
			let tracking_id = runtime
				.block_on(client.create_entry(EntryData::new(tracking_key(prefix), 0, EntryValue::Boolean(false))))
				.map_err(|e| Error::NetworkTables(e.to_string()))?;
			let center_id = runtime
				.block_on(client.create_entry(EntryData::new(
					center_key(prefix),
					0,
					EntryValue::Double(TrackingResult::NOT_FOUND_X),
				)))
				.map_err(|e| Error::NetworkTables(e.to_string()))?;

			entries.insert(prefix.to_string(), Entries { tracking_id, center_id });
		}

		Ok(Self {
			client: Mutex::new(client),
			entries,
			_runtime: Mutex::new(runtime),
		})
	}
}
