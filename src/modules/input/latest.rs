use crate::error::FrameError;
use crate::modules::{Frame, FrameSource};

use parking_lot::{Condvar, Mutex};

use std::sync::Arc;

#[derive(Debug)]
enum Status {
	Open,
	Closed,
	Faulted(String),
}

struct Slot {
	frame: Option<Arc<Frame>>,
	seq: u64,
	status: Status,
}

struct Shared {
	slot: Mutex<Slot>,
	ready: Condvar,
}

/// Single-slot store holding the most recent frame.
///
/// One producer [`push`](Self::push)es frames; any number of
/// [`FrameReader`]s pull from it independently. Each reader gets a shared
/// snapshot of the newest frame it has not seen yet, and older frames are
/// dropped rather than queued.
#[derive(Clone)]
pub struct LatestFrame {
	shared: Arc<Shared>,
}

impl Default for LatestFrame {
	fn default() -> Self {
		Self::new()
	}
}

impl LatestFrame {
	pub fn new() -> Self {
		Self {
			shared: Arc::new(Shared {
				slot: Mutex::new(Slot {
					frame: None,
					seq: 0,
					status: Status::Open,
				}),
				ready: Condvar::new(),
			}),
		}
	}

	/// Publishes `frame` as the newest one. Ignored once closed or faulted.
	pub fn push(&self, frame: Frame) {
		let mut slot = self.shared.slot.lock();
		if !matches!(slot.status, Status::Open) {
			return;
		}
		slot.frame = Some(Arc::new(frame));
		slot.seq += 1;
		drop(slot);
		self.shared.ready.notify_all();
	}

	/// Stops the source; blocked and future readers get [`FrameError::Closed`].
	pub fn close(&self) {
		self.set_status(Status::Closed);
	}

	/// Marks the source broken; readers get [`FrameError::Disconnected`].
	pub fn fault(&self, reason: impl Into<String>) {
		self.set_status(Status::Faulted(reason.into()));
	}

	pub fn is_open(&self) -> bool {
		matches!(self.shared.slot.lock().status, Status::Open)
	}

	pub fn reader(&self) -> FrameReader {
		FrameReader {
			shared: Arc::clone(&self.shared),
			seen: 0,
		}
	}

	fn set_status(&self, status: Status) {
		let mut slot = self.shared.slot.lock();
		if matches!(slot.status, Status::Open) {
			slot.status = status;
		}
		drop(slot);
		self.shared.ready.notify_all();
	}
}

/// One consumer's view of a [`LatestFrame`].
pub struct FrameReader {
	shared: Arc<Shared>,
	seen: u64,
}

impl FrameSource for FrameReader {
	fn next_frame(&mut self) -> Result<Arc<Frame>, FrameError> {
		let mut slot = self.shared.slot.lock();
		loop {
			match &slot.status {
				Status::Open => {}
				Status::Closed => return Err(FrameError::Closed),
				Status::Faulted(reason) => return Err(FrameError::Disconnected(reason.clone())),
			}

			if slot.seq > self.seen {
				if let Some(frame) = &slot.frame {
					self.seen = slot.seq;
					return Ok(Arc::clone(frame));
				}
			}

			self.shared.ready.wait(&mut slot);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::Rgb;
	use std::thread;
	use std::time::Duration;

	fn frame(value: u8) -> Frame {
		Frame::from_pixel(2, 2, Rgb([value, value, value]))
	}

	#[test]
	fn readers_see_the_newest_frame() {
		let latest = LatestFrame::new();
		let mut reader = latest.reader();

		latest.push(frame(1));
		latest.push(frame(2));
		assert_eq!(reader.next_frame().unwrap().get_pixel(0, 0).0, [2, 2, 2]);
	}

	#[test]
	fn each_reader_gets_its_own_copy() {
		let latest = LatestFrame::new();
		let mut a = latest.reader();
		let mut b = latest.reader();

		latest.push(frame(5));
		let fa = a.next_frame().unwrap();
		let fb = b.next_frame().unwrap();
		assert!(Arc::ptr_eq(&fa, &fb));
	}

	#[test]
	fn reader_blocks_until_a_new_frame() {
		let latest = LatestFrame::new();
		let mut reader = latest.reader();
		latest.push(frame(1));
		reader.next_frame().unwrap();

		let producer = latest.clone();
		let handle = thread::spawn(move || {
			thread::sleep(Duration::from_millis(50));
			producer.push(frame(9));
		});

		assert_eq!(reader.next_frame().unwrap().get_pixel(1, 1).0, [9, 9, 9]);
		handle.join().unwrap();
	}

	#[test]
	fn close_wakes_blocked_readers() {
		let latest = LatestFrame::new();
		let mut reader = latest.reader();

		let handle = thread::spawn(move || reader.next_frame());
		thread::sleep(Duration::from_millis(50));
		latest.close();

		assert_eq!(handle.join().unwrap(), Err(FrameError::Closed));
		assert!(!latest.is_open());
	}

	#[test]
	fn fault_is_reported_and_sticky() {
		let latest = LatestFrame::new();
		let mut reader = latest.reader();
		latest.fault("camera unplugged");
		latest.close();
		latest.push(frame(1));

		assert_eq!(
			reader.next_frame(),
			Err(FrameError::Disconnected("camera unplugged".to_string()))
		);
	}
}
