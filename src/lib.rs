//! Two-target color tracking for a fixed robot camera.
//!
//! Each target gets its own [`pipeline::Pipeline`] driven by a
//! [`tracker::Tracker`] thread. Both pull frames from one shared
//! [`modules::input::LatestFrame`] and publish `found` / `centerX` pairs
//! through a [`modules::OutputModule`].

pub mod config;
pub mod error;
pub mod modules;
pub mod pipeline;
pub mod tracker;

pub use error::{Error, FrameError, Result};
pub use modules::{Contour, Frame, Hull, Mask, TrackingResult};
pub use pipeline::{Pipeline, PipelineConfig};
pub use tracker::{Tracker, TrackerHandle, TrackerState};
