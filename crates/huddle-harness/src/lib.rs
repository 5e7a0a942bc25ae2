//! Test harness for the Huddle client
//!
//! Deterministic stand-ins for the excluded collaborators:
//!
//! - [`SimPlatform`]: an in-process [`ConferencePlatform`] with scripted
//!   remote behavior, delivering notifications over ordinary channels so
//!   tests (and the TUI's simulation mode) control exactly when events fire.
//! - [`RecordingSurface`]: a [`Surface`](huddle_client::Surface) that records
//!   every call and keeps a cell model for structural assertions, including
//!   duplicate-create and duplicate-attach counting.
//!
//! [`ConferencePlatform`]: huddle_core::ConferencePlatform

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod recording;
mod sim;

pub use recording::{CellSnapshot, RecordingError, RecordingSurface, SurfaceCall};
pub use sim::SimPlatform;
