//! Huddle terminal UI
//!
//! A command-driven frontend for the conference client, running against the
//! in-process simulated platform. The pieces mirror the layering of the
//! client itself:
//!
//! - [`App`]: screen state machine (login, space search, in-call)
//! - [`TuiSurface`]: rendering-surface implementation holding cell view state
//! - [`Runtime`]: event loop multiplexing terminal input with platform
//!   notifications via `tokio::select!`
//! - [`ui`]: pure rendering functions from state to ratatui widgets

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod app;
pub mod commands;
pub mod input;
pub mod runtime;
pub mod surface;
pub mod ui;

pub use app::{App, AppAction, AppEvent, JoinOffer, Screen, SearchResult};
pub use input::{InputState, KeyInput};
pub use runtime::{Runtime, RuntimeError};
pub use surface::{CellView, SurfaceError, TuiSurface};
