//! Conference session synchronizer
//!
//! Keeps a rendered grid of participant views consistent with a live,
//! asynchronously-changing conference session: status transitions,
//! participant join/leave, per-participant mute state, and media
//! attach/detach — with no duplicate subscriptions, no orphaned cells, and no
//! dangling listeners after the session ends.
//!
//! # Architecture
//!
//! Pure state machines with all rendering behind the [`Surface`] capability
//! trait, so the reconciliation algorithm is fully testable without any
//! rendering technology:
//!
//! - [`SessionCoordinator`]: interprets session notifications, owns the
//!   session reference and its subscription, drives the other two pieces
//! - [`CellGrid`]: keyed view-cell reconciler (structural pass + per-cell
//!   control visibility)
//! - [`SubscriptionRegistry`]: at most one live listener per observed target
//!
//! Single-writer discipline: only the coordinator creates or clears the
//! session reference and subscription handle; the grid only reads participant
//! data and mutates the cell collection.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod coordinator;
mod grid;
mod subscription;
mod surface;

pub use coordinator::{AttachError, EventOutcome, SessionCommand, SessionCoordinator};
pub use grid::CellGrid;
pub use subscription::{
    SubscriptionError, SubscriptionId, SubscriptionRegistry, SubscriptionTarget,
};
pub use surface::{CellControl, Surface};
