//! Event subscription bookkeeping.
//!
//! Long-lived platform objects (the conference service, each live session)
//! must have at most one active listener from this application, and that
//! listener must be torn down exactly once when the observed object reaches a
//! terminal state. [`SubscriptionRegistry`] makes the discipline explicit:
//! target identity maps to at most one live subscription, conflicts are
//! rejected, releases are idempotent.

use std::collections::HashMap;

use huddle_core::SessionId;
use thiserror::Error;

/// Identity of an observed long-lived object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionTarget {
    /// The service-level conference event stream.
    Service,
    /// One conference session's event stream.
    Session(SessionId),
}

/// Handle of one live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// The raw handle value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Registry violation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The target already has a live subscription.
    #[error("target already has a live subscription")]
    AlreadySubscribed,
}

/// Tracks at most one live subscription per target.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    next_id: u64,
    live: HashMap<SubscriptionTarget, SubscriptionId>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the target.
    ///
    /// Rejects if the target already has a live subscription; the caller must
    /// release the old one first. Rejecting (rather than replacing) surfaces
    /// double-subscribe bugs instead of hiding them.
    pub fn subscribe(
        &mut self,
        target: SubscriptionTarget,
    ) -> Result<SubscriptionId, SubscriptionError> {
        if self.live.contains_key(&target) {
            return Err(SubscriptionError::AlreadySubscribed);
        }

        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.live.insert(target, id);
        Ok(id)
    }

    /// Release the target's subscription.
    ///
    /// Returns the released handle, or `None` if the target had none — a
    /// second release is a no-op, never an error.
    pub fn release(&mut self, target: SubscriptionTarget) -> Option<SubscriptionId> {
        self.live.remove(&target)
    }

    /// Whether the target currently has a live subscription.
    pub fn is_live(&self, target: SubscriptionTarget) -> bool {
        self.live.contains_key(&target)
    }

    /// Number of live subscriptions across all targets.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_subscribe_is_rejected() {
        let mut registry = SubscriptionRegistry::new();

        registry.subscribe(SubscriptionTarget::Service).unwrap();
        assert_eq!(
            registry.subscribe(SubscriptionTarget::Service),
            Err(SubscriptionError::AlreadySubscribed)
        );
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn release_is_idempotent() {
        let mut registry = SubscriptionRegistry::new();
        let target = SubscriptionTarget::Session(SessionId::new(7));

        let id = registry.subscribe(target).unwrap();
        assert_eq!(registry.release(target), Some(id));
        assert_eq!(registry.release(target), None);
        assert!(!registry.is_live(target));
    }

    #[test]
    fn distinct_targets_are_independent() {
        let mut registry = SubscriptionRegistry::new();

        registry.subscribe(SubscriptionTarget::Service).unwrap();
        registry.subscribe(SubscriptionTarget::Session(SessionId::new(1))).unwrap();
        registry.subscribe(SubscriptionTarget::Session(SessionId::new(2))).unwrap();

        assert_eq!(registry.live_count(), 3);
        registry.release(SubscriptionTarget::Session(SessionId::new(1)));
        assert!(registry.is_live(SubscriptionTarget::Session(SessionId::new(2))));
        assert!(registry.is_live(SubscriptionTarget::Service));
    }

    #[test]
    fn resubscribe_after_release_gets_fresh_handle() {
        let mut registry = SubscriptionRegistry::new();
        let target = SubscriptionTarget::Service;

        let first = registry.subscribe(target).unwrap();
        registry.release(target);
        let second = registry.subscribe(target).unwrap();

        assert_ne!(first, second);
    }
}
