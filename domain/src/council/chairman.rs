//! Chairman selection.

use super::policy::{ChairmanStrategy, CouncilPolicy};
use crate::core::backend::BackendConfig;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Picks the backend that synthesizes the final answer.
///
/// Holds the rotation counter for one engine instance. The counter is
/// atomic, so a selector may be shared by concurrent deliberations; each
/// rotating selection consumes exactly one tick.
#[derive(Debug, Default)]
pub struct ChairmanSelector {
    counter: AtomicUsize,
}

impl ChairmanSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start rotation at a given position
    pub fn starting_at(position: usize) -> Self {
        Self {
            counter: AtomicUsize::new(position),
        }
    }

    /// Select a chairman from the roster.
    ///
    /// `Fixed` returns the configured model when it is on the roster and
    /// otherwise falls through to rotation. Returns `None` only for an empty
    /// roster.
    pub fn select<'a>(
        &self,
        roster: &'a [BackendConfig],
        policy: &CouncilPolicy,
    ) -> Option<&'a BackendConfig> {
        if roster.is_empty() {
            return None;
        }

        if policy.chairman_strategy == ChairmanStrategy::Fixed
            && let Some(name) = policy.chairman_fixed_model.as_deref()
            && let Some(found) = roster.iter().find(|m| m.name == name)
        {
            return Some(found);
        }

        let tick = self.counter.fetch_add(1, Ordering::Relaxed);
        roster.get(tick % roster.len())
    }

    /// Current rotation position
    pub fn position(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }
}
