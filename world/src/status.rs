//! Buff and debuff timers.

use std::collections::BTreeMap;

use prism_core::BuffId;

/// Timed status effects carried by an actor or target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusEffects {
    remaining: BTreeMap<BuffId, u32>,
}

impl StatusEffects {
    /// Grants `buff` for `duration` ticks, keeping any longer remaining time.
    pub fn grant(&mut self, buff: BuffId, duration: u32) {
        let remaining = self.remaining.entry(buff).or_insert(0);
        *remaining = (*remaining).max(duration);
    }

    /// Ticks left on `buff`, 0 when absent.
    #[must_use]
    pub fn remaining(&self, buff: BuffId) -> u32 {
        self.remaining.get(&buff).copied().unwrap_or(0)
    }

    /// Whether `buff` is active.
    #[must_use]
    pub fn is_active(&self, buff: BuffId) -> bool {
        self.remaining(buff) > 0
    }

    /// Number of active effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// Whether no effect is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub(crate) fn tick(&mut self) {
        self.remaining.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }
}
