//! Per-controller memory of target health already accounted for.

use prism_core::{TargetId, Targetable};
use slotmap::SecondaryMap;

use crate::target::Target;

/// Lowest health each target is known to have reached during one activation
/// cycle.
///
/// A floor below a target's current health means the health it regained
/// since is owed back on the next eroding hit. Targets without a floor are
/// unknown.
#[derive(Clone, Debug, Default)]
pub(crate) struct TargetRegistry {
    floors: SecondaryMap<TargetId, i32>,
}

impl TargetRegistry {
    /// Starts a cycle with every target unknown.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Forgets non-hostile targets and tightens stale floors to just below current health.
    pub(crate) fn refresh<'a>(&mut self, targets: impl Iterator<Item = (TargetId, &'a Target)>) {
        for (id, target) in targets {
            if target.friendly || target.town || !target.is_strikeable() {
                let _ = self.floors.remove(id);
                continue;
            }
            let stale = self.floors.get(id).map_or(true, |floor| *floor >= target.life);
            if stale {
                let _ = self.floors.insert(id, target.life - 1);
            }
        }
    }

    /// Floor recorded for `target`, if known.
    pub(crate) fn floor(&self, target: TargetId) -> Option<i32> {
        self.floors.get(target).copied()
    }

    /// Records the floor after a hit.
    pub(crate) fn record(&mut self, target: TargetId, floor: i32) {
        let _ = self.floors.insert(target, floor);
    }
}

#[cfg(test)]
mod tests {
    use prism_core::Vec2;
    use slotmap::SlotMap;

    use super::*;

    fn targets() -> (SlotMap<TargetId, Target>, TargetId, TargetId) {
        let mut targets = SlotMap::with_key();
        let hostile = targets.insert(Target::new(Vec2::ZERO, Vec2::splat(10.0), 100));
        let mut friend = Target::new(Vec2::ZERO, Vec2::splat(10.0), 100);
        friend.friendly = true;
        let friendly = targets.insert(friend);
        (targets, hostile, friendly)
    }

    #[test]
    fn new_cycles_start_unknown() {
        let (_, hostile, _) = targets();
        let registry = TargetRegistry::new();
        assert_eq!(registry.floor(hostile), None);
    }

    #[test]
    fn refresh_tracks_hostiles_only() {
        let (targets, hostile, friendly) = targets();
        let mut registry = TargetRegistry::new();
        registry.refresh(targets.iter());
        assert_eq!(registry.floor(hostile), Some(99));
        assert_eq!(registry.floor(friendly), None);
    }

    #[test]
    fn lower_floors_survive_refresh_until_health_catches_up() {
        let (mut targets, hostile, _) = targets();
        let mut registry = TargetRegistry::new();
        registry.record(hostile, 40);
        registry.refresh(targets.iter());
        assert_eq!(registry.floor(hostile), Some(40));

        targets[hostile].life = 40;
        registry.refresh(targets.iter());
        assert_eq!(registry.floor(hostile), Some(39));
    }
}
