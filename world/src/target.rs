//! Targets: hostile entities the beams strike.

use prism_core::{Aabb, TargetId, Targetable, Vec2};

use crate::status::StatusEffects;

/// A target the beams can strike.
///
/// Targets are owned by the environment; the weapon reads and writes their
/// health and combat flags through the world.
#[derive(Clone, Debug)]
pub struct Target {
    /// Top-left corner of the hitbox.
    pub position: Vec2,
    /// Hitbox size.
    pub size: Vec2,
    /// Velocity applied each tick.
    pub velocity: Vec2,
    /// Current health.
    pub life: i32,
    /// Maximum health.
    pub life_max: i32,
    /// Flat damage reduction; halved against strikes.
    pub defense: i32,
    /// Fraction of knockback taken.
    pub knockback_resist: f32,
    /// Incoming damage multiplier.
    pub taken_damage_multiplier: f32,
    /// Contact damage dealt by the target.
    pub contact_damage: i32,
    /// Bosses decay four times slower and weigh less for volleys.
    pub boss: bool,
    /// Friendly targets are never struck.
    pub friendly: bool,
    /// Town residents are struck only if they deal contact damage.
    pub town: bool,
    /// Immortal targets never lose health to strikes.
    pub immortal: bool,
    /// Damage-immune targets only take hits from fully overcharged beams.
    pub dont_take_damage: bool,
    /// Targets that ignore tile collision are shoved directly.
    pub no_tile_collide: bool,
    /// Head of a segmented creature sharing one health pool, if any.
    pub shared_pool: Option<TargetId>,
    /// Number of segments sharing this target's pool, once counted.
    pub segment_share: Option<u16>,
    /// Loot value dropped on death.
    pub value: f32,
    /// Whether the weapon already credited a kill on this target.
    pub slain: bool,
    /// Debuffs applied to the target.
    pub debuffs: StatusEffects,
}

impl Target {
    /// Creates a plain hostile target centred on `center`.
    #[must_use]
    pub fn new(center: Vec2, size: Vec2, life: i32) -> Self {
        Self {
            position: center - size * 0.5,
            size,
            velocity: Vec2::ZERO,
            life,
            life_max: life,
            defense: 0,
            knockback_resist: 1.0,
            taken_damage_multiplier: 1.0,
            contact_damage: 20,
            boss: false,
            friendly: false,
            town: false,
            immortal: false,
            dont_take_damage: false,
            no_tile_collide: false,
            shared_pool: None,
            segment_share: None,
            value: 0.0,
            slain: false,
            debuffs: StatusEffects::default(),
        }
    }

    /// Centre of the hitbox.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Whether the target is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Whether homing volleys may chase the target.
    #[must_use]
    pub fn can_be_chased(&self) -> bool {
        self.is_alive() && !self.friendly && !self.town && !self.immortal && !self.dont_take_damage
    }

    /// Applies a strike of `damage`, returning the health it removed.
    ///
    /// Defense absorbs half its value, crits double the result, and every
    /// strike lands at least 1. Immortal targets report the damage without
    /// losing health.
    pub fn strike(&mut self, damage: i32, knockback: f32, direction: f32, crit: bool) -> i32 {
        let mut dealt = (i64::from(damage) - i64::from(self.defense / 2)).max(1);
        if crit {
            dealt *= 2;
        }
        let dealt = dealt.min(i64::from(i32::MAX)) as i32;
        if !self.immortal {
            self.life = self.life.saturating_sub(dealt);
        }
        if knockback > 0.0 && self.knockback_resist > 0.0 {
            self.velocity.x += direction * knockback * self.knockback_resist;
        }
        dealt
    }

    pub(crate) fn advance(&mut self) {
        self.position += self.velocity;
        self.debuffs.tick();
    }
}

impl Targetable for Target {
    fn hitbox(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    fn is_strikeable(&self) -> bool {
        self.is_alive()
            && !self.friendly
            && !((self.town || self.life_max <= 3) && self.contact_damage <= 0)
    }

    fn accepts_beam(&self, inner_brightness: f32) -> bool {
        inner_brightness <= 0.0 || !self.dont_take_damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy() -> Target {
        Target::new(Vec2::ZERO, Vec2::splat(20.0), 100)
    }

    #[test]
    fn strike_respects_defense_and_crits() {
        let mut target = dummy();
        target.defense = 10;
        assert_eq!(target.strike(20, 0.0, 1.0, false), 15);
        assert_eq!(target.strike(20, 0.0, 1.0, true), 30);
        assert_eq!(target.life, 55);
        assert_eq!(target.strike(1, 0.0, 1.0, false), 1);
    }

    #[test]
    fn immortal_targets_keep_their_health() {
        let mut target = dummy();
        target.immortal = true;
        assert_eq!(target.strike(50, 0.0, 1.0, false), 50);
        assert_eq!(target.life, 100);
    }

    #[test]
    fn knockback_pushes_along_direction() {
        let mut target = dummy();
        target.knockback_resist = 0.5;
        let _ = target.strike(1, 4.0, -1.0, false);
        assert_eq!(target.velocity, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn harmless_town_residents_are_not_strikeable() {
        let mut target = dummy();
        target.town = true;
        target.contact_damage = 0;
        assert!(!target.is_strikeable());
        target.contact_damage = 10;
        assert!(target.is_strikeable());
    }

    #[test]
    fn damage_immune_targets_only_accept_deep_beams() {
        let mut target = dummy();
        target.dont_take_damage = true;
        assert!(!target.accepts_beam(0.5));
        assert!(target.accepts_beam(0.0));
    }
}
