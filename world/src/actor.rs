//! Actors: the entities that wield a weapon.

use prism_core::{ActivationState, Aabb, SimConfig, TargetId, Vec2};
use prism_system_damage::Modifiers;

use crate::{status::StatusEffects, weapon::Weapon};

/// Hitbox size of an actor.
const ACTOR_SIZE: Vec2 = Vec2::new(20.0, 42.0);

/// An actor wielding a prism weapon.
///
/// Fields describe state owned by the environment (movement, input, stats)
/// and are freely adjustable between ticks.
#[derive(Clone, Debug)]
pub struct Actor {
    /// Mounted centre; the swarm orbits this point.
    pub center: Vec2,
    /// Remaining health; the weapon is unusable at 0.
    pub life: i32,
    /// Current resource pool.
    pub mana: i32,
    /// Resource pool capacity.
    pub mana_max: i32,
    /// Whether the weapon is held.
    pub holding: bool,
    /// Whether item use is blocked by a curse.
    pub cursed: bool,
    /// Whether the actor is crowd-controlled.
    pub crowd_controlled: bool,
    /// Whether the actor is a ghost.
    pub ghost: bool,
    /// Cursor position in world space.
    pub cursor: Vec2,
    /// Magic damage multiplier.
    pub magic_damage: f32,
    /// Crit chance in percent points.
    pub crit_chance: f32,
    /// Luck.
    pub luck: f32,
    /// Summon attack speed; faster speeds slow the orbit.
    pub attack_speed: f32,
    /// Target designated by the actor's minions, preferred by volleys.
    pub attack_target: Option<TargetId>,
    /// Buffs granted to the actor.
    pub buffs: StatusEffects,
    /// Running total of damage dealt by the weapon.
    pub damage_dealt: i64,
    /// The prism weapon.
    pub weapon: Weapon,
}

impl Actor {
    pub(crate) fn new(center: Vec2, config: &SimConfig) -> Self {
        Self {
            center,
            life: 500,
            mana: 200,
            mana_max: 200,
            holding: true,
            cursed: false,
            crowd_controlled: false,
            ghost: false,
            cursor: center + Vec2::new(400.0, 0.0),
            magic_damage: 1.0,
            crit_chance: 4.0,
            luck: 0.0,
            attack_speed: 1.0,
            attack_target: None,
            buffs: StatusEffects::default(),
            damage_dealt: 0,
            weapon: Weapon::new(config.controllers_per_weapon),
        }
    }

    /// Hitbox of the actor.
    #[must_use]
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center(self.center, ACTOR_SIZE)
    }

    /// Whether the actor can keep a swarm alive this tick.
    #[must_use]
    pub fn can_use_weapon(&self) -> bool {
        self.life > 0 && self.holding && !self.cursed && !self.crowd_controlled && !self.ghost
    }

    /// Cursor, snapped onto the actor when it lies inside the dead zone.
    pub(crate) fn effective_cursor(&self, dead_zone: f32) -> Vec2 {
        if self.cursor.distance(self.center) < dead_zone {
            self.center
        } else {
            self.cursor
        }
    }

    pub(crate) fn frame(&self, dead_zone: f32) -> ActorFrame {
        ActorFrame {
            center: self.center,
            cursor: self.effective_cursor(dead_zone),
            cursor_in_dead_zone: self.cursor.distance(self.center) < dead_zone,
            attack_speed: self.attack_speed,
            attack_target: self.attack_target,
            state: self.weapon.state(),
            shoot_speed: self.weapon.shoot_speed,
            damage: self.weapon.damage,
            knockback: self.weapon.knockback,
            modifiers: Modifiers {
                damage: self.magic_damage,
                luck: self.luck,
                crit_chance: self.crit_chance,
            },
        }
    }
}

/// Copy of the actor state read by controllers and beams during a tick.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ActorFrame {
    pub(crate) center: Vec2,
    pub(crate) cursor: Vec2,
    pub(crate) cursor_in_dead_zone: bool,
    pub(crate) attack_speed: f32,
    pub(crate) attack_target: Option<TargetId>,
    pub(crate) state: ActivationState,
    pub(crate) shoot_speed: f32,
    pub(crate) damage: i32,
    pub(crate) knockback: f32,
    pub(crate) modifiers: Modifiers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_incapacity_blocks_the_weapon() {
        let config = SimConfig::default();
        let actor = Actor::new(Vec2::ZERO, &config);
        assert!(actor.can_use_weapon());

        let mut cursed = actor.clone();
        cursed.cursed = true;
        assert!(!cursed.can_use_weapon());

        let mut dead = actor.clone();
        dead.life = 0;
        assert!(!dead.can_use_weapon());

        let mut unarmed = actor;
        unarmed.holding = false;
        assert!(!unarmed.can_use_weapon());
    }

    #[test]
    fn cursor_snaps_inside_dead_zone() {
        let mut actor = Actor::new(Vec2::new(10.0, 10.0), &SimConfig::default());
        actor.cursor = Vec2::new(40.0, 10.0);
        assert_eq!(actor.effective_cursor(80.0), Vec2::new(10.0, 10.0));
        actor.cursor = Vec2::new(400.0, 10.0);
        assert_eq!(actor.effective_cursor(80.0), Vec2::new(400.0, 10.0));
        assert!(!actor.frame(80.0).cursor_in_dead_zone);
    }
}
