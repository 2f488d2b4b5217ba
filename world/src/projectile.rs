//! Pooled projectiles: foreign shots and the weapon's effect fragments.

use std::ops::Range;

use prism_core::{rng::SimRng, Aabb, Absorbable, ActorId, EffectKind, Vec2, SHATTER_KINDS};

/// Default hitbox of effect fragments.
const EFFECT_SIZE: Vec2 = Vec2::new(10.0, 10.0);

/// Default lifetime of effect fragments.
const EFFECT_LIFETIME: i32 = 300;

/// Lifetime of heavy fragments.
const HEAVY_LIFETIME: i32 = 240;

/// Launch speed of fragments.
const FRAGMENT_SPEED: f32 = 12.0;

/// Who a projectile fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    /// Fired by the environment.
    World,
    /// Fired by, or hijacked for, an actor.
    Actor(ActorId),
}

/// What a projectile is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    /// A projectile fired by something other than the weapon.
    Foreign(u16),
    /// A fragment or volley spawned by the weapon.
    Effect(EffectKind),
}

/// A pooled projectile.
#[derive(Clone, Debug)]
pub struct Projectile {
    /// Kind of projectile.
    pub kind: ProjectileKind,
    /// Top-left corner of the hitbox.
    pub position: Vec2,
    /// Hitbox size.
    pub size: Vec2,
    /// Velocity applied each tick.
    pub velocity: Vec2,
    /// Damage on contact.
    pub damage: i32,
    /// Knockback on contact.
    pub knockback: f32,
    /// Current owner.
    pub owner: Owner,
    /// Whether it can hurt hostile targets.
    pub friendly: bool,
    /// Whether it can hurt actors.
    pub hostile: bool,
    /// Ticks until expiry.
    pub time_left: i32,
    /// Hits left before expiry; negative pierces forever, 0 expires.
    pub pierce: i32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Draw scale.
    pub scale: f32,
}

impl Projectile {
    /// Creates a hostile projectile fired by the environment.
    #[must_use]
    pub fn hostile(code: u16, center: Vec2, size: Vec2, velocity: Vec2, damage: i32) -> Self {
        Self {
            kind: ProjectileKind::Foreign(code),
            position: center - size * 0.5,
            size,
            velocity,
            damage,
            knockback: 0.0,
            owner: Owner::World,
            friendly: false,
            hostile: true,
            time_left: 600,
            pierce: 1,
            opacity: 1.0,
            scale: 1.0,
        }
    }

    pub(crate) fn effect(
        kind: EffectKind,
        center: Vec2,
        velocity: Vec2,
        damage: i32,
        knockback: f32,
        actor: ActorId,
    ) -> Self {
        Self {
            kind: ProjectileKind::Effect(kind),
            position: center - EFFECT_SIZE * 0.5,
            size: EFFECT_SIZE,
            velocity,
            damage,
            knockback,
            owner: Owner::Actor(actor),
            friendly: true,
            hostile: false,
            time_left: EFFECT_LIFETIME,
            pierce: 1,
            opacity: 1.0,
            scale: 1.0,
        }
    }

    /// Centre of the hitbox.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Moves the projectile and reports whether it is still alive.
    pub(crate) fn advance(&mut self) -> bool {
        self.position += self.velocity;
        self.time_left = self.time_left.saturating_sub(1);
        self.time_left > 0 && self.pierce != 0
    }
}

/// Builds one fragment of a burst around `origin`, flying out at a random whole-degree angle.
///
/// Swift fragments fly three times faster; heavy ones fly three times slower,
/// hit three times harder, and expire sooner.
pub(crate) fn fragment(
    rng: &mut SimRng,
    origin: Vec2,
    damage: i32,
    pierce: Range<i32>,
    knockback: f32,
    actor: ActorId,
) -> Projectile {
    let angle = (rng.below(360) as f32).to_radians();
    let mut velocity = Vec2::new(angle.cos(), angle.sin()) * FRAGMENT_SPEED;
    let kind = rng.pick(&SHATTER_KINDS).unwrap_or(EffectKind::SWIFT);
    let mut damage = damage;
    if kind == EffectKind::SWIFT {
        velocity *= 3.0;
    } else if kind == EffectKind::HEAVY {
        velocity /= 3.0;
        damage = damage.saturating_mul(3);
    }

    let mut projectile = Projectile::effect(kind, origin + velocity * 3.0, velocity, damage, knockback, actor);
    projectile.pierce = rng.range_i32(pierce.start, pierce.end);
    if kind == EffectKind::HEAVY {
        projectile.time_left = HEAVY_LIFETIME;
    }
    projectile
}

impl Absorbable for Projectile {
    fn hitbox(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    fn is_absorbable(&self) -> bool {
        !self.friendly || self.hostile
    }
}
