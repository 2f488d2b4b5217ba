#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure damage model of the prism beams.
//!
//! Charge determines a damage multiplier. Hits decay a target's health
//! multiplicatively instead of subtracting flat damage, so every target
//! takes a fixed fraction of its current and maximum health per hit. Past
//! 120% charge the beam enters erosion mode: health is decayed in place
//! before the strike, and anything that would bottom out below 3 health is
//! finished off.
//!
//! Every random input arrives as an explicit uniform draw so callers own the
//! random stream and tests stay deterministic.

use prism_core::{rng::round_weighted, Aabb, Vec2};

/// Damage multiplier reached at full charge.
pub const MAX_DAMAGE_MULTIPLIER: f32 = 4.0;

/// Charge ratio from which beams hit things and emit particles.
pub const VISUAL_EFFECT_THRESHOLD: f32 = 0.05;

/// A light pre-strike only lands while its damage times this ratio fits in the target's health.
pub const PRE_STRIKE_HEALTH_RATIO: i64 = 49_132;

/// Charge ratio at which overcharge begins.
const OVERCHARGE_START: f32 = 1.2;

/// Segment exponent; the total decay across `n` segments grows as `n^0.2`.
const SEGMENT_EXPONENT: f64 = -0.8;

/// Linear interpolation between `from` and `to`.
fn lerp(from: f32, to: f32, amount: f32) -> f32 {
    from + (to - from) * amount
}

/// Damage multiplier for a charge ratio in `[0, 1]`.
#[must_use]
pub fn damage_multiplier(charge_ratio: f32) -> f32 {
    let ratio = charge_ratio.clamp(0.0, 1.0);
    lerp(1.0, MAX_DAMAGE_MULTIPLIER, ratio * ratio)
}

/// Charge-derived intensity of a beam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargeLevel {
    /// Charge ratio clamped to `[0, 1]`.
    pub ratio: f32,
    /// Overcharge in `[0, 1]`; rises from 120% to 170% charge.
    pub overcharge: f32,
    /// `1 - overcharge`; below 1 the beam erodes what it touches.
    pub inner_brightness: f32,
}

impl ChargeLevel {
    /// Derives the level from elapsed charge ticks.
    #[must_use]
    pub fn new(charge: f32, max_charge: f32) -> Self {
        let raw = if max_charge > 0.0 {
            charge / max_charge
        } else {
            1.0
        };
        let overcharge = (raw - OVERCHARGE_START).clamp(0.0, 0.5) * 2.0;
        Self {
            ratio: raw.clamp(0.0, 1.0),
            overcharge,
            inner_brightness: 1.0 - overcharge,
        }
    }

    /// Damage multiplier at this level.
    #[must_use]
    pub fn damage_multiplier(&self) -> f32 {
        damage_multiplier(self.ratio)
    }

    /// Whether the beam decays health in place and absorbs projectiles.
    #[must_use]
    pub fn is_eroding(&self) -> bool {
        self.inner_brightness < 1.0
    }

    /// Whether the beam is fully overcharged.
    #[must_use]
    pub fn is_deep(&self) -> bool {
        self.inner_brightness <= 0.0
    }

    /// Whether the beam is charged enough to hit things.
    #[must_use]
    pub fn is_hostile(&self) -> bool {
        self.ratio >= VISUAL_EFFECT_THRESHOLD
    }
}

/// Per-hit retention factors for current and maximum health.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayRates {
    /// Fraction of current health retained per unit of decay exponent.
    pub current: f64,
    /// Fraction of maximum health retained per unit of decay exponent.
    pub maximum: f64,
}

impl DecayRates {
    /// Rates outside erosion mode; only current health decays.
    pub const LIGHT: Self = Self {
        current: 524_287.0 / 524_288.0,
        maximum: 1.0,
    };

    /// Rates in erosion mode.
    pub const EROSION: Self = Self {
        current: 262_143.0 / 262_144.0,
        maximum: 2_097_151.0 / 2_097_152.0,
    };
}

/// Target traits that scale how quickly it decays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Susceptibility {
    /// Bosses decay four times slower.
    pub boss: bool,
    /// Target's own incoming-damage multiplier.
    pub taken_multiplier: f32,
    /// Number of segments sharing one health pool, if segmented.
    pub segments: Option<u16>,
}

/// Number of segments a share is split across, given a raw count.
///
/// 255 collides with the "unassigned" marker in replicated segment state and
/// is bumped to 256.
#[must_use]
pub fn segment_share(count: usize) -> u16 {
    match u16::try_from(count) {
        Ok(255) => 256,
        Ok(count) => count.max(1),
        Err(_) => u16::MAX,
    }
}

/// Composes the decay exponent applied to the decay rates.
#[must_use]
pub fn decay_exponent(damage_multiplier: f32, susceptibility: &Susceptibility) -> f64 {
    let mut exponent = f64::from(damage_multiplier);
    if !susceptibility.boss {
        exponent *= 4.0;
    }
    let taken = f64::from(susceptibility.taken_multiplier);
    if taken > 0.0 {
        exponent *= 2.0 - 1.0 / taken;
    }
    if let Some(segments) = susceptibility.segments {
        exponent *= f64::from(segments.max(1)).powf(SEGMENT_EXPONENT);
    }
    exponent.max(0.0)
}

/// Result of eroding a target's health in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Erosion {
    /// Health after erosion.
    pub life: i32,
    /// Health removed by the decay itself, excluding any finishing blow.
    pub dealt: i32,
    /// Whether the remaining health fell to 2 or below and was zeroed.
    pub finished: bool,
}

/// Decays `life` in place for a beam of the given inner brightness.
///
/// The result never rises above `life`, never falls below 1 from decay
/// alone, and is forced to 0 once it reaches 2 or less.
#[must_use]
pub fn erode(
    life: i32,
    inner_brightness: f32,
    exponent: f64,
    rates: DecayRates,
    draw: f64,
) -> Erosion {
    let strength = f64::from(1.0 - inner_brightness.clamp(0.0, 1.0)) * exponent;
    let decayed = f64::from(life) * rates.current.powf(strength);
    let eroded = (round_weighted(decayed, draw) as i32).clamp(1, life.max(1));
    let dealt = life.saturating_sub(eroded).max(0);
    if eroded <= 2 {
        Erosion {
            life: 0,
            dealt,
            finished: true,
        }
    } else {
        Erosion {
            life: eroded,
            dealt,
            finished: false,
        }
    }
}

/// Unmodified decay damage for a hit on a target with the given health.
#[must_use]
pub fn direct_damage(life: i32, life_max: i32, exponent: f64, rates: DecayRates) -> f64 {
    let current = f64::from(life.max(0)) * (1.0 - rates.current.powf(exponent));
    let maximum = f64::from(life_max.max(0)) * (1.0 - rates.maximum.powf(exponent));
    current + maximum
}

/// Actor-side damage modifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modifiers {
    /// Magic damage multiplier.
    pub damage: f32,
    /// Luck; positive luck adds up to `2 * luck` extra damage.
    pub luck: f32,
    /// Crit chance in percent points; contributes a `1 + chance` factor.
    pub crit_chance: f32,
}

/// Applies modifiers and stochastic rounding to raw decay damage.
///
/// Returns `None` when the result rounds below 1. Results saturate at `i32::MAX`.
#[must_use]
pub fn finalize_damage(raw: f64, modifiers: &Modifiers, luck_draw: f64, round_draw: f64) -> Option<i32> {
    let mut damage = raw * f64::from(modifiers.damage);
    if modifiers.luck > 0.0 {
        damage *= 1.0 + 2.0 * f64::from(modifiers.luck) * luck_draw;
    }
    damage *= 1.0 + f64::from(modifiers.crit_chance);
    let damage = round_weighted(damage, round_draw);
    if !(damage >= 1.0) {
        return None;
    }
    Some(damage.min(f64::from(i32::MAX)) as i32)
}

/// Light pre-strike damage, or `None` when it is small enough to be rolled at random.
#[must_use]
pub fn pre_strike_damage(beam_damage: i32, inner_brightness: f32) -> Option<i32> {
    let damage = ((beam_damage as f32 * (1.0 - inner_brightness) + 1.0) / 2.0) as i32;
    (damage > 1).then_some(damage)
}

/// Whether a pre-strike of `damage` is light enough to land on `life`.
#[must_use]
pub fn pre_strike_lands(damage: i32, life: i32) -> bool {
    i64::from(damage) * PRE_STRIKE_HEALTH_RATIO <= i64::from(life)
}

/// Knockback from a beam whose origin is `distance` away from a target with `hitbox`.
#[must_use]
pub fn knockback(distance: f32, hitbox: Aabb) -> f32 {
    let reach = (hitbox.size().x + hitbox.size().y) / 4.0;
    let gap = distance - reach;
    let spread = (gap * gap + 32_768.0).max(0.0);
    131_072.0 / (spread + 32_768.0) - 0.25
}

/// Strength of the drift applied to absorbed projectiles at squared distance `distance_sq`.
#[must_use]
pub fn drift_strength(distance_sq: f32) -> f32 {
    131_072.0 / (65_536.0 + distance_sq) - 0.15
}

/// Velocity shove applied by eroding beams.
#[must_use]
pub fn shove(direction: Vec2, inner_brightness: f32, strength: f32, draw: f32) -> Vec2 {
    direction * (1.0 - inner_brightness) * (draw + 1.5) * strength * 2.0
}

/// Factor applied to an absorbed projectile's damage, lifetime, and opacity.
///
/// Small projectiles erode faster.
#[must_use]
pub fn projectile_erosion(inner_brightness: f32, area: f32) -> f64 {
    let distance_scale = 32.0 / f64::from(area.max(1.0)).sqrt();
    (15.0_f64 / 16.0).powf(f64::from(1.0 - inner_brightness) * distance_scale)
}

/// Factor applied to an absorbed projectile's scale.
#[must_use]
pub fn projectile_shrink(inner_brightness: f32) -> f32 {
    (31.0_f32 / 32.0).powf(1.0 - inner_brightness)
}

/// Chance per tick that a spreading controller fires a volley.
#[must_use]
pub fn volley_chance(charge: u32, max_charge: u32) -> f32 {
    if max_charge == 0 {
        return 0.4;
    }
    (charge as f32 / max_charge as f32 / 5.0).min(0.4)
}

/// Volley damage weight of a candidate target.
///
/// Fast, healthy, small targets weigh the most; bosses weigh an eighth.
#[must_use]
pub fn volley_damage(life: i32, life_max: i32, speed: f32, hitbox: Aabb, boss: bool) -> f64 {
    let area = f64::from(hitbox.area().max(1.0));
    let weight = 512.0 * (1.0 + f64::from(speed)) * f64::from(life.saturating_add(life_max))
        / area.powf(1.5)
        + 1.0;
    let weight = weight.floor();
    if boss {
        (weight / 8.0).floor()
    } else {
        weight
    }
}

/// Damage of each fragment replacing a shattered projectile.
#[must_use]
pub fn shatter_damage(damage: i32, hitbox: Aabb) -> i32 {
    let scaled = f64::from(damage) * f64::from(hitbox.area()) / 16.0 + 1.0;
    scaled.clamp(1.0, f64::from(i32::MAX)) as i32
}

/// Damage of each fragment in a kill burst.
#[must_use]
pub fn slain_burst_damage(life_max: i32, defense: i32) -> i32 {
    (life_max / 16).saturating_add(defense / 2).saturating_add(1)
}

/// Per-tick resource refund while the swarm is live.
#[must_use]
pub fn mana_refund(mana_max: i32, mana: i32) -> f64 {
    (f64::from(mana_max) * 2.0 - f64::from(mana)) / 300.0
}
