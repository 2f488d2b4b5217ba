//! Decay strikes: how a beam hit turns into health loss on a target.
//!
//! A hit has three phases. A light pre-strike chips health when it is small
//! against the target. The decay phase computes damage as a fraction of the
//! target's health, eroding it in place while the beam is overcharged. The
//! final strike applies that damage, with knockback and crits, and settles
//! kill credit, bursts, and debuffs.

use log::info;
use prism_core::{Cue, Event, TargetId, Targetable, Vec2, AFFLICTIONS, VICTORY_BUFFS};
use prism_system_damage::{
    decay_exponent, direct_damage, erode, finalize_damage, knockback, pre_strike_damage,
    pre_strike_lands, segment_share, shove, slain_burst_damage, DecayRates, Susceptibility,
};
use prism_system_geometry::normalize_or;

use crate::{beam::Hit, projectile::fragment, Target, World};

/// Loot value added to a target on every hit.
const VALUE_PER_HIT: f32 = 12.5;

/// Loot value multiplier applied on the killing hit.
const SLAIN_VALUE_MULTIPLIER: f32 = 4.0;

/// Fragments in a kill burst.
const BURST_FRAGMENTS: usize = 8;

/// Kill bursts are skipped while fewer slots than this remain free.
const BURST_HEADROOM: usize = 512;

/// Ticks each debuff lasts on a struck target.
const AFFLICTION_TICKS: u32 = 3600;

/// Knockback share of a regular strike.
const KNOCKBACK_SHARE: f32 = 0.5;

/// Knockback share of a crit forced by the target's immunities.
const FORCED_KNOCKBACK_SHARE: f32 = 0.4;

/// Upper bound of the random pre-strike when the computed one is too small.
const PRE_STRIKE_ROLL: i32 = 10;

/// Resolves one beam hit on `id`.
pub(crate) fn resolve(world: &mut World, hit: &Hit, id: TargetId, out_events: &mut Vec<Event>) {
    let Some(mut dealt) = pre_strike(world, hit, id) else {
        return;
    };
    assign_segments(world, id);

    let floor = world
        .pool
        .controller(hit.host)
        .and_then(|controller| controller.registry.floor(id));
    let Some(raw) = decay(world, hit, id, floor, &mut dealt, out_events) else {
        return;
    };

    let luck_draw = if hit.frame.modifiers.luck > 0.0 {
        f64::from(world.rng.unit())
    } else {
        0.0
    };
    let round_draw = f64::from(world.rng.unit());
    let Some(damage) = finalize_damage(raw, &hit.frame.modifiers, luck_draw, round_draw) else {
        return;
    };
    let crit_roll = world.rng.coin();
    let shove_draw = world.rng.unit();

    let Some(target) = world.targets.get_mut(id) else {
        return;
    };
    let (defense, resist) = (target.defense, target.knockback_resist);
    target.defense = 0;
    if hit.level.is_eroding() {
        target.knockback_resist = hit.level.inner_brightness / 2.0 + 0.5;
    }
    let direction = if target.center().x < hit.frame.center.x {
        -1.0
    } else {
        1.0
    };
    let knock = knockback(hit.center.distance(target.position), target.hitbox());
    let forced = target.immortal
        || target.dont_take_damage
        || target.no_tile_collide
        || damage == i32::MAX;
    let share = if forced {
        FORCED_KNOCKBACK_SHARE
    } else {
        KNOCKBACK_SHARE
    };
    dealt = dealt.saturating_add(target.strike(damage, knock * share, direction, forced || crit_roll));

    if hit.level.is_deep() {
        follow_up(target, damage);
    }

    if target.is_alive() {
        target.defense = defense;
        target.knockback_resist = resist;
    }

    if hit.level.is_eroding() {
        target.dont_take_damage = false;
        let push = shove(
            shove_direction(hit, target.position),
            hit.level.inner_brightness,
            knock,
            shove_draw,
        );
        target.velocity += push;
        if target.no_tile_collide {
            target.position += push;
        }
    }
    target.value += VALUE_PER_HIT;

    if target.life <= 0 && !target.slain {
        slay(world, hit, id, &mut dealt, out_events);
    } else {
        for affliction in AFFLICTIONS {
            target.debuffs.grant(affliction, AFFLICTION_TICKS);
        }
    }

    let remaining = world.targets.get(id).map_or(0, |target| target.life);
    if let Some(controller) = world.pool.controller_mut(hit.host) {
        controller.registry.record(id, remaining - 1);
    }
    if let Some(actor) = world.actors.get_mut(&hit.owner) {
        actor.damage_dealt = actor.damage_dealt.saturating_add(i64::from(dealt));
    }
    out_events.push(Event::TargetStruck {
        target: id,
        damage,
        remaining,
    });
}

/// Chips light damage off a healthy target, returning the damage counted so far.
fn pre_strike(world: &mut World, hit: &Hit, id: TargetId) -> Option<i32> {
    let damage = match pre_strike_damage(hit.damage, hit.level.inner_brightness) {
        Some(damage) => damage,
        None => world.rng.range_i32(1, PRE_STRIKE_ROLL),
    };
    let target = world.targets.get_mut(id)?;
    if !pre_strike_lands(damage, target.life) {
        return Some(0);
    }
    let defense = target.defense;
    let before = target.life;
    target.defense = 0;
    let _ = target.strike(damage, 0.0, 0.0, true);
    target.defense = defense;
    Some(before - target.life)
}

/// Counts the segments sharing a health pool once per activation and stamps
/// the share on every one of them.
fn assign_segments(world: &mut World, id: TargetId) {
    let Some(target) = world.targets.get(id) else {
        return;
    };
    let Some(pool) = target.shared_pool else {
        return;
    };
    if target.segment_share.is_some() {
        return;
    }
    let members: Vec<TargetId> = world
        .targets
        .iter()
        .filter(|(_, other)| other.is_alive() && other.shared_pool == Some(pool))
        .map(|(member, _)| member)
        .collect();
    let share = segment_share(members.len());
    for member in members {
        if let Some(other) = world.targets.get_mut(member) {
            other.segment_share = Some(share);
        }
    }
}

/// Computes raw decay damage, eroding the target's health first while the
/// beam is overcharged.
fn decay(
    world: &mut World,
    hit: &Hit,
    id: TargetId,
    floor: Option<i32>,
    dealt: &mut i32,
    out_events: &mut Vec<Event>,
) -> Option<f64> {
    let erosion_draw = if hit.level.is_eroding() {
        f64::from(world.rng.unit())
    } else {
        0.0
    };
    let target = world.targets.get_mut(id)?;
    let exponent = decay_exponent(
        hit.level.damage_multiplier(),
        &Susceptibility {
            boss: target.boss,
            taken_multiplier: target.taken_damage_multiplier,
            segments: target.segment_share,
        },
    );
    if !hit.level.is_eroding() {
        return Some(direct_damage(
            target.life,
            target.life_max,
            exponent,
            DecayRates::LIGHT,
        ));
    }

    let mut eroded = 0;
    if let Some(floor) = floor {
        let floor = floor.max(0);
        if floor < target.life {
            eroded += target.life - floor;
            target.life = floor;
        }
    }
    let erosion = erode(
        target.life,
        hit.level.inner_brightness,
        exponent,
        DecayRates::EROSION,
        erosion_draw,
    );
    eroded += erosion.dealt;
    target.life = erosion.life;
    *dealt = dealt.saturating_add(eroded);
    if eroded > 0 {
        out_events.push(Event::TargetEroded {
            target: id,
            amount: eroded,
        });
    }

    if erosion.finished {
        Some(f64::from(target.life_max))
    } else {
        Some(direct_damage(
            target.life,
            target.life_max,
            exponent,
            DecayRates::EROSION,
        ))
    }
}

/// Deep overcharge follow-up: a forced crit at half damage. Damage already at
/// `i32::MAX` is not halved. Targets that shrug it off lose the difference anyway.
fn follow_up(target: &mut Target, damage: i32) {
    let follow = if damage == i32::MAX { damage } else { damage / 2 };
    let landed = target.strike(follow, 0.0, 0.0, true);
    if landed <= 2 {
        target.life = target.life.saturating_sub(follow.saturating_sub(landed).max(0));
        let _ = target.strike(1, 0.0, 0.0, false);
    }
}

/// Direction an eroding beam shoves things in.
///
/// With the cursor on the actor, things are pushed away from the actor;
/// otherwise they are pushed along the beam.
pub(crate) fn shove_direction(hit: &Hit, position: Vec2) -> Vec2 {
    if hit.frame.cursor_in_dead_zone {
        normalize_or(position - hit.frame.center, hit.direction)
    } else {
        hit.direction
    }
}

/// Credits a kill: rewards the actor and bursts the target into fragments.
fn slay(world: &mut World, hit: &Hit, id: TargetId, dealt: &mut i32, out_events: &mut Vec<Event>) {
    let Some(target) = world.targets.get_mut(id) else {
        return;
    };
    target.slain = true;
    target.value *= SLAIN_VALUE_MULTIPLIER;
    target.immortal = false;
    target.life = 0;
    target.contact_damage = 0;
    *dealt = target.life_max;
    let (value, position) = (target.value, target.position);
    let burst = slain_burst_damage(target.life_max, target.defense);
    info!("target slain by actor {} (value {value})", hit.owner.get());
    out_events.push(Event::TargetSlain {
        target: id,
        actor: hit.owner,
        value,
    });

    if let Some(actor) = world.actors.get_mut(&hit.owner) {
        for buff in VICTORY_BUFFS {
            let ticks = world.rng.range_i32(60, 1800);
            actor.buffs.grant(buff, ticks.unsigned_abs());
        }
    }

    if world.pool.is_near_capacity(BURST_HEADROOM) {
        return;
    }
    let origin = hit.projected(position);
    out_events.push(Event::CueRequested {
        cue: Cue::Shatter,
        position: origin,
    });
    for _ in 0..BURST_FRAGMENTS {
        let shard = fragment(
            &mut world.rng,
            origin,
            burst,
            3..9,
            -2.0 * hit.knockback,
            hit.owner,
        );
        let _ = world.pool.spawn_effect(shard, out_events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy(life: i32) -> Target {
        Target::new(Vec2::ZERO, Vec2::splat(20.0), life)
    }

    #[test]
    fn follow_up_crits_at_half_damage() {
        let mut target = dummy(100);
        follow_up(&mut target, 40);
        assert_eq!(target.life, 60);
    }

    #[test]
    fn follow_up_keeps_saturated_damage_whole() {
        let mut target = dummy(1_000_000);
        follow_up(&mut target, i32::MAX);
        assert!(!target.is_alive());
    }
}
