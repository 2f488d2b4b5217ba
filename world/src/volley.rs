//! Homing volleys fired by spreading controllers.

use log::trace;
use prism_core::{
    Aabb, Cue, EntityId, Event, TargetId, Targetable, Vec2, VOLLEY_CUE_VARIANTS, VOLLEY_KINDS,
};
use prism_system_damage::{volley_chance, volley_damage};
use prism_system_geometry::{intercept_point, normalize_or};

use crate::{actor::ActorFrame, projectile::Projectile, target::Target, weapon::FLASH_TICKS, World};

/// Volleys are held back while fewer slots than this remain free.
const VOLLEY_HEADROOM: usize = 256;

/// Farthest distance at which a volley picks a target.
const VOLLEY_RANGE: f32 = 2400.0;

/// Launch speed of a volley.
const VOLLEY_SPEED: f32 = 16.0;

/// Each candidate has a 1-in-N chance of displacing the current pick.
const OVERRIDE_ODDS: u32 = 5;

/// A volley cue plays with a 1-in-N chance.
const CUE_ODDS: u32 = 3;

/// Height above the actor at which volley cues play, attenuating them.
const CUE_ATTENUATION: f32 = 2400.0;

/// Rolls for a volley and, when one fires, launches it from `emitter`.
pub(crate) fn fire(
    world: &mut World,
    id: EntityId,
    emitter: Vec2,
    frame: &ActorFrame,
    out_events: &mut Vec<Event>,
) {
    let Some(controller) = world.pool.controller(id) else {
        return;
    };
    let (owner, charge, hitbox, center) = (
        controller.owner,
        controller.charge,
        controller.hitbox(),
        controller.center,
    );
    let (scale, knockback) = (controller.damage, controller.knockback);

    let chance = volley_chance(charge, world.config.max_charge);
    if !(world.rng.unit() < chance) || world.pool.is_near_capacity(VOLLEY_HEADROOM) {
        return;
    }

    let Some((target, weight)) = pick_target(world, hitbox, center, frame) else {
        return;
    };
    let damage = world.rng.round(weight * f64::from(scale));
    let damage = damage.min(f64::from(i32::MAX)) as i32;
    if damage <= 0 {
        return;
    }
    let Some(victim) = world.targets.get(target) else {
        return;
    };

    let aim_point = intercept_point(emitter, victim.center(), victim.velocity, VOLLEY_SPEED)
        .filter(|point| {
            world.terrain.can_hit_line(
                hitbox.resized(0.5),
                Aabb::new(*point, victim.size * 0.5),
            )
        })
        .unwrap_or_else(|| victim.center());
    let velocity = normalize_or(aim_point - emitter, victim.center() - emitter) * VOLLEY_SPEED;

    let Some(kind) = world.rng.pick(&VOLLEY_KINDS) else {
        return;
    };
    let volley = Projectile::effect(kind, emitter, velocity, damage, -2.0 * knockback, owner);
    if world.pool.spawn_effect(volley, out_events).is_none() {
        return;
    }
    trace!("volley of {damage} launched by actor {}", owner.get());

    if let Some(controller) = world.pool.controller_mut(id) {
        controller.flash = FLASH_TICKS;
    }
    if world.rng.one_in(CUE_ODDS) {
        let variant = world.rng.below(usize::from(VOLLEY_CUE_VARIANTS)) as u8;
        out_events.push(Event::CueRequested {
            cue: Cue::Volley { variant },
            position: frame.center - Vec2::new(0.0, CUE_ATTENUATION),
        });
    }
}

/// Picks the volley target and the heaviest damage weight among accepted candidates.
///
/// A designated attack target in line of sight wins outright. Otherwise the
/// nearest chaseable target in range is preferred, but every candidate also
/// gets a random chance to displace the current pick even when farther away.
fn pick_target(
    world: &mut World,
    hitbox: Aabb,
    center: Vec2,
    frame: &ActorFrame,
) -> Option<(TargetId, f64)> {
    if let Some(designated) = frame.attack_target {
        if let Some(target) = world.targets.get(designated) {
            let in_sight = world
                .terrain
                .can_hit_line(hitbox.resized(0.5), target.hitbox().resized(0.5));
            if target.is_alive() && in_sight {
                return Some((designated, weight(target)));
            }
        }
    }

    let mut best: Option<(TargetId, f32)> = None;
    let mut heaviest = 0.0_f64;
    for (id, target) in &world.targets {
        if !target.can_be_chased() {
            continue;
        }
        let distance = target.center().distance(center);
        let displaces = world.rng.one_in(OVERRIDE_ODDS);
        let preferred = match best {
            None => true,
            Some((_, nearest)) => displaces || distance < nearest,
        };
        if preferred
            && distance < VOLLEY_RANGE
            && world.terrain.can_hit_line(hitbox, target.hitbox())
        {
            best = Some((id, distance));
            heaviest = heaviest.max(weight(target));
        }
    }
    best.map(|(id, _)| (id, heaviest))
}

fn weight(target: &Target) -> f64 {
    volley_damage(
        target.life,
        target.life_max,
        target.velocity.length(),
        target.hitbox(),
        target.boss,
    )
}
