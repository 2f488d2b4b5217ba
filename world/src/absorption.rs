//! Projectile absorption by eroding beams.
//!
//! Foreign projectiles caught in an eroding beam either change sides (close
//! to the actor) or wither. Withered projectiles shatter into friendly
//! fragments once spent, and survivors drift along the beam.

use prism_core::{Absorbable, Cue, EntityId, Event};
use prism_system_damage::{drift_strength, projectile_erosion, projectile_shrink, shatter_damage, shove};
use prism_system_geometry::Corridor;

use crate::{
    beam::Hit,
    projectile::{fragment, Owner},
    strike::shove_direction,
    World,
};

/// Fragment budget per sweep.
const SHATTER_BUDGET: usize = 6;

/// With fewer free slots than this, a sweep spawns no fragments.
const SHATTER_HEADROOM: usize = 512;

/// Velocity retained by a drifting projectile each tick.
const DRIFT_DAMPING: f32 = 0.92;

/// Sweeps the beam corridor for foreign projectiles and absorbs them.
pub(crate) fn sweep(world: &mut World, hit: &Hit, out_events: &mut Vec<Event>) {
    let mut spawned = if world.pool.is_near_capacity(SHATTER_HEADROOM) {
        SHATTER_BUDGET
    } else {
        0
    };
    let core = hit.core();
    let end = hit.end();
    let hijack_radius = world.config.hijack_radius;

    for id in world.pool.projectile_ids() {
        if world.rng.coin() {
            continue;
        }
        let Some(projectile) = world.pool.projectile(id) else {
            continue;
        };
        if !projectile.is_absorbable()
            || !Corridor::Absorb.hits(core, projectile.hitbox(), hit.center, end, hit.scale)
        {
            continue;
        }

        if projectile.position.distance(hit.frame.center) > hijack_radius {
            wither(world, hit, id, out_events);
        } else {
            hijack(world, hit, id, out_events);
        }

        let Some(projectile) = world.pool.projectile(id) else {
            continue;
        };
        if projectile.pierce <= 0 {
            if spawned < SHATTER_BUDGET {
                spawned = shatter(world, hit, id, spawned, out_events);
            }
        } else {
            drift(world, hit, id);
        }
    }
}

/// Erodes damage, lifetime, opacity, and size; spends the projectile once nothing is left.
fn wither(world: &mut World, hit: &Hit, id: EntityId, out_events: &mut Vec<Event>) {
    let Some(projectile) = world.pool.projectile_mut(id) else {
        return;
    };
    let b = hit.level.inner_brightness;
    let area = projectile.hitbox().area();
    let factor = projectile_erosion(b, area);
    projectile.damage = (f64::from(projectile.damage) * factor) as i32;
    projectile.time_left = (f64::from(projectile.time_left) * factor) as i32;
    projectile.opacity = (f64::from(projectile.opacity) * factor) as f32;
    if projectile.pierce < 0 {
        projectile.pierce = 1;
    }
    if area <= 1.0 || projectile.damage <= 0 || projectile.time_left <= 0 {
        projectile.pierce = 0;
    } else {
        projectile.scale *= projectile_shrink(b);
    }
    out_events.push(Event::ProjectileEroded { projectile: id });
}

/// Turns a projectile close to the actor against its former side.
fn hijack(world: &mut World, hit: &Hit, id: EntityId, out_events: &mut Vec<Event>) {
    let Some(projectile) = world.pool.projectile_mut(id) else {
        return;
    };
    projectile.owner = Owner::Actor(hit.owner);
    projectile.friendly = true;
    projectile.hostile = false;
    projectile.velocity = -projectile.velocity;
    out_events.push(Event::ProjectileHijacked {
        projectile: id,
        actor: hit.owner,
    });
}

/// Replaces a spent projectile with friendly fragments, returning the updated fragment count.
fn shatter(
    world: &mut World,
    hit: &Hit,
    id: EntityId,
    mut spawned: usize,
    out_events: &mut Vec<Event>,
) -> usize {
    let Some(projectile) = world.pool.projectile(id) else {
        return spawned;
    };
    let origin = hit.projected(projectile.position);
    let damage = shatter_damage(projectile.damage, projectile.hitbox());
    let _ = world.pool.remove(id);
    out_events.push(Event::ProjectileShattered { projectile: id });
    out_events.push(Event::CueRequested {
        cue: Cue::Shatter,
        position: origin,
    });

    let mut piece = 0;
    while piece < (SHATTER_BUDGET + 1 - spawned) / 2 {
        piece += 1;
        let shard = fragment(
            &mut world.rng,
            origin,
            damage,
            4..11,
            -2.0 * hit.knockback,
            hit.owner,
        );
        let _ = world.pool.spawn_effect(shard, out_events);
        spawned += 1;
    }
    spawned
}

/// Pulls a surviving projectile along the beam, damping its own motion.
fn drift(world: &mut World, hit: &Hit, id: EntityId) {
    let draw = world.rng.unit();
    let Some(projectile) = world.pool.projectile_mut(id) else {
        return;
    };
    let strength = drift_strength(hit.center.distance_squared(projectile.position));
    let push = shove(
        shove_direction(hit, projectile.position),
        hit.level.inner_brightness,
        strength,
        draw,
    );
    projectile.velocity = projectile.velocity * DRIFT_DAMPING + push;
    projectile.position += push;
}
