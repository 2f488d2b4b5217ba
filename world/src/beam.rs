//! Beams: one ray of a controller's fan.
//!
//! Each tick a beam re-derives its pose from its host controller, resolves
//! its length against terrain, requests cosmetics, strikes the targets in its
//! corridor, and while eroding pulls foreign projectiles into its lifecycle.
//! A beam whose host is gone fades out instead of vanishing.

use log::trace;
use prism_core::{Aabb, ActorId, EntityId, Event, TargetId, Targetable, Vec2};
use prism_system_damage::ChargeLevel;
use prism_system_geometry::{
    angle_of, beam_pose, hitscan_length, rotate, smooth_length, BeamShape, Corridor, HitscanInput,
    MAX_BEAM_SCALE,
};

use crate::{absorption, actor::ActorFrame, strike, World};

/// Length of a freshly spawned beam.
const INITIAL_LENGTH: f32 = 16.0;

/// Fade lost per tick once fading.
const FADE_STEP: f32 = 1.0 / 16.0;

/// Base width of a beam before scaling.
const BEAM_WIDTH: f32 = 18.0;

/// Edge of the small box around the beam origin that always counts as contact.
const CORE_SIZE: f32 = 11.0;

/// Charge ratio, past full charge, at which the hue settles.
const HUE_SETTLE_RATIO: f32 = 1.3;

/// Hue the fan converges to.
const SETTLED_HUE: f32 = 0.75;

/// Dust is pulled back from the beam end by this much per unit of scale.
const DUST_INSET: f32 = 14.5;

/// One ray of a controller's fan.
#[derive(Clone, Debug)]
pub(crate) struct Beam {
    pub(crate) host: EntityId,
    pub(crate) owner: ActorId,
    pub(crate) slot: usize,
    pub(crate) center: Vec2,
    pub(crate) direction: Vec2,
    pub(crate) length: f32,
    pub(crate) scale: f32,
    pub(crate) opacity: f32,
    pub(crate) hue: f32,
    pub(crate) last_scale: f32,
    pub(crate) inner_brightness: f32,
    pub(crate) damage: i32,
    pub(crate) friendly: bool,
    fade: Option<f32>,
}

impl Beam {
    pub(crate) fn new(host: EntityId, owner: ActorId, slot: usize, center: Vec2, direction: Vec2) -> Self {
        Self {
            host,
            owner,
            slot,
            center,
            direction,
            length: INITIAL_LENGTH,
            scale: 0.0,
            opacity: 0.0,
            hue: 0.0,
            last_scale: 0.0,
            inner_brightness: 1.0,
            damage: 0,
            friendly: false,
            fade: None,
        }
    }

    pub(crate) fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Starts fading, reporting whether the beam was still lit.
    pub(crate) fn start_fading(&mut self) -> bool {
        if self.fade.is_some() {
            return false;
        }
        self.fade = Some(1.0);
        true
    }

    pub(crate) fn end(&self) -> Vec2 {
        self.center + self.direction * self.length
    }
}

/// Hue of a slot, drifting toward a shared hue as charge passes full.
pub(crate) fn slot_hue(slot: usize, count: usize, charge_ratio: f32) -> f32 {
    let base = (slot as f32 / count.max(1) as f32) % 1.0;
    let settle = (charge_ratio.clamp(0.0, HUE_SETTLE_RATIO) / HUE_SETTLE_RATIO).powi(4) * 0.9;
    base * (1.0 - settle) + SETTLED_HUE * settle
}

/// What a beam knows about itself and its wielder while it hits things.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Hit {
    pub(crate) host: EntityId,
    pub(crate) owner: ActorId,
    pub(crate) center: Vec2,
    pub(crate) direction: Vec2,
    pub(crate) length: f32,
    pub(crate) scale: f32,
    pub(crate) damage: i32,
    pub(crate) knockback: f32,
    pub(crate) level: ChargeLevel,
    pub(crate) frame: ActorFrame,
}

impl Hit {
    pub(crate) fn end(&self) -> Vec2 {
        self.center + self.direction * self.length
    }

    /// Box around the beam origin; anything overlapping it is in contact.
    pub(crate) fn core(&self) -> Aabb {
        Aabb::new(self.center, Vec2::splat(CORE_SIZE))
    }

    /// Point along the beam as far from the origin as `position` is.
    pub(crate) fn projected(&self, position: Vec2) -> Vec2 {
        self.center + self.direction * (position - self.center).length()
    }
}

/// Host state a beam reads each tick.
struct Host {
    charge: u32,
    center: Vec2,
    velocity: Vec2,
    beam_count: usize,
    damage: i32,
    knockback: f32,
    last_slot: Option<EntityId>,
    frame: ActorFrame,
}

fn host(world: &World, beam: &Beam) -> Option<Host> {
    let controller = world.pool.controller(beam.host)?;
    let actor = world.actors.get(&controller.owner)?;
    let last_slot = controller
        .beam_count
        .checked_sub(1)
        .and_then(|last| controller.beams.get(last).copied().flatten());
    Some(Host {
        charge: controller.charge,
        center: controller.center,
        velocity: controller.velocity,
        beam_count: controller.beam_count,
        damage: controller.damage,
        knockback: controller.knockback,
        last_slot,
        frame: actor.frame(world.config.cursor_dead_zone),
    })
}

/// Advances one beam by a tick.
pub(crate) fn update(world: &mut World, id: EntityId, out_events: &mut Vec<Event>) {
    let Some(beam) = world.pool.beam(id) else {
        return;
    };
    if beam.is_fading() {
        fade(world, id, out_events);
        return;
    }
    let Some(host) = host(world, beam) else {
        if world.pool.beam_mut(id).map_or(false, Beam::start_fading) {
            trace!("beam lost its host and is fading");
            out_events.push(Event::BeamFading { beam: id });
        }
        return;
    };

    let max_length = world.config.max_beam_length;
    let level = ChargeLevel::new(host.charge as f32, world.config.max_charge as f32);
    let shape = BeamShape::at(level.ratio);
    let slot = beam.slot;
    let previous_length = beam.length;
    let pose = beam_pose(
        host.center,
        host.velocity,
        host.charge as f32,
        slot,
        host.beam_count,
        &shape,
    );
    let target_length = hitscan_length(
        world.terrain.as_ref(),
        &HitscanInput {
            origin: pose.origin,
            direction: pose.direction,
            anchor: host.frame.center,
            emitter: host.center,
            charge_ratio: level.ratio,
            inner_brightness: level.inner_brightness,
            scale: shape.scale,
            max_length,
        },
    );
    let length = smooth_length(previous_length, target_length, max_length);
    let damage = (host.damage as f32 * level.damage_multiplier()) as i32;
    let hue = slot_hue(
        slot,
        host.beam_count,
        host.charge as f32 / world.config.max_charge as f32,
    );

    let Some(beam) = world.pool.beam_mut(id) else {
        return;
    };
    beam.center = pose.origin;
    beam.direction = pose.direction;
    beam.length = length;
    beam.scale = shape.scale;
    beam.opacity = shape.opacity;
    beam.hue = hue;
    beam.last_scale = level.ratio;
    beam.inner_brightness = level.inner_brightness;
    beam.damage = damage;
    beam.friendly = level.is_hostile();
    let (friendly, end) = (beam.friendly, beam.end());

    let hit = Hit {
        host: beam.host,
        owner: beam.owner,
        center: pose.origin,
        direction: pose.direction,
        length,
        scale: shape.scale,
        damage,
        knockback: host.knockback,
        level,
        frame: host.frame,
    };

    if level.is_hostile() {
        let cuts = level.ratio < 1.0 || host.last_slot == Some(id);
        cosmetics(world, &hit, end, hue, cuts, out_events);
    }
    if friendly {
        strike_corridor(world, &hit, out_events);
    }
    if level.is_eroding() {
        absorption::sweep(world, &hit, out_events);
    }
}

/// Shrinks a fading beam and removes it once the fade runs out.
fn fade(world: &mut World, id: EntityId, out_events: &mut Vec<Event>) {
    let Some(beam) = world.pool.beam_mut(id) else {
        return;
    };
    let remaining = beam.fade.unwrap_or(0.0);
    if remaining <= 0.0 {
        let _ = world.pool.remove(id);
        out_events.push(Event::BeamRemoved { beam: id });
        return;
    }
    beam.scale = MAX_BEAM_SCALE * beam.last_scale * remaining;
    beam.fade = Some(remaining - FADE_STEP);
}

/// Requests dust near the beam end, a ripple along it, and tile cutting.
fn cosmetics(world: &mut World, hit: &Hit, end: Vec2, hue: f32, cuts: bool, out_events: &mut Vec<Event>) {
    let rotation = angle_of(hit.direction);
    if hit.length * 2.0 <= world.config.max_beam_length {
        let side = if world.rng.coin() { 1.0 } else { -1.0 };
        let speed = world.rng.range_f32(1.0, 1.8);
        let mut scale = world.rng.range_f32(0.7, 1.1);
        let mut velocity = rotate(Vec2::X, rotation + side * std::f32::consts::FRAC_PI_2) * speed;
        if hit.scale > 0.5 {
            velocity *= hit.scale * 2.0;
            scale *= hit.scale * 2.0;
        }
        out_events.push(Event::DustRequested {
            position: hit.center + hit.direction * (hit.length - DUST_INSET * hit.scale),
            velocity,
            hue,
            scale,
        });
    }

    let width = BEAM_WIDTH * hit.scale;
    out_events.push(Event::RippleQueued {
        position: hit.center + rotate(Vec2::new(hit.length * 0.5, 0.0), rotation),
        size: Vec2::new(hit.length, width),
        rotation,
    });
    if cuts {
        out_events.push(Event::TilesCut {
            start: hit.center,
            end,
            width,
        });
    }
}

/// Strikes every eligible target whose hitbox lies in the beam corridor, in slot order.
fn strike_corridor(world: &mut World, hit: &Hit, out_events: &mut Vec<Event>) {
    let core = hit.core();
    let end = hit.end();
    let struck: Vec<TargetId> = world
        .targets
        .iter()
        .filter(|(_, target)| {
            target.is_strikeable()
                && target.accepts_beam(hit.level.inner_brightness)
                && Corridor::Strike.hits(core, target.hitbox(), hit.center, end, hit.scale)
        })
        .map(|(id, _)| id)
        .collect();
    for target in struck {
        strike::resolve(world, hit, target, out_events);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn beam() -> Beam {
        Beam::new(EntityId::default(), ActorId::new(0), 0, Vec2::ZERO, Vec2::X)
    }

    #[test]
    fn fading_is_one_way() {
        let mut beam = beam();
        assert!(!beam.is_fading());
        assert!(beam.start_fading());
        assert!(!beam.start_fading());
        assert!(beam.is_fading());
    }

    #[test]
    fn fresh_beams_are_short() {
        assert_eq!(beam().end(), Vec2::new(INITIAL_LENGTH, 0.0));
    }

    #[test]
    fn hues_spread_by_slot_then_settle() {
        assert_relative_eq!(slot_hue(0, 6, 0.0), 0.0);
        assert_relative_eq!(slot_hue(3, 6, 0.0), 0.5);
        let settled = slot_hue(3, 6, HUE_SETTLE_RATIO);
        assert_relative_eq!(settled, 0.5 * 0.1 + SETTLED_HUE * 0.9, epsilon = 1e-6);
        assert_relative_eq!(slot_hue(3, 6, 5.0), settled, epsilon = 1e-6);
    }
}
