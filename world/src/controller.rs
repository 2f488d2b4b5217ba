//! Controllers: the orbiting prisms that charge up and hold a fan of beams.

use std::f32::consts::FRAC_PI_2;

use log::{debug, trace};
use prism_core::{ActivationState, ActorId, Aabb, Cue, EntityId, Event, Vec2};
use prism_system_damage::mana_refund;
use prism_system_geometry::{angle_of, blend_aim, normalize_or, Orbit};

use crate::{
    actor::ActorFrame, beam::Beam, pool::Entity, registry::TargetRegistry, volley, World,
};

/// Hitbox edge of a controller.
const CONTROLLER_SIZE: f32 = 22.0;

/// Aim changes larger than this request an authoritative sync.
const SYNC_THRESHOLD: f32 = 0.0625;

/// Charge tick on which the first full fan of beams appears.
const FIRE_CHARGE: u32 = 2;

/// Headroom guaranteed before a full fan is fired.
const FIRE_HEADROOM: usize = 5;

/// Headroom guaranteed before each replacement beam.
const RESPAWN_HEADROOM: usize = 1;

/// Charge tick of the lead controller's peak cue while focused.
const PEAK_CUE_CHARGE: u32 = 303;

/// Period of the lead controller's pulse and hum cues.
const CUE_PERIOD: u32 = 28;

/// One orbiting prism of a swarm.
#[derive(Clone, Debug)]
pub(crate) struct Controller {
    pub(crate) owner: ActorId,
    pub(crate) index: usize,
    pub(crate) charge: u32,
    pub(crate) center: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) orbit: Orbit,
    pub(crate) beams: Vec<Option<EntityId>>,
    pub(crate) beam_count: usize,
    pub(crate) damage: i32,
    pub(crate) knockback: f32,
    pub(crate) flash: u8,
    pub(crate) registry: TargetRegistry,
}

impl Controller {
    pub(crate) fn new(
        owner: ActorId,
        index: usize,
        center: Vec2,
        velocity: Vec2,
        beam_slots: usize,
        damage: i32,
        knockback: f32,
    ) -> Self {
        Self {
            owner,
            index,
            charge: 0,
            center,
            velocity,
            orbit: Orbit::default(),
            beams: vec![None; beam_slots],
            beam_count: 0,
            damage,
            knockback,
            flash: 0,
            registry: TargetRegistry::new(),
        }
    }

    pub(crate) fn hitbox(&self) -> Aabb {
        Aabb::from_center(self.center, Vec2::splat(CONTROLLER_SIZE))
    }

    /// Unit aim direction.
    pub(crate) fn aim(&self) -> Vec2 {
        normalize_or(self.velocity, Vec2::ZERO)
    }
}

/// Advances one controller by a tick.
pub(crate) fn update(world: &mut World, id: EntityId, out_events: &mut Vec<Event>) {
    let Some(owner) = world.pool.controller(id).map(|controller| controller.owner) else {
        return;
    };
    let frame = match world.actors.get(&owner) {
        Some(actor) if actor.can_use_weapon() => actor.frame(world.config.cursor_dead_zone),
        _ => {
            dismiss(world, id, owner, out_events);
            return;
        }
    };

    let orbit_distance = world.config.orbit_max_distance;
    let targets = &world.targets;
    let Some(controller) = world.pool.controller_mut(id) else {
        return;
    };
    let emitter = frame.center + controller.orbit.offset(orbit_distance);
    controller.charge = controller.charge.saturating_add(1);
    controller.damage = frame.damage;
    controller.knockback = frame.knockback;
    controller.registry.refresh(targets.iter());
    controller.orbit.advance(frame.attack_speed);
    controller.center = frame.center + controller.orbit.offset(orbit_distance) - controller.velocity;
    if controller.charge == 1 {
        controller.orbit.set_angle(angle_of(controller.velocity) + FRAC_PI_2);
    }
    let (charge, index, center) = (controller.charge, controller.index, controller.center);

    if index == 0 {
        if let Some(cue) = charge_cue(charge, frame.state) {
            out_events.push(Event::CueRequested {
                cue,
                position: center,
            });
        }
    }

    if frame.state.focus() {
        maintain_beams(world, id, charge, out_events);
    } else {
        release_beams(world, id, out_events);
    }

    if let Some(controller) = world.pool.controller_mut(id) {
        controller.flash = controller.flash.saturating_sub(1);
    }

    if frame.state.spread() {
        volley::fire(world, id, emitter, &frame, out_events);
    }

    update_aim(world, id, emitter, &frame, out_events);
    refund(world, owner);
}

/// Cue the lead controller requests on this charge tick, if any.
fn charge_cue(charge: u32, state: ActivationState) -> Option<Cue> {
    if charge == PEAK_CUE_CHARGE && state.focus() {
        Some(Cue::FocusPeak)
    } else if charge == 1 {
        Some(Cue::ChargeStart)
    } else if charge % CUE_PERIOD == 1 && state.spread() {
        Some(Cue::SpreadPulse)
    } else if charge % CUE_PERIOD == 15 && state.focus() {
        Some(Cue::FocusHum)
    } else {
        None
    }
}

/// Destroys a controller whose actor can no longer wield the weapon.
fn dismiss(world: &mut World, id: EntityId, owner: ActorId, out_events: &mut Vec<Event>) {
    if world.pool.remove(id).is_some() {
        out_events.push(Event::ControllerDestroyed {
            actor: owner,
            controller: id,
        });
        debug!("controller dismissed: actor {} cannot wield", owner.get());
    }
    if let Some(actor) = world.actors.get_mut(&owner) {
        if actor.weapon.reset() {
            out_events.push(Event::ActivationChanged {
                actor: owner,
                state: ActivationState::Idle,
            });
        }
    }
}

/// Keeps the focused fan populated: trims it at full charge, fires it on the
/// second charge tick, and reconciles it afterwards.
fn maintain_beams(world: &mut World, id: EntityId, charge: u32, out_events: &mut Vec<Event>) {
    let nominal = if charge >= world.config.max_charge {
        world.config.focused_beam_count
    } else {
        world.config.beams_per_controller
    };
    trim(world, id, nominal, out_events);
    if let Some(controller) = world.pool.controller_mut(id) {
        controller.beam_count = nominal.min(controller.beams.len());
    }

    if charge == FIRE_CHARGE {
        world.pool.make_room(FIRE_HEADROOM, &mut world.rng, out_events);
        reconcile(world, id, 0, out_events);
    } else if charge > FIRE_CHARGE {
        reconcile(world, id, RESPAWN_HEADROOM, out_events);
    }
}

/// Hard-removes beams in slots at or past `keep`.
fn trim(world: &mut World, id: EntityId, keep: usize, out_events: &mut Vec<Event>) {
    let Some(controller) = world.pool.controller_mut(id) else {
        return;
    };
    let dropped: Vec<EntityId> = controller
        .beams
        .iter_mut()
        .skip(keep)
        .filter_map(Option::take)
        .collect();
    for beam in dropped {
        if world.pool.remove(beam).is_some() {
            out_events.push(Event::BeamRemoved { beam });
        }
    }
}

/// Ensures every active slot holds a live, non-fading beam.
///
/// Running it twice without a state change in between leaves the slots as
/// they were after the first run.
pub(crate) fn reconcile(world: &mut World, id: EntityId, headroom: usize, out_events: &mut Vec<Event>) {
    let Some((count, slots)) = world
        .pool
        .controller(id)
        .map(|controller| (controller.beam_count, controller.beams.clone()))
    else {
        return;
    };

    for (slot, current) in slots.into_iter().enumerate().take(count) {
        let live = current
            .and_then(|beam| world.pool.beam(beam))
            .map_or(false, |beam| !beam.is_fading());
        if live {
            continue;
        }
        if let Some(stale) = current {
            if world.pool.remove(stale).is_some() {
                out_events.push(Event::BeamRemoved { beam: stale });
            }
        }
        world.pool.make_room(headroom, &mut world.rng, out_events);
        let beam = spawn_beam(world, id, slot, out_events);
        if let Some(entry) = world
            .pool
            .controller_mut(id)
            .and_then(|controller| controller.beams.get_mut(slot))
        {
            *entry = beam;
        }
    }
}

fn spawn_beam(world: &mut World, host: EntityId, slot: usize, out_events: &mut Vec<Event>) -> Option<EntityId> {
    let controller = world.pool.controller(host)?;
    let beam = Beam::new(host, controller.owner, slot, controller.center, controller.aim());
    let id = world.pool.spawn(Entity::Beam(beam), out_events)?;
    trace!("beam spawned in slot {slot}");
    out_events.push(Event::BeamSpawned {
        controller: host,
        beam: id,
        slot,
    });
    Some(id)
}

/// Fades every beam of the fan and empties its slots.
fn release_beams(world: &mut World, id: EntityId, out_events: &mut Vec<Event>) {
    let Some(controller) = world.pool.controller_mut(id) else {
        return;
    };
    controller.beam_count = 0;
    let released: Vec<EntityId> = controller.beams.iter_mut().filter_map(Option::take).collect();
    for beam in released {
        let faded = world.pool.beam_mut(beam).map_or(false, Beam::start_fading);
        if faded {
            out_events.push(Event::BeamFading { beam });
        }
    }
}

/// Sweeps the aim toward the cursor, or outward from the actor while only spreading.
fn update_aim(
    world: &mut World,
    id: EntityId,
    emitter: Vec2,
    frame: &ActorFrame,
    out_events: &mut Vec<Event>,
) {
    let responsiveness = world.config.aim_responsiveness;
    let Some(controller) = world.pool.controller_mut(id) else {
        return;
    };
    let target = if frame.state == ActivationState::Spread {
        normalize_or(emitter - frame.center, controller.center - frame.center)
    } else {
        normalize_or(frame.cursor - emitter, frame.cursor - controller.center)
    };
    let velocity = blend_aim(controller.velocity, target, responsiveness) * frame.shoot_speed;
    let changed = (velocity - controller.velocity).length() > SYNC_THRESHOLD;
    controller.velocity = velocity;
    if changed {
        out_events.push(Event::SyncRequested { entity: id });
    }
}

/// Trickles resource back into the actor's pool, rounding the fraction at random.
fn refund(world: &mut World, owner: ActorId) {
    let Some(actor) = world.actors.get(&owner) else {
        return;
    };
    let owed = mana_refund(actor.mana_max, actor.mana);
    let amount = world.rng.round(owed);
    if let Some(actor) = world.actors.get_mut(&owner) {
        let ceiling = f64::from(actor.mana_max.max(actor.mana));
        actor.mana = (f64::from(actor.mana) + amount).min(ceiling) as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_cues_follow_charge() {
        assert_eq!(charge_cue(1, ActivationState::Focus), Some(Cue::ChargeStart));
        assert_eq!(charge_cue(303, ActivationState::Focus), Some(Cue::FocusPeak));
        assert_eq!(charge_cue(303, ActivationState::Spread), None);
        assert_eq!(charge_cue(29, ActivationState::Spread), Some(Cue::SpreadPulse));
        assert_eq!(charge_cue(29, ActivationState::Focus), None);
        assert_eq!(charge_cue(43, ActivationState::Both), Some(Cue::FocusHum));
        assert_eq!(charge_cue(44, ActivationState::Both), None);
    }

    #[test]
    fn new_controllers_start_uncharged_and_empty() {
        let controller = Controller::new(ActorId::new(0), 2, Vec2::ZERO, Vec2::new(0.0, 16.0), 6, 1, 3.5);
        assert_eq!(controller.charge, 0);
        assert_eq!(controller.beams, vec![None; 6]);
        assert_eq!(controller.aim(), Vec2::Y);
        assert_eq!(controller.hitbox().size(), Vec2::splat(CONTROLLER_SIZE));
    }

    #[test]
    fn reconciling_twice_in_one_tick_fills_an_emptied_slot_once() {
        use prism_core::{Command, SimConfig};

        let mut world = World::new(SimConfig::default()).expect("default config is valid");
        let actor = world.spawn_actor(Vec2::ZERO);
        let mut events = Vec::new();
        crate::apply(&mut world, Command::PrimaryFire { actor }, &mut events);
        for _ in 0..3 {
            crate::apply(&mut world, Command::Tick, &mut events);
        }

        let id = world.pool.controller_ids()[0];
        let slots = |world: &World| world.pool.controller(id).map(|c| c.beams.clone());
        let before = slots(&world).expect("controller is alive");
        let emptied = before[2].expect("fan is full");
        let _ = world.pool.remove(emptied);

        events.clear();
        reconcile(&mut world, id, RESPAWN_HEADROOM, &mut events);
        let first = slots(&world).expect("controller is alive");
        reconcile(&mut world, id, RESPAWN_HEADROOM, &mut events);
        let second = slots(&world).expect("controller is alive");

        assert_eq!(first, second);
        assert_ne!(first[2], Some(emptied));
        assert_eq!(first.iter().flatten().count(), 6);
        let spawned = events
            .iter()
            .filter(|event| matches!(event, Event::BeamSpawned { .. }))
            .count();
        assert_eq!(spawned, 1);
    }
}
