//! Swarm coordinator: the weapon that toggles activation and owns the controllers.

use std::f32::consts::TAU;

use log::debug;
use prism_core::{ActivationState, ActorId, Cue, EntityId, Event, Toggle, Vec2};
use prism_system_geometry::{normalize_or, rotate};

use crate::{controller::Controller, pool::Entity, World};

/// Headroom guaranteed in the pool before a swarm is spawned.
const ACTIVATION_HEADROOM: usize = 5;

/// Launch speed of freshly spawned controllers.
const LAUNCH_SPEED: f32 = 16.0;

/// Resource refunded when the swarm is released.
const RELEASE_REFUND: i32 = 32_767;

/// Ticks a refocus pulse stays lit.
pub(crate) const FLASH_TICKS: u8 = 16;

/// The prism weapon held by an actor.
#[derive(Clone, Debug)]
pub struct Weapon {
    state: ActivationState,
    controllers: Vec<Option<EntityId>>,
    /// Base damage of the weapon.
    pub damage: i32,
    /// Base knockback of the weapon.
    pub knockback: f32,
    /// Speed controllers aim with; scales their velocity.
    pub shoot_speed: f32,
}

impl Weapon {
    pub(crate) fn new(controllers: usize) -> Self {
        Self {
            state: ActivationState::Idle,
            controllers: vec![None; controllers],
            damage: 1,
            knockback: 3.5,
            shoot_speed: 32.0,
        }
    }

    /// Current activation state.
    #[must_use]
    pub const fn state(&self) -> ActivationState {
        self.state
    }

    /// Controller handles spawned by the last activation, in swarm order.
    ///
    /// Handles may be stale once a controller has been destroyed.
    #[must_use]
    pub fn controllers(&self) -> &[Option<EntityId>] {
        &self.controllers
    }

    /// Drops to idle, reporting whether the state changed.
    pub(crate) fn reset(&mut self) -> bool {
        let changed = self.state.is_active();
        self.state = ActivationState::Idle;
        changed
    }
}

/// Handles of the actor's controllers that are still alive, in swarm order.
pub(crate) fn live_controllers(world: &World, actor: ActorId) -> Vec<EntityId> {
    world
        .actors
        .get(&actor)
        .map(|wielder| {
            wielder
                .weapon
                .controllers
                .iter()
                .flatten()
                .copied()
                .filter(|id| {
                    world
                        .pool
                        .controller(*id)
                        .map_or(false, |controller| controller.owner == actor)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Flips one activation toggle and reacts to the resulting edge.
pub(crate) fn toggle(world: &mut World, actor: ActorId, toggle: Toggle, out_events: &mut Vec<Event>) {
    let Some(wielder) = world.actors.get_mut(&actor) else {
        return;
    };
    if !wielder.can_use_weapon() {
        return;
    }
    let state = wielder.weapon.state.toggled(toggle);
    wielder.weapon.state = state;
    let position = wielder.center;
    out_events.push(Event::ActivationChanged { actor, state });

    let live = live_controllers(world, actor);
    if live.is_empty() {
        if state.is_active() {
            activate(world, actor, out_events);
        }
        return;
    }

    if !state.is_active() {
        release(world, actor, &live, out_events);
        return;
    }

    if toggle == Toggle::Focus {
        for id in live {
            if let Some(controller) = world.pool.controller_mut(id) {
                controller.flash = FLASH_TICKS;
                out_events.push(Event::Refocused { controller: id });
            }
        }
    }
    let cue = if state == ActivationState::Both {
        Cue::BothEngaged
    } else {
        Cue::Engaged
    };
    out_events.push(Event::CueRequested { cue, position });
}

/// Forces the weapon idle and releases its swarm.
pub(crate) fn request_deactivate(world: &mut World, actor: ActorId, out_events: &mut Vec<Event>) {
    let Some(wielder) = world.actors.get_mut(&actor) else {
        return;
    };
    if wielder.weapon.reset() {
        out_events.push(Event::ActivationChanged {
            actor,
            state: ActivationState::Idle,
        });
    }
    let live = live_controllers(world, actor);
    if !live.is_empty() {
        release(world, actor, &live, out_events);
    }
}

/// Spawns a fresh swarm on the idle-to-active edge.
fn activate(world: &mut World, actor: ActorId, out_events: &mut Vec<Event>) {
    for target in world.targets.values_mut() {
        target.segment_share = None;
    }
    world
        .pool
        .make_room(ACTIVATION_HEADROOM, &mut world.rng, out_events);

    for id in world.pool.controller_ids() {
        let owned = world
            .pool
            .controller(id)
            .map_or(false, |controller| controller.owner == actor);
        if owned && world.pool.remove(id).is_some() {
            out_events.push(Event::ControllerDestroyed {
                actor,
                controller: id,
            });
        }
    }
    for id in world.pool.beam_ids() {
        let faded = world
            .pool
            .beam_mut(id)
            .map_or(false, |beam| beam.owner == actor && beam.start_fading());
        if faded {
            out_events.push(Event::BeamFading { beam: id });
        }
    }

    let Some(wielder) = world.actors.get(&actor) else {
        return;
    };
    let center = wielder.center;
    let launch = normalize_or(wielder.cursor - center, Vec2::ZERO) * LAUNCH_SPEED;
    let (damage, knockback) = (wielder.weapon.damage, wielder.weapon.knockback);
    let count = world.config.controllers_per_weapon;
    let beams = world.config.beams_per_controller;

    let mut slots = Vec::with_capacity(count);
    for index in 0..count {
        let velocity = rotate(launch, TAU * index as f32 / count as f32);
        let controller = Controller::new(actor, index, center, velocity, beams, damage, knockback);
        let id = world
            .pool
            .spawn(Entity::Controller(controller), out_events);
        if let Some(controller) = id {
            out_events.push(Event::ControllerSpawned {
                actor,
                controller,
                index,
            });
        }
        slots.push(id);
    }
    debug!(
        "actor {} activated a swarm of {} controllers",
        actor.get(),
        slots.iter().flatten().count()
    );

    if let Some(wielder) = world.actors.get_mut(&actor) {
        wielder.weapon.controllers = slots;
        wielder.mana = 0;
    }
}

/// Tears the swarm down on the active-to-idle edge and refunds the resource pool.
fn release(world: &mut World, actor: ActorId, live: &[EntityId], out_events: &mut Vec<Event>) {
    for id in live {
        if world.pool.remove(*id).is_some() {
            out_events.push(Event::ControllerDestroyed {
                actor,
                controller: *id,
            });
        }
    }
    let Some(wielder) = world.actors.get_mut(&actor) else {
        return;
    };
    wielder.weapon.controllers.fill(None);
    wielder.mana = wielder
        .mana
        .saturating_add(RELEASE_REFUND)
        .min(wielder.mana_max.max(wielder.mana));
    out_events.push(Event::CueRequested {
        cue: Cue::Released,
        position: wielder.center,
    });
    debug!("actor {} released its swarm", actor.get());
}
