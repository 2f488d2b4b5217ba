#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the prism charge-weapon simulation.
//!
//! The world owns actors, targets, terrain, and a fixed-capacity pool of
//! controllers, beams, and projectiles. Every mutation flows through
//! [`apply`], which reports what happened as [`Event`] values; [`query`]
//! exposes read-only views for adapters.

mod absorption;
mod actor;
mod beam;
mod controller;
mod pool;
mod projectile;
mod registry;
mod status;
mod strike;
mod target;
mod terrain;
mod volley;
mod weapon;

use std::collections::BTreeMap;

use log::debug;
use prism_core::{
    rng::SimRng, ActorId, Command, ConfigError, EntityId, Event, SimConfig, TargetId, Terrain,
    Toggle, Vec2,
};
use slotmap::SlotMap;

pub use actor::Actor;
pub use projectile::{Owner, Projectile, ProjectileKind};
pub use status::StatusEffects;
pub use target::Target;
pub use terrain::SolidTerrain;
pub use weapon::Weapon;

use pool::{Entity, EntityPool};

/// Represents the authoritative simulation state.
#[derive(Debug)]
pub struct World {
    config: SimConfig,
    rng: SimRng,
    terrain: Box<dyn Terrain>,
    tick_index: u64,
    actors: BTreeMap<ActorId, Actor>,
    next_actor: u32,
    targets: SlotMap<TargetId, Target>,
    pool: EntityPool,
}

impl World {
    /// Creates a world with open terrain after validating `config`.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "world created: seed {:#x}, pool capacity {}",
            config.seed, config.pool_capacity
        );
        Ok(Self {
            rng: SimRng::seeded(config.seed),
            pool: EntityPool::new(config.pool_capacity),
            terrain: Box::new(SolidTerrain::open()),
            tick_index: 0,
            actors: BTreeMap::new(),
            next_actor: 0,
            targets: SlotMap::with_key(),
            config,
        })
    }

    /// Replaces the terrain the beams scan against.
    #[must_use]
    pub fn with_terrain(mut self, terrain: impl Terrain + 'static) -> Self {
        self.terrain = Box::new(terrain);
        self
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Adds an actor holding an idle weapon at `center`.
    pub fn spawn_actor(&mut self, center: Vec2) -> ActorId {
        let id = ActorId::new(self.next_actor);
        self.next_actor = self.next_actor.saturating_add(1);
        let _ = self.actors.insert(id, Actor::new(center, &self.config));
        id
    }

    /// Adds a target.
    pub fn spawn_target(&mut self, target: Target) -> TargetId {
        self.targets.insert(target)
    }

    /// Adds a projectile to the shared pool, or returns `None` when the pool is full.
    pub fn spawn_projectile(&mut self, projectile: Projectile) -> Option<EntityId> {
        self.pool.insert(Entity::Projectile(projectile)).ok()
    }

    /// Mutable access to an actor's environment-owned state.
    pub fn actor_mut(&mut self, actor: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&actor)
    }

    /// Mutable access to a target.
    pub fn target_mut(&mut self, target: TargetId) -> Option<&mut Target> {
        self.targets.get_mut(target)
    }

    /// Mutable access to a pooled projectile.
    pub fn projectile_mut(&mut self, projectile: EntityId) -> Option<&mut Projectile> {
        self.pool.projectile_mut(projectile)
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        for id in self.pool.controller_ids() {
            controller::update(self, id, out_events);
        }
        for id in self.pool.beam_ids() {
            beam::update(self, id, out_events);
        }

        for id in self.pool.projectile_ids() {
            let alive = self
                .pool
                .projectile_mut(id)
                .map_or(false, Projectile::advance);
            if !alive {
                let _ = self.pool.remove(id);
            }
        }

        let mut fallen = Vec::new();
        for (id, target) in &mut self.targets {
            target.advance();
            if !target.is_alive() {
                fallen.push(id);
            }
        }
        for id in fallen {
            let _ = self.targets.remove(id);
            out_events.push(Event::TargetRemoved { target: id });
        }

        for actor in self.actors.values_mut() {
            actor.buffs.tick();
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.tick(out_events),
        Command::PrimaryFire { actor } => weapon::toggle(world, actor, Toggle::Focus, out_events),
        Command::SecondaryFire { actor } => {
            weapon::toggle(world, actor, Toggle::Spread, out_events);
        }
        Command::RequestDeactivate { actor } => {
            weapon::request_deactivate(world, actor, out_events);
        }
        Command::AimAt { actor, cursor } => {
            if let Some(actor) = world.actors.get_mut(&actor) {
                actor.cursor = cursor;
            }
        }
        Command::MoveActor { actor, center } => {
            if let Some(actor) = world.actors.get_mut(&actor) {
                actor.center = center;
            }
        }
        Command::SetHolding { actor, holding } => {
            if let Some(actor) = world.actors.get_mut(&actor) {
                actor.holding = holding;
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use prism_core::{
        ActorId, BeamSnapshot, ControllerSnapshot, EntityId, TargetId, WeaponSnapshot,
    };

    use super::{controller::Controller, weapon, Actor, Projectile, Target, World};

    /// Captures the weapon of `actor` and its live swarm.
    #[must_use]
    pub fn weapon(world: &World, actor: ActorId) -> Option<WeaponSnapshot> {
        let wielder = world.actors.get(&actor)?;
        let controllers: Vec<ControllerSnapshot> = weapon::live_controllers(world, actor)
            .into_iter()
            .filter_map(|id| controller(world, id))
            .collect();
        let charge_ratio = controllers.first().map_or(0.0, |lead| {
            (lead.charge as f32 / world.config.max_charge as f32).clamp(0.0, 1.0)
        });
        let beam_count = controllers
            .iter()
            .flat_map(|snapshot| snapshot.beams.iter().flatten())
            .filter(|id| world.pool.beam(**id).is_some())
            .count();
        Some(WeaponSnapshot {
            actor,
            state: wielder.weapon.state(),
            charge_ratio,
            beam_count,
            controllers,
        })
    }

    /// Captures a single controller.
    #[must_use]
    pub fn controller(world: &World, id: EntityId) -> Option<ControllerSnapshot> {
        world
            .pool
            .controller(id)
            .map(|controller| controller_snapshot(id, controller))
    }

    fn controller_snapshot(id: EntityId, controller: &Controller) -> ControllerSnapshot {
        ControllerSnapshot {
            id,
            actor: controller.owner,
            index: controller.index,
            charge: controller.charge,
            center: controller.center,
            aim: controller.aim(),
            beam_count: controller.beam_count,
            beams: controller.beams.clone(),
        }
    }

    /// Captures every beam in slot order, fading ones included.
    #[must_use]
    pub fn beams(world: &World) -> Vec<BeamSnapshot> {
        world
            .pool
            .beam_ids()
            .into_iter()
            .filter_map(|id| beam(world, id))
            .collect()
    }

    /// Captures a single beam.
    #[must_use]
    pub fn beam(world: &World, id: EntityId) -> Option<BeamSnapshot> {
        let beam = world.pool.beam(id)?;
        Some(BeamSnapshot {
            id,
            controller: beam.host,
            slot: beam.slot,
            origin: beam.center,
            direction: beam.direction,
            length: beam.length,
            scale: beam.scale,
            opacity: beam.opacity,
            hue: beam.hue,
            inner_brightness: beam.inner_brightness,
            damage: beam.damage,
            fading: beam.is_fading(),
        })
    }

    /// Provides read-only access to an actor.
    #[must_use]
    pub fn actor(world: &World, actor: ActorId) -> Option<&Actor> {
        world.actors.get(&actor)
    }

    /// Provides read-only access to a target.
    #[must_use]
    pub fn target(world: &World, target: TargetId) -> Option<&Target> {
        world.targets.get(target)
    }

    /// Enumerates targets in slot order.
    pub fn targets(world: &World) -> impl Iterator<Item = (TargetId, &Target)> + '_ {
        world.targets.iter()
    }

    /// Provides read-only access to a pooled projectile.
    #[must_use]
    pub fn projectile(world: &World, projectile: EntityId) -> Option<&Projectile> {
        world.pool.projectile(projectile)
    }

    /// Enumerates pooled projectiles in slot order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<(EntityId, &Projectile)> {
        world
            .pool
            .projectile_ids()
            .into_iter()
            .filter_map(|id| world.pool.projectile(id).map(|projectile| (id, projectile)))
            .collect()
    }

    /// Number of entities occupying the shared pool.
    #[must_use]
    pub fn live_entities(world: &World) -> usize {
        world.pool.len()
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
