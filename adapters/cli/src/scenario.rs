//! Headless scenario: one actor, a ring of targets, and a stream of hostile shots.

use std::{f32::consts::TAU, fmt};

use clap::ValueEnum;
use log::{debug, info};
use prism_core::{ActivationState, Command, Event, SimConfig, Vec2};
use prism_world::{self as world, query, Projectile, Target, World};

/// Radius of the target ring around the actor.
const RING_RADIUS: f32 = 360.0;

/// Distance at which hostile shots enter the scene.
const HOSTILE_RANGE: f32 = 900.0;

/// Ticks between two hostile shots.
const HOSTILE_PERIOD: u32 = 12;

/// Speed of hostile shots.
const HOSTILE_SPEED: f32 = 3.0;

/// Foreign projectile code used for hostile shots.
const HOSTILE_CODE: u16 = 83;

/// Which toggles the scripted actor holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Mode {
    /// Primary fire only: beams.
    Focus,
    /// Secondary fire only: volleys.
    Spread,
    /// Both toggles.
    Both,
}

impl Mode {
    fn commands(self, actor: prism_core::ActorId) -> Vec<Command> {
        match self {
            Self::Focus => vec![Command::PrimaryFire { actor }],
            Self::Spread => vec![Command::SecondaryFire { actor }],
            Self::Both => vec![
                Command::PrimaryFire { actor },
                Command::SecondaryFire { actor },
            ],
        }
    }
}

/// Parameters of a scripted run.
#[derive(Clone, Debug)]
pub(crate) struct Scenario {
    pub(crate) config: SimConfig,
    pub(crate) ticks: u32,
    pub(crate) mode: Mode,
    pub(crate) targets: usize,
    pub(crate) hostiles: usize,
}

/// Tally of what happened during a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) slain: usize,
    pub(crate) struck: usize,
    pub(crate) hijacked: usize,
    pub(crate) eroded: usize,
    pub(crate) shattered: usize,
    pub(crate) effects: usize,
    pub(crate) evicted: usize,
    pub(crate) damage_dealt: i64,
    pub(crate) live_beams: usize,
    pub(crate) state: Option<ActivationState>,
}

impl Summary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TargetSlain { .. } => self.slain += 1,
                Event::TargetStruck { .. } => self.struck += 1,
                Event::ProjectileHijacked { .. } => self.hijacked += 1,
                Event::ProjectileEroded { .. } => self.eroded += 1,
                Event::ProjectileShattered { .. } => self.shattered += 1,
                Event::EffectSpawned { .. } => self.effects += 1,
                Event::EntityEvicted { .. } => self.evicted += 1,
                _ => {}
            }
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:            {}", self.ticks)?;
        writeln!(f, "targets slain:    {}", self.slain)?;
        writeln!(f, "decay hits:       {}", self.struck)?;
        writeln!(f, "damage dealt:     {}", self.damage_dealt)?;
        writeln!(f, "shots hijacked:   {}", self.hijacked)?;
        writeln!(f, "shots eroded:     {}", self.eroded)?;
        writeln!(f, "shots shattered:  {}", self.shattered)?;
        writeln!(f, "effects spawned:  {}", self.effects)?;
        writeln!(f, "pool evictions:   {}", self.evicted)?;
        writeln!(f, "live beams:       {}", self.live_beams)?;
        match self.state {
            Some(state) => write!(f, "activation:       {state:?}"),
            None => write!(f, "activation:       none"),
        }
    }
}

impl Scenario {
    /// Builds the world, plays the script, and tallies the outcome.
    pub(crate) fn run(&self) -> anyhow::Result<Summary> {
        let mut world = World::new(self.config.clone())?;
        let actor = world.spawn_actor(Vec2::ZERO);
        self.place_targets(&mut world);

        let mut summary = Summary::default();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::AimAt {
                actor,
                cursor: Vec2::new(RING_RADIUS, 0.0),
            },
            &mut events,
        );
        for command in self.mode.commands(actor) {
            world::apply(&mut world, command, &mut events);
        }
        summary.record(&events);

        let mut fired = 0;
        for tick in 0..self.ticks {
            if fired < self.hostiles && tick % HOSTILE_PERIOD == 0 {
                if self.fire_hostile(&mut world, fired) {
                    fired += 1;
                }
            }
            events.clear();
            world::apply(&mut world, Command::Tick, &mut events);
            summary.record(&events);
            if let Some(cursor) = self.sweep_cursor(&world) {
                world::apply(&mut world, Command::AimAt { actor, cursor }, &mut events);
            }
        }

        let weapon = query::weapon(&world, actor);
        summary.ticks = query::tick_index(&world);
        summary.live_beams = weapon.as_ref().map_or(0, |snapshot| snapshot.beam_count);
        summary.state = weapon.map(|snapshot| snapshot.state);
        summary.damage_dealt = query::actor(&world, actor).map_or(0, |wielder| wielder.damage_dealt);
        info!("scenario finished after {} ticks", summary.ticks);
        Ok(summary)
    }

    fn place_targets(&self, world: &mut World) {
        let count = self.targets.max(1) as f32;
        for index in 0..self.targets {
            let angle = TAU * index as f32 / count;
            let center = Vec2::new(angle.cos(), angle.sin()) * RING_RADIUS;
            let mut target = Target::new(center, Vec2::splat(36.0), 600 + 150 * index as i32);
            target.defense = 8;
            target.knockback_resist = 0.3;
            let _ = world.spawn_target(target);
        }
        debug!("placed {} targets", self.targets);
    }

    fn fire_hostile(&self, world: &mut World, index: usize) -> bool {
        let angle = TAU * (index as f32 * 0.382).fract();
        let heading = Vec2::new(angle.cos(), angle.sin());
        let shot = Projectile::hostile(
            HOSTILE_CODE,
            heading * HOSTILE_RANGE,
            Vec2::splat(14.0),
            -heading * HOSTILE_SPEED,
            40,
        );
        world.spawn_projectile(shot).is_some()
    }

    /// Keeps the cursor on the first target still standing.
    fn sweep_cursor(&self, world: &World) -> Option<Vec2> {
        query::targets(world)
            .find(|(_, target)| target.is_alive())
            .map(|(_, target)| target.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(mode: Mode) -> Scenario {
        Scenario {
            config: SimConfig::default(),
            ticks: 90,
            mode,
            targets: 4,
            hostiles: 3,
        }
    }

    #[test]
    fn summary_counts_relevant_events() {
        let mut summary = Summary::default();
        summary.record(&[
            Event::SpawnSkipped,
            Event::TimeAdvanced { tick: 1 },
            Event::TargetStruck {
                target: prism_core::TargetId::default(),
                damage: 3,
                remaining: 10,
            },
        ]);
        assert_eq!(summary.struck, 1);
        assert_eq!(summary.slain, 0);
    }

    #[test]
    fn modes_map_to_toggles() {
        let actor = prism_core::ActorId::new(0);
        assert_eq!(Mode::Both.commands(actor).len(), 2);
        assert_eq!(
            Mode::Spread.commands(actor),
            vec![Command::SecondaryFire { actor }]
        );
    }

    #[test]
    fn focus_run_ends_with_a_live_swarm() {
        let summary = scenario(Mode::Focus).run().expect("scenario runs");
        assert_eq!(summary.ticks, 90);
        assert_eq!(summary.state, Some(ActivationState::Focus));
        assert!(summary.live_beams > 0);
    }

    #[test]
    fn spread_run_fires_no_beams() {
        let summary = scenario(Mode::Spread).run().expect("scenario runs");
        assert_eq!(summary.state, Some(ActivationState::Spread));
        assert_eq!(summary.live_beams, 0);
    }
}
