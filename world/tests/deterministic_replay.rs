use std::f32::consts::TAU;

use prism_core::{ActorId, Command, Event, SimConfig, Vec2};
use prism_world::{self as world, query, Projectile, Target, World};

#[test]
fn identical_inputs_replay_identically() {
    let first = replay(SimConfig::default());
    let second = replay(SimConfig::default());

    assert_eq!(first.events.len(), second.events.len());
    assert_eq!(first, second, "replay diverged between runs");
    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, Event::TargetStruck { .. })));
}

#[test]
fn seed_drives_the_random_source() {
    let first = replay(SimConfig {
        seed: 1,
        ..SimConfig::default()
    });
    let second = replay(SimConfig {
        seed: 2,
        ..SimConfig::default()
    });
    assert_ne!(first.events, second.events);
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    lives: Vec<i32>,
    live_entities: usize,
    damage_dealt: i64,
}

fn replay(config: SimConfig) -> ReplayOutcome {
    let mut world = World::new(config).expect("config is valid");
    let actor = world.spawn_actor(Vec2::ZERO);
    populate(&mut world);

    let mut events = Vec::new();
    for command in scripted_commands(actor) {
        world::apply(&mut world, command, &mut events);
    }

    ReplayOutcome {
        lives: query::targets(&world).map(|(_, target)| target.life).collect(),
        live_entities: query::live_entities(&world),
        damage_dealt: query::actor(&world, actor).map_or(0, |a| a.damage_dealt),
        events,
    }
}

fn populate(world: &mut World) {
    for index in 0..8 {
        let angle = TAU * index as f32 / 8.0;
        let center = Vec2::new(angle.cos(), angle.sin()) * 360.0;
        let mut target = Target::new(center, Vec2::splat(32.0), 400 + 100 * index);
        target.knockback_resist = 0.25;
        let _ = world.spawn_target(target);
    }
    for index in 0..12 {
        let center = Vec2::new(500.0 + 20.0 * index as f32, -40.0 + 8.0 * index as f32);
        let velocity = Vec2::new(-2.0, 0.0);
        let _ = world.spawn_projectile(Projectile::hostile(7, center, Vec2::splat(12.0), velocity, 30));
    }
}

fn scripted_commands(actor: ActorId) -> Vec<Command> {
    let mut commands = vec![
        Command::AimAt {
            actor,
            cursor: Vec2::new(360.0, 0.0),
        },
        Command::PrimaryFire { actor },
    ];
    commands.extend(std::iter::repeat(Command::Tick).take(150));
    commands.push(Command::SecondaryFire { actor });
    commands.push(Command::AimAt {
        actor,
        cursor: Vec2::new(0.0, 360.0),
    });
    commands.extend(std::iter::repeat(Command::Tick).take(200));
    commands.push(Command::PrimaryFire { actor });
    commands.extend(std::iter::repeat(Command::Tick).take(50));
    commands.push(Command::RequestDeactivate { actor });
    commands.extend(std::iter::repeat(Command::Tick).take(30));
    commands
}
