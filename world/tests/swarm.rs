use prism_core::{ActorId, BeamSnapshot, Command, EntityId, Event, SimConfig, Vec2, VOLLEY_KINDS};
use prism_world::{self as world, query, Target, World};

fn armed_world() -> (World, ActorId) {
    let mut world = World::new(SimConfig::default()).expect("default config is valid");
    let actor = world.spawn_actor(Vec2::ZERO);
    (world, actor)
}

fn ticks(world: &mut World, count: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..count {
        world::apply(world, Command::Tick, &mut events);
    }
    events
}

fn beams_spawned(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::BeamSpawned { .. }))
        .count()
}

#[test]
fn focused_fan_fires_on_the_second_charge_tick() {
    let (mut world, actor) = armed_world();
    world::apply(&mut world, Command::PrimaryFire { actor }, &mut Vec::new());

    let first = ticks(&mut world, 1);
    assert_eq!(beams_spawned(&first), 0);

    let second = ticks(&mut world, 1);
    assert_eq!(beams_spawned(&second), 30);

    let snapshot = query::weapon(&world, actor).expect("actor exists");
    assert_eq!(snapshot.beam_count, 30);
    assert!(snapshot.controllers.iter().all(|c| c.beam_count == 6));
    assert_eq!(query::beams(&world).len(), 30);
}

#[test]
fn reconciling_a_settled_fan_spawns_nothing() {
    let (mut world, actor) = armed_world();
    world::apply(&mut world, Command::PrimaryFire { actor }, &mut Vec::new());
    let _ = ticks(&mut world, 2);

    let later = ticks(&mut world, 20);
    assert_eq!(beams_spawned(&later), 0);
    assert_eq!(query::beams(&world).len(), 30);
}

#[test]
fn full_charge_narrows_each_fan() {
    let (mut world, actor) = armed_world();
    world::apply(&mut world, Command::PrimaryFire { actor }, &mut Vec::new());
    let _ = ticks(&mut world, 2);
    let outer: Vec<EntityId> = query::weapon(&world, actor)
        .expect("actor exists")
        .controllers
        .iter()
        .flat_map(|controller| controller.beams[4..].iter().flatten().copied())
        .collect();
    assert_eq!(outer.len(), 10);

    let events = ticks(&mut world, 238);
    assert!(outer.iter().all(|id| query::beam(&world, *id).is_none()));

    let removed = events
        .iter()
        .filter(|event| matches!(event, Event::BeamRemoved { .. }))
        .count();
    assert_eq!(removed, 10);

    let snapshot = query::weapon(&world, actor).expect("actor exists");
    assert_eq!(snapshot.charge_ratio, 1.0);
    assert_eq!(snapshot.beam_count, 20);
    for controller in &snapshot.controllers {
        assert_eq!(controller.beam_count, 4);
        assert!(controller.beams[..4].iter().all(Option::is_some));
        assert!(controller.beams[4..].iter().all(Option::is_none));
    }
}

#[test]
fn beams_brighten_with_charge() {
    let (mut world, actor) = armed_world();
    world::apply(&mut world, Command::PrimaryFire { actor }, &mut Vec::new());
    let _ = ticks(&mut world, 3);
    let early = query::beams(&world);
    let _ = ticks(&mut world, 200);
    let late = query::beams(&world);

    let widest = |beams: &[BeamSnapshot]| {
        beams.iter().map(|beam| beam.scale).fold(0.0_f32, f32::max)
    };
    assert!(widest(&late) > widest(&early));
    assert!(late.iter().all(|beam| beam.damage >= 1));
    assert!(late.iter().all(|beam| (beam.direction.length() - 1.0).abs() < 1e-3));
    assert!(late.iter().all(|beam| beam.length > 16.0));
}

#[test]
fn released_beams_fade_out() {
    let (mut world, actor) = armed_world();
    world::apply(&mut world, Command::PrimaryFire { actor }, &mut Vec::new());
    let _ = ticks(&mut world, 10);
    world::apply(&mut world, Command::PrimaryFire { actor }, &mut Vec::new());

    let events = ticks(&mut world, 1);
    let fading = events
        .iter()
        .filter(|event| matches!(event, Event::BeamFading { .. }))
        .count();
    assert_eq!(fading, 30);
    assert!(query::beams(&world).iter().all(|beam| beam.fading));

    let _ = ticks(&mut world, 30);
    assert!(query::beams(&world).is_empty());
    assert_eq!(query::live_entities(&world), 0);
}

#[test]
fn spreading_swarm_fires_volleys_without_beams() {
    let (mut world, actor) = armed_world();
    let _ = world.spawn_target(Target::new(Vec2::new(600.0, 0.0), Vec2::splat(30.0), 500));
    world::apply(&mut world, Command::SecondaryFire { actor }, &mut Vec::new());

    let events = ticks(&mut world, 300);
    assert_eq!(beams_spawned(&events), 0);

    let volleys: Vec<&Event> = events
        .iter()
        .filter(|event| matches!(event, Event::EffectSpawned { .. }))
        .collect();
    assert!(!volleys.is_empty());
    for volley in volleys {
        if let Event::EffectSpawned { kind, actor: owner, .. } = volley {
            assert!(VOLLEY_KINDS.contains(kind));
            assert_eq!(*owner, actor);
        }
    }
}

#[test]
fn volleys_need_something_to_chase() {
    let (mut world, actor) = armed_world();
    let mut bystander = Target::new(Vec2::new(600.0, 0.0), Vec2::splat(30.0), 500);
    bystander.friendly = true;
    let _ = world.spawn_target(bystander);
    world::apply(&mut world, Command::SecondaryFire { actor }, &mut Vec::new());

    let events = ticks(&mut world, 300);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::EffectSpawned { .. })));
}

#[test]
fn controllers_orbit_their_actor() {
    let (mut world, actor) = armed_world();
    world::apply(&mut world, Command::PrimaryFire { actor }, &mut Vec::new());
    let _ = ticks(&mut world, 240);

    let snapshot = query::weapon(&world, actor).expect("actor exists");
    for controller in &snapshot.controllers {
        let distance = controller.center.length();
        assert!(distance < 200.0, "controller drifted to {distance}");
        assert!((controller.aim.length() - 1.0).abs() < 1e-3);
    }
}
