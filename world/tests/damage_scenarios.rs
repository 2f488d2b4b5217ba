use prism_core::{ActorId, Command, Cue, Event, SimConfig, TargetId, Vec2};
use prism_world::{self as world, query, Target, World};

const AIM: Vec2 = Vec2::new(400.0, 0.0);

fn focused_world(target: Target) -> (World, ActorId, TargetId) {
    let mut world = World::new(SimConfig::default()).expect("default config is valid");
    let actor = world.spawn_actor(Vec2::ZERO);
    let target = world.spawn_target(target);
    world::apply(&mut world, Command::AimAt { actor, cursor: AIM }, &mut Vec::new());
    world::apply(&mut world, Command::PrimaryFire { actor }, &mut Vec::new());
    (world, actor, target)
}

fn anchored(life: i32) -> Target {
    let mut target = Target::new(AIM, Vec2::splat(40.0), life);
    target.knockback_resist = 0.0;
    target
}

fn ticks(world: &mut World, count: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..count {
        world::apply(world, Command::Tick, &mut events);
    }
    events
}

fn struck(events: &[Event], id: TargetId) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::TargetStruck { target, .. } if *target == id))
        .count()
}

#[test]
fn charged_beams_decay_a_target_in_their_path() {
    let (mut world, actor, target) = focused_world(anchored(1_000_000));
    let events = ticks(&mut world, 240);

    assert!(struck(&events, target) > 0);
    let victim = query::target(&world, target).expect("target survives");
    assert!(victim.life < 1_000_000);
    assert!(victim.value > 0.0);
    assert!(!victim.debuffs.is_empty());
    assert!(query::actor(&world, actor).expect("actor exists").damage_dealt > 0);

    for event in &events {
        if let Event::TargetStruck {
            damage, remaining, ..
        } = event
        {
            assert!(*damage >= 1);
            assert!(*remaining < 1_000_000);
        }
    }
}

#[test]
fn overcharged_beams_finish_weak_targets() {
    let (mut world, actor, target) = focused_world(anchored(50));
    let events = ticks(&mut world, 400);

    let slain = events.iter().position(|event| {
        matches!(event, Event::TargetSlain { target: id, actor: by, .. } if *id == target && *by == actor)
    });
    let removed = events
        .iter()
        .position(|event| *event == Event::TargetRemoved { target });
    let (Some(slain), Some(removed)) = (slain, removed) else {
        panic!("target was not slain and removed");
    };
    assert!(slain < removed);
    assert!(query::target(&world, target).is_none());

    let burst = &events[slain..removed];
    assert!(burst.iter().any(|event| matches!(
        event,
        Event::CueRequested {
            cue: Cue::Shatter,
            ..
        }
    )));
    let fragments = burst
        .iter()
        .filter(|event| matches!(event, Event::EffectSpawned { .. }))
        .count();
    assert_eq!(fragments, 8);

    let slayings = events
        .iter()
        .filter(|event| matches!(event, Event::TargetSlain { .. }))
        .count();
    assert_eq!(slayings, 1);
}

#[test]
fn friendly_targets_are_never_struck() {
    let mut friend = anchored(1_000);
    friend.friendly = true;
    let (mut world, _, target) = focused_world(friend);
    let events = ticks(&mut world, 300);

    assert_eq!(struck(&events, target), 0);
    assert_eq!(query::target(&world, target).map(|t| t.life), Some(1_000));
}

#[test]
fn damage_immune_targets_shrug_off_uncharged_beams() {
    let mut warded = anchored(1_000_000);
    warded.dont_take_damage = true;
    let (mut world, _, target) = focused_world(warded);
    let events = ticks(&mut world, 240);

    assert_eq!(struck(&events, target), 0);
    assert_eq!(
        query::target(&world, target).map(|t| t.life),
        Some(1_000_000)
    );
}

#[test]
fn targets_behind_walls_are_spared() {
    let wall = prism_core::Aabb::new(Vec2::new(250.0, -400.0), Vec2::new(40.0, 800.0));
    let mut world = World::new(SimConfig::default())
        .expect("default config is valid")
        .with_terrain(world::SolidTerrain::with_solids(vec![wall]));
    let actor = world.spawn_actor(Vec2::ZERO);
    let target = world.spawn_target(anchored(1_000_000));
    world::apply(&mut world, Command::AimAt { actor, cursor: AIM }, &mut Vec::new());
    world::apply(&mut world, Command::PrimaryFire { actor }, &mut Vec::new());

    let events = ticks(&mut world, 240);
    assert_eq!(struck(&events, target), 0);
}
