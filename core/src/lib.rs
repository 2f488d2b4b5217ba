#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the prism charge-weapon simulation.
//!
//! This crate defines the message surface that connects adapters and the
//! authoritative world. Adapters submit [`Command`] values describing player
//! input, the world executes those commands via its `apply` entry point, and
//! then broadcasts [`Event`] values describing state changes and cosmetic
//! requests (cues, dust, ripples, tile cuts) for presentation layers to
//! consume. Read-only snapshots expose weapon, controller, and beam state.

mod activation;
mod catalog;
mod config;
pub mod rng;
mod services;
mod shapes;

use serde::{Deserialize, Serialize};

pub use activation::{ActivationState, Toggle};
pub use catalog::{
    BuffId, Cue, EffectKind, AFFLICTIONS, SHATTER_KINDS, VICTORY_BUFFS, VOLLEY_CUE_VARIANTS,
    VOLLEY_KINDS,
};
pub use config::{ConfigError, SimConfig};
pub use glam::Vec2;
pub use services::{Absorbable, Targetable, Terrain};
pub use shapes::Aabb;

slotmap::new_key_type! {
    /// Generation-checked handle to a pooled entity (controller, beam, or projectile).
    pub struct EntityId;

    /// Generation-checked handle to a target in the world.
    pub struct TargetId;
}

/// Identifier of an actor wielding a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Commands that express all permissible input-driven world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one fixed tick.
    Tick,
    /// Primary fire input; flips the focus toggle.
    PrimaryFire {
        /// Actor whose weapon receives the input.
        actor: ActorId,
    },
    /// Secondary fire input; flips the spread toggle.
    SecondaryFire {
        /// Actor whose weapon receives the input.
        actor: ActorId,
    },
    /// Forces the weapon back to idle and releases its swarm.
    RequestDeactivate {
        /// Actor whose weapon is released.
        actor: ActorId,
    },
    /// Moves the actor's cursor.
    AimAt {
        /// Actor whose cursor moves.
        actor: ActorId,
        /// Cursor location in world space.
        cursor: Vec2,
    },
    /// Moves the actor's mounted centre.
    MoveActor {
        /// Actor that moves.
        actor: ActorId,
        /// New mounted centre in world space.
        center: Vec2,
    },
    /// Updates whether the actor is holding the weapon.
    SetHolding {
        /// Actor whose grip changes.
        actor: ActorId,
        /// Whether the weapon is held.
        holding: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Simulation advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// A weapon's activation state changed.
    ActivationChanged {
        /// Actor wielding the weapon.
        actor: ActorId,
        /// New activation state.
        state: ActivationState,
    },
    /// A controller joined the swarm.
    ControllerSpawned {
        /// Owning actor.
        actor: ActorId,
        /// Handle of the new controller.
        controller: EntityId,
        /// Position of the controller within the swarm.
        index: usize,
    },
    /// A controller left the world.
    ControllerDestroyed {
        /// Owning actor.
        actor: ActorId,
        /// Handle of the destroyed controller.
        controller: EntityId,
    },
    /// Controllers were nudged by a re-engaged focus toggle.
    Refocused {
        /// Controller that pulsed.
        controller: EntityId,
    },
    /// A beam was spawned into a controller slot.
    BeamSpawned {
        /// Owning controller.
        controller: EntityId,
        /// Handle of the new beam.
        beam: EntityId,
        /// Slot index within the controller.
        slot: usize,
    },
    /// A beam started fading out.
    BeamFading {
        /// Handle of the fading beam.
        beam: EntityId,
    },
    /// A beam left the world.
    BeamRemoved {
        /// Handle of the removed beam.
        beam: EntityId,
    },
    /// A pooled entity was forcibly evicted to make room.
    EntityEvicted {
        /// Handle of the evicted entity.
        entity: EntityId,
    },
    /// A spawn was skipped because the pool stayed full after eviction.
    SpawnSkipped,
    /// A target took a decay hit from a beam.
    TargetStruck {
        /// Target that was hit.
        target: TargetId,
        /// Final damage of the decay strike.
        damage: i32,
        /// Health remaining after the hit.
        remaining: i32,
    },
    /// A target lost health to erosion before the decay strike.
    TargetEroded {
        /// Target that eroded.
        target: TargetId,
        /// Health removed by erosion.
        amount: i32,
    },
    /// The weapon dealt a killing hit.
    TargetSlain {
        /// Target that died.
        target: TargetId,
        /// Actor credited with the kill.
        actor: ActorId,
        /// Loot value accumulated by the target.
        value: f32,
    },
    /// A dead target was removed from the world.
    TargetRemoved {
        /// Removed target.
        target: TargetId,
    },
    /// A foreign projectile near the actor switched allegiance.
    ProjectileHijacked {
        /// Hijacked projectile.
        projectile: EntityId,
        /// New owner.
        actor: ActorId,
    },
    /// A foreign projectile lost damage, lifetime, and size to a beam.
    ProjectileEroded {
        /// Eroded projectile.
        projectile: EntityId,
    },
    /// A foreign projectile was destroyed and replaced with effect fragments.
    ProjectileShattered {
        /// Shattered projectile.
        projectile: EntityId,
    },
    /// A friendly effect projectile was spawned.
    EffectSpawned {
        /// Handle of the new projectile.
        projectile: EntityId,
        /// Effect kind.
        kind: EffectKind,
        /// Owning actor.
        actor: ActorId,
    },
    /// Presentation should play an audio cue.
    CueRequested {
        /// Cue to play.
        cue: Cue,
        /// Emitter position.
        position: Vec2,
    },
    /// Presentation should spawn a dust particle.
    DustRequested {
        /// Particle origin.
        position: Vec2,
        /// Particle velocity.
        velocity: Vec2,
        /// Hue in `[0, 1)`.
        hue: f32,
        /// Particle scale.
        scale: f32,
    },
    /// Presentation should queue a water ripple along a beam.
    RippleQueued {
        /// Ripple centre.
        position: Vec2,
        /// Ripple extent along and across the beam.
        size: Vec2,
        /// Ripple rotation in radians.
        rotation: f32,
    },
    /// Breakable tiles along the segment should be cut.
    TilesCut {
        /// Segment start.
        start: Vec2,
        /// Segment end.
        end: Vec2,
        /// Cutting width.
        width: f32,
    },
    /// Network replication of the entity should be refreshed.
    SyncRequested {
        /// Entity whose state changed noticeably.
        entity: EntityId,
    },
}

/// Read-only view of a weapon and its swarm.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponSnapshot {
    /// Actor wielding the weapon.
    pub actor: ActorId,
    /// Current activation state.
    pub state: ActivationState,
    /// Charge ratio of the lead controller, 0 without a swarm.
    pub charge_ratio: f32,
    /// Total live beams across the swarm.
    pub beam_count: usize,
    /// Live controllers ordered by swarm index.
    pub controllers: Vec<ControllerSnapshot>,
}

/// Read-only view of a controller.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerSnapshot {
    /// Controller handle.
    pub id: EntityId,
    /// Owning actor.
    pub actor: ActorId,
    /// Position within the swarm.
    pub index: usize,
    /// Elapsed charge ticks.
    pub charge: u32,
    /// World-space centre.
    pub center: Vec2,
    /// Unit aim direction.
    pub aim: Vec2,
    /// Active beam count.
    pub beam_count: usize,
    /// Beam handles per slot.
    pub beams: Vec<Option<EntityId>>,
}

/// Read-only view of a beam.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamSnapshot {
    /// Beam handle.
    pub id: EntityId,
    /// Owning controller.
    pub controller: EntityId,
    /// Slot index within the controller.
    pub slot: usize,
    /// Origin of the beam.
    pub origin: Vec2,
    /// Unit direction of the beam.
    pub direction: Vec2,
    /// Current length.
    pub length: f32,
    /// Width scale.
    pub scale: f32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Hue in `[0, 1)`.
    pub hue: f32,
    /// Inner brightness; below 1 the beam erodes what it touches.
    pub inner_brightness: f32,
    /// Damage dealt per strike.
    pub damage: i32,
    /// Whether the beam is fading out.
    pub fading: bool,
}

impl BeamSnapshot {
    /// End point of the beam.
    #[must_use]
    pub fn end(&self) -> Vec2 {
        self.origin + self.direction * self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_id_round_trips_value() {
        assert_eq!(ActorId::new(9).get(), 9);
    }

    #[test]
    fn entity_ids_default_to_null() {
        use slotmap::Key;
        assert!(EntityId::default().is_null());
    }

    #[test]
    fn beam_snapshot_reports_end_point() {
        let snapshot = BeamSnapshot {
            id: EntityId::default(),
            controller: EntityId::default(),
            slot: 0,
            origin: Vec2::new(1.0, 2.0),
            direction: Vec2::Y,
            length: 10.0,
            scale: 1.0,
            opacity: 1.0,
            hue: 0.0,
            inner_brightness: 1.0,
            damage: 4,
            fading: false,
        };
        assert_eq!(snapshot.end(), Vec2::new(1.0, 12.0));
    }

    #[test]
    fn events_round_trip_through_bincode() {
        let event = Event::CueRequested {
            cue: Cue::Shatter,
            position: Vec2::new(3.0, -1.0),
        };
        let encoded = bincode::serialize(&event).expect("serialize event");
        let decoded: Event = bincode::deserialize(&encoded).expect("deserialize event");
        assert_eq!(decoded, event);
    }
}
