//! Fixed tables of effect kinds, status effects, and audio cues.

use serde::{Deserialize, Serialize};

/// Kind code of an effect projectile spawned by the weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectKind(u16);

impl EffectKind {
    /// Fast-moving burst fragment; spawned at triple speed.
    pub const SWIFT: Self = Self(79);
    /// Slow, heavy burst fragment; spawned at a third of the speed with triple damage.
    pub const HEAVY: Self = Self(538);

    /// Creates a new effect kind from its code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Retrieves the numeric code.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Identifier of a timed status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuffId(u16);

impl BuffId {
    /// Creates a new status effect identifier.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Retrieves the numeric code.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

const fn effects<const N: usize>(codes: [u16; N]) -> [EffectKind; N] {
    let mut kinds = [EffectKind(0); N];
    let mut index = 0;
    while index < N {
        kinds[index] = EffectKind(codes[index]);
        index += 1;
    }
    kinds
}

const fn buffs<const N: usize>(codes: [u16; N]) -> [BuffId; N] {
    let mut ids = [BuffId(0); N];
    let mut index = 0;
    while index < N {
        ids[index] = BuffId(codes[index]);
        index += 1;
    }
    ids
}

/// Kinds a homing volley shot may take.
pub const VOLLEY_KINDS: [EffectKind; 39] = effects([
    14, 20, 36, 83, 84, 88, 89, 100, 104, 110, 180, 207, 242, 257, 264, 279, 283, 284, 285, 286,
    287, 302, 337, 357, 389, 436, 438, 440, 449, 462, 576, 577, 591, 592, 606, 638, 731, 876, 981,
]);

/// Kinds a shatter or kill burst fragment may take.
pub const SHATTER_KINDS: [EffectKind; 18] = effects([
    9, 16, 79, 92, 297, 462, 464, 538, 617, 634, 635, 709, 725, 728, 917, 931, 950, 955,
]);

/// Buffs granted to the actor when the weapon lands a kill.
pub const VICTORY_BUFFS: [BuffId; 16] = buffs([
    2, 5, 29, 48, 58, 59, 113, 114, 119, 151, 165, 175, 178, 181, 207, 336,
]);

/// Debuffs applied to targets on every non-lethal hit.
pub const AFFLICTIONS: [BuffId; 22] = buffs([
    20, 24, 31, 36, 39, 44, 67, 68, 69, 70, 144, 153, 169, 183, 189, 195, 196, 203, 204, 323, 324,
    337,
]);

/// Number of interchangeable volley sound variants.
pub const VOLLEY_CUE_VARIANTS: u8 = 8;

/// Audio cue requested by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Swarm re-engaged with a single toggle active.
    Engaged,
    /// Swarm re-engaged with both toggles active.
    BothEngaged,
    /// Swarm released after both toggles were cleared.
    Released,
    /// Lead controller began charging.
    ChargeStart,
    /// Focused swarm reached overcharge.
    FocusPeak,
    /// Periodic pulse while spreading.
    SpreadPulse,
    /// Periodic hum while focused.
    FocusHum,
    /// Homing volley launched.
    Volley {
        /// Variant index below [`VOLLEY_CUE_VARIANTS`].
        variant: u8,
    },
    /// Projectile or target shattered into a burst.
    Shatter,
}
