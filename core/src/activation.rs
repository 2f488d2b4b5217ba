//! Two-toggle activation state shared by weapons and their controllers.

use serde::{Deserialize, Serialize};

/// Input channel that flips one half of the activation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Toggle {
    /// Primary-fire channel that focuses the beam swarm.
    Focus,
    /// Secondary-fire channel that spreads the swarm and arms homing volleys.
    Spread,
}

/// Activation state of a weapon, composed of two independent toggles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationState {
    /// Neither toggle is engaged.
    #[default]
    Idle,
    /// Only the focus toggle is engaged.
    Focus,
    /// Only the spread toggle is engaged.
    Spread,
    /// Both toggles are engaged.
    Both,
}

impl ActivationState {
    /// Builds the state matching the provided toggle flags.
    #[must_use]
    pub const fn from_toggles(focus: bool, spread: bool) -> Self {
        match (focus, spread) {
            (false, false) => Self::Idle,
            (true, false) => Self::Focus,
            (false, true) => Self::Spread,
            (true, true) => Self::Both,
        }
    }

    /// Reports whether the focus toggle is engaged.
    #[must_use]
    pub const fn focus(self) -> bool {
        matches!(self, Self::Focus | Self::Both)
    }

    /// Reports whether the spread toggle is engaged.
    #[must_use]
    pub const fn spread(self) -> bool {
        matches!(self, Self::Spread | Self::Both)
    }

    /// Reports whether any toggle is engaged.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Returns the state obtained by flipping the provided toggle.
    #[must_use]
    pub const fn toggled(self, toggle: Toggle) -> Self {
        match toggle {
            Toggle::Focus => Self::from_toggles(!self.focus(), self.spread()),
            Toggle::Spread => Self::from_toggles(self.focus(), !self.spread()),
        }
    }
}
