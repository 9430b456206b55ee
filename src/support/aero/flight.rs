//! Freestream and flight condition types.

use uom::si::f64::{Angle, MassDensity, Pressure, Velocity};

use crate::support::constraint::{Constrained, ConstraintError, StrictlyPositive};

/// Uniform freestream: airspeed and air density.
///
/// Both quantities are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Freestream {
    velocity: Constrained<Velocity, StrictlyPositive>,
    density: Constrained<MassDensity, StrictlyPositive>,
}

impl Freestream {
    /// Creates a freestream from airspeed and density.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if either quantity is not strictly positive.
    pub fn new(velocity: Velocity, density: MassDensity) -> Result<Self, ConstraintError> {
        Ok(Self {
            velocity: StrictlyPositive::new(velocity)?,
            density: StrictlyPositive::new(density)?,
        })
    }

    #[must_use]
    pub fn velocity(&self) -> Velocity {
        *self.velocity.as_ref()
    }

    #[must_use]
    pub fn density(&self) -> MassDensity {
        *self.density.as_ref()
    }

    /// Dynamic pressure `0.5·ρ·V²`.
    #[must_use]
    pub fn dynamic_pressure(&self) -> Pressure {
        0.5 * self.density() * self.velocity() * self.velocity()
    }

    /// Constant-density atmosphere matching this freestream.
    #[must_use]
    pub fn atmosphere(&self) -> Atmosphere {
        Atmosphere {
            density: self.density(),
        }
    }

    /// Aircraft state flying through this freestream at the given angle of attack.
    #[must_use]
    pub fn state(&self, alpha: Angle) -> AircraftState {
        AircraftState {
            velocity: self.velocity(),
            alpha,
        }
    }
}

/// Constant-density atmosphere used to build a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub density: MassDensity,
}

/// Aircraft attitude and airspeed relative to still air.
///
/// Sideslip is always zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AircraftState {
    pub velocity: Velocity,
    pub alpha: Angle,
}

/// Freestream plus the lift coefficient a run trims to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightCondition {
    pub freestream: Freestream,
    pub target_cl: f64,
}
