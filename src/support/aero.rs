//! Aerodynamic analysis capabilities.
//!
//! An [`AeroSolver`] creates [`AeroScene`]s. A scene holds one or more
//! aircraft, each described by a [`WingGeometrySpec`] and an
//! [`AircraftState`], and answers force, trim and distribution queries about
//! them. Models in this crate depend only on these traits, so any backend
//! able to answer the queries can drive them.
//!
//! [`lifting_line`] provides a numerical lifting-line backend.

mod error;
mod forces;

pub mod flight;
pub mod geometry;
pub mod lifting_line;

pub use error::SceneError;
pub use forces::{
    BodyAxes, Distributions, ForcesAndMoments, Moments, ReferenceGeometry, Station,
    SurfaceDistribution, WindAxes,
};

use uom::si::f64::Angle;

use flight::{AircraftState, Atmosphere};
use geometry::WingGeometrySpec;

/// Capability for creating aerodynamic scenes.
pub trait AeroSolver {
    type Scene: AeroScene;

    /// Creates an empty scene in the given atmosphere.
    fn create_scene(&self, atmosphere: Atmosphere) -> Self::Scene;
}

impl<T: AeroSolver> AeroSolver for &T {
    type Scene = T::Scene;

    fn create_scene(&self, atmosphere: Atmosphere) -> Self::Scene {
        (**self).create_scene(atmosphere)
    }
}

/// A collection of aircraft that can be trimmed and solved.
///
/// Aircraft are addressed by the name they were added under.
pub trait AeroScene {
    /// Adds an aircraft to the scene.
    ///
    /// # Errors
    ///
    /// Returns a [`SceneError`] if the geometry is unusable or the aircraft's
    /// aerodynamic system cannot be assembled.
    fn add_aircraft(
        &mut self,
        name: &str,
        geometry: &WingGeometrySpec,
        state: AircraftState,
    ) -> Result<(), SceneError>;

    /// Finds the angle of attack giving the target lift coefficient.
    ///
    /// On success the aircraft's state is updated to the trim angle, which is
    /// also returned.
    ///
    /// # Errors
    ///
    /// Returns a [`SceneError`] if trim cannot be reached.
    fn target_cl(&mut self, name: &str, cl: f64) -> Result<Angle, SceneError>;

    /// Solves the aircraft at its current state.
    ///
    /// # Errors
    ///
    /// Returns a [`SceneError`] if the aerodynamic system cannot be solved.
    fn solve_forces(&mut self, name: &str) -> Result<ForcesAndMoments, SceneError>;

    /// Returns the reference area, chord and span of an aircraft.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownAircraft`] if no aircraft has that name.
    fn reference_geometry(&self, name: &str) -> Result<ReferenceGeometry, SceneError>;

    /// Returns per-station results from the most recent solve.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotSolved`] if the aircraft has not been solved
    /// at its current state.
    fn distributions(&self, name: &str) -> Result<Distributions, SceneError>;
}
