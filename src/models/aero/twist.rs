//! Wing twist optimization for minimum induced drag.
//!
//! [`TwistOptimizer`] owns a wing geometry, a freestream and an aerodynamic
//! solver, and finds the twist schedule of the geometry's `design_section`
//! that minimizes drag at a target lift coefficient. [`TwistModel`] is the
//! [`twine_core::Model`] that evaluates a single schedule.

mod core;

pub use self::core::{
    ConfigurationError, EvaluationError, FailurePolicy, Method, OptimizationResult,
    OptimizeError, OptimizerConfig, ScheduleError, SolvedAeroState, SpanwiseLoading,
    Termination, TwistBounds, TwistModel, TwistSchedule, evenly_spaced,
};

use crate::support::aero::{
    AeroSolver,
    flight::{FlightCondition, Freestream},
    geometry::WingGeometrySpec,
};

use self::core::{CheckedConfig, check_geometry};

/// Finds the minimum-drag twist schedule of a wing.
///
/// The geometry and configuration are checked once, on construction, so a
/// run never starts with a wing that lacks a `design_section`.
pub struct TwistOptimizer<S> {
    geometry: WingGeometrySpec,
    freestream: Freestream,
    solver: S,
    config: CheckedConfig,
}

impl<S: AeroSolver> TwistOptimizer<S> {
    /// Creates an optimizer.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the geometry has no design section
    /// or is otherwise invalid, or if a configuration value is out of range.
    pub fn new(
        geometry: WingGeometrySpec,
        freestream: Freestream,
        solver: S,
        config: OptimizerConfig,
    ) -> Result<Self, ConfigurationError> {
        check_geometry(&geometry)?;
        let config = config.check()?;
        Ok(Self {
            geometry,
            freestream,
            solver,
            config,
        })
    }

    #[must_use]
    pub fn geometry(&self) -> &WingGeometrySpec {
        &self.geometry
    }

    #[must_use]
    pub fn freestream(&self) -> Freestream {
        self.freestream
    }

    /// Model evaluating twist schedules at the given lift coefficient.
    #[must_use]
    pub fn model(&self, target_cl: f64) -> TwistModel<'_, S> {
        TwistModel::new_unchecked(
            &self.geometry,
            FlightCondition {
                freestream: self.freestream,
                target_cl,
            },
            &self.solver,
        )
    }

    /// Optimizes the twist at `num_stations` evenly spaced span stations,
    /// starting from zero twist.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::TooFewStations`] if `num_stations < 2` and
    /// [`OptimizeError::InvalidTargetCl`] for a zero or non-finite target,
    /// both before any evaluation. Other variants report minimizer setup
    /// failures, aborted evaluations, and a failed evaluation at the optimum.
    pub fn optimize(
        &self,
        num_stations: usize,
        target_cl: f64,
    ) -> Result<OptimizationResult, OptimizeError> {
        if num_stations < 2 {
            return Err(OptimizeError::TooFewStations(num_stations));
        }
        if !target_cl.is_finite() || target_cl.abs() < f64::MIN_POSITIVE {
            return Err(OptimizeError::InvalidTargetCl(target_cl));
        }

        let initial = TwistSchedule::zeros(num_stations)?;
        self::core::optimize(&self.model(target_cl), &self.config, &initial)
    }
}
