//! Results of a twist optimization run.

use uom::si::f64::Angle;

use super::{SolvedAeroState, SpanwiseLoading};

/// Optimal twist schedule and the trimmed wing it produces.
///
/// Every field except the counts and termination comes from a single
/// evaluation at the returned optimum.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Span stations of the twist schedule, `[0, 1]` root to tip.
    pub stations: Vec<f64>,

    /// Optimal twist at each station, in degrees.
    pub twist: Vec<f64>,

    /// Unscaled drag coefficient at the optimum.
    pub drag_coefficient: f64,

    /// Objective value, the scaled drag coefficient.
    pub objective: f64,

    /// Trim angle of attack at the optimum.
    pub alpha: Angle,

    pub termination: Termination,

    /// Minimizer iterations performed.
    pub iterations: u64,

    /// Aerodynamic evaluations performed by the objective.
    pub evaluations: usize,

    /// Evaluations that failed and were penalized.
    pub failed_evaluations: usize,

    pub loading: SpanwiseLoading,

    /// Full aerodynamic state at the optimum.
    pub state: SolvedAeroState,
}

impl OptimizationResult {
    #[must_use]
    pub fn stations(&self) -> &[f64] {
        &self.stations
    }

    #[must_use]
    pub fn twist(&self) -> &[f64] {
        &self.twist
    }

    #[must_use]
    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }
}

/// Why the minimizer stopped.
///
/// Only [`Termination::Converged`] means a tolerance was met; the other
/// variants still carry the best schedule found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    Converged,

    /// The iteration cap was reached.
    MaxIters,

    /// The minimizer stopped for another reason, e.g. a line search failure.
    Failed(String),
}

impl Termination {
    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged)
    }
}
