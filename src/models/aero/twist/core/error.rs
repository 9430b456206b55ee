use std::error::Error as StdError;

use thiserror::Error;

use crate::support::{
    aero::{SceneError, geometry::GeometryError},
    constraint::ConstraintError,
};

use super::schedule::ScheduleError;

/// Problems found before any aerodynamic evaluation is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The wing geometry is unusable, e.g. it has no `design_section`.
    #[error("invalid wing geometry")]
    Geometry(#[from] GeometryError),

    /// An optimizer setting violates its constraint.
    #[error("invalid optimizer setting '{name}'")]
    Setting {
        name: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// Twist bounds are not finite or not ordered.
    #[error("twist bounds must be finite with lower < upper")]
    Bounds,
}

/// Failure of a single aerodynamic evaluation.
///
/// During optimization these are converted to a penalty by default.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The trim solve did not reach the target lift coefficient.
    #[error("trim to target lift did not converge")]
    TrimDivergence(#[source] SceneError),

    /// The aerodynamic solution failed for any other reason.
    #[error("aerodynamic solve failed")]
    SolverFailure(#[source] SceneError),
}

impl EvaluationError {
    /// Classifies a scene failure raised while trimming.
    pub(super) fn from_trim(error: SceneError) -> Self {
        match error {
            SceneError::TrimFailed(_) | SceneError::TrimDivergence { .. } => {
                Self::TrimDivergence(error)
            }
            other => Self::SolverFailure(other),
        }
    }
}

/// Errors returned by a twist optimization run.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("at least 2 twist stations are required, got {0}")]
    TooFewStations(usize),

    #[error("target lift coefficient must be finite and nonzero, got {0}")]
    InvalidTargetCl(f64),

    #[error("invalid twist schedule")]
    Schedule(#[from] ScheduleError),

    /// The minimizer could not be set up.
    #[error("minimizer setup failed")]
    Solver(#[source] Box<dyn StdError + Send + Sync>),

    /// An evaluation failed under [`FailurePolicy::Abort`](super::FailurePolicy::Abort).
    #[error("objective evaluation failed")]
    Objective(#[source] EvaluationError),

    /// Re-evaluating the model at the returned optimum failed.
    #[error("evaluation at the optimum failed")]
    FinalEvaluation(#[source] EvaluationError),
}

impl OptimizeError {
    pub(super) fn solver(error: argmin::core::Error) -> Self {
        Self::Solver(error.into())
    }
}
