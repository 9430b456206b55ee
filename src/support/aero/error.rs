use thiserror::Error;
use twine_solvers::equation::bisection;

use super::geometry::GeometryError;

/// Errors raised by an [`AeroScene`](super::AeroScene).
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no aircraft named '{0}' in the scene")]
    UnknownAircraft(String),

    #[error("invalid geometry")]
    InvalidGeometry(#[from] GeometryError),

    /// The vortex system has no unique solution.
    #[error("vortex system is singular")]
    SingularSystem,

    /// An iterative solve stopped before reaching its tolerance.
    #[error("solver did not converge after {iters} iterations: residual={residual:e}")]
    NonConvergence { iters: usize, residual: f64 },

    /// A non-finite value appeared in the solution.
    #[error("solution is not finite")]
    NonFinite,

    /// The trim solve could not be carried out, e.g. the target lift lies
    /// outside the angle of attack bracket.
    #[error("trim solve failed")]
    TrimFailed(#[from] bisection::Error),

    /// The trim solve ran out of iterations.
    #[error("trim hit iteration limit: cl residual={residual:e}")]
    TrimDivergence { residual: f64, iters: usize },

    #[error("aircraft '{0}' has not been solved at its current state")]
    NotSolved(String),
}
