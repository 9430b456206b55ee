use twine_solvers::equation::bisection;
use uom::si::{angle::radian, f64::Angle};

/// Lifting-line solver configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LiftingLineConfig {
    pub solver: SolverKind,
    pub nonlinear: NonlinearConfig,
    pub trim: TrimConfig,
}

/// How the circulation distribution is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SolverKind {
    /// Small-angle linearization, solved directly.
    #[default]
    Linear,

    /// Newton iteration on the full vortex-lift balance, started from the
    /// linear solution.
    Nonlinear,
}

/// Newton iteration settings for [`SolverKind::Nonlinear`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonlinearConfig {
    /// Maximum Newton iterations.
    pub max_iters: usize,

    /// Tolerance on the largest normalized lift-balance residual.
    pub tolerance: f64,

    /// Fraction of each Newton step that is applied.
    pub relaxation: f64,
}

impl Default for NonlinearConfig {
    fn default() -> Self {
        Self {
            max_iters: 50,
            tolerance: 1e-10,
            relaxation: 1.0,
        }
    }
}

/// Trim (target lift coefficient) settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimConfig {
    /// Angle of attack search interval.
    pub bracket: [Angle; 2],

    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the angle of attack.
    pub alpha_tol: Angle,

    /// Absolute tolerance on the lift coefficient residual (achieved - target).
    pub cl_tol: f64,
}

impl Default for TrimConfig {
    fn default() -> Self {
        let limit = 20.0_f64.to_radians();
        Self {
            bracket: [Angle::new::<radian>(-limit), Angle::new::<radian>(limit)],
            max_iters: 100,
            alpha_tol: Angle::new::<radian>(1e-13),
            cl_tol: 1e-13,
        }
    }
}

impl TrimConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.alpha_tol.get::<radian>(),
            x_rel_tol: 0.0,
            residual_tol: self.cl_tol,
        }
    }

    pub(super) fn bracket_radians(&self) -> [f64; 2] {
        self.bracket.map(|alpha| alpha.get::<radian>())
    }
}
