//! Trimming to a target lift coefficient.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;
use uom::si::{angle::radian, f64::Angle};

use crate::support::aero::SceneError;

use super::{
    aircraft::{Aircraft, Solution},
    config::LiftingLineConfig,
};

/// Model adapter exposing angle of attack as the sole input.
struct TrimModel<'a> {
    aircraft: &'a Aircraft,
    density: f64,
    config: &'a LiftingLineConfig,
}

impl Model for TrimModel<'_> {
    type Input = Angle;
    type Output = Solution;
    type Error = SceneError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.aircraft
            .solve(input.get::<radian>(), self.density, self.config)
    }
}

/// Residual is `achieved_cl - target_cl`.
struct TrimProblem {
    target_cl: f64,
}

impl EquationProblem<1> for TrimProblem {
    type Input = Angle;
    type Output = Solution;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(Angle::new::<radian>(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.coefficients.wind.lift - self.target_cl])
    }
}

/// Finds the angle of attack at which the aircraft produces `target_cl`.
///
/// # Errors
///
/// Returns [`SceneError::TrimFailed`] if the target is not bracketed or the
/// solve fails, and [`SceneError::TrimDivergence`] if the iteration limit is
/// reached.
pub(super) fn trim(
    aircraft: &Aircraft,
    density: f64,
    config: &LiftingLineConfig,
    target_cl: f64,
) -> Result<Solution, SceneError> {
    let model = TrimModel {
        aircraft,
        density,
        config,
    };
    let problem = TrimProblem { target_cl };

    let solution = bisection::solve(
        &model,
        &problem,
        config.trim.bracket_radians(),
        &config.trim.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // A failed solve usually means the angle is too steep for the
            // nonlinear iteration, so treat it as overshooting the target.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(SceneError::TrimDivergence {
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    log::trace!(
        "trim converged in {} iterations: alpha={:.6} rad",
        solution.iters,
        solution.snapshot.output.alpha
    );

    Ok(solution.snapshot.output)
}
