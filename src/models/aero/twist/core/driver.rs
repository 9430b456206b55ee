//! Outer minimization loop over twist schedules.

use argmin::{
    core::{Executor, State, TerminationReason},
    solver::{linesearch::MoreThuenteLineSearch, neldermead::NelderMead, quasinewton::LBFGS},
};
use log::{info, warn};
use uom::si::angle::degree;

use crate::support::aero::AeroSolver;

use super::{
    OptimizationResult, OptimizeError, SpanwiseLoading, Termination, TwistModel,
    config::{CheckedConfig, Method},
    objective::{DragObjective, EvaluationLog},
    schedule::TwistSchedule,
};

type Twist = Vec<f64>;
type Lbfgs = LBFGS<MoreThuenteLineSearch<Twist, Twist, f64>, Twist, Twist, f64>;

/// What the minimizer reported when it stopped.
struct Outcome {
    best: Option<Twist>,
    termination: Termination,
    iterations: u64,
}

impl Outcome {
    fn from_state<I: State<Param = Twist>>(state: &I) -> Self {
        Self {
            best: state.get_best_param().cloned(),
            termination: termination(state.get_termination_reason()),
            iterations: state.get_iter(),
        }
    }
}

/// Minimizes scaled drag starting from `initial` and re-evaluates the optimum.
///
/// The stations of `initial` stay fixed; only twist varies.
/// A minimizer that fails after evaluations have succeeded is not an error:
/// the best evaluated schedule is returned with [`Termination::Failed`].
pub(crate) fn optimize<S: AeroSolver>(
    model: &TwistModel<'_, S>,
    config: &CheckedConfig,
    initial: &TwistSchedule,
) -> Result<OptimizationResult, OptimizeError> {
    let log = EvaluationLog::default();
    let objective = DragObjective::new(model, initial, config, &log);
    let x0 = initial.twist().to_vec();
    let target_cl = model.condition().target_cl;

    info!(
        "optimizing {} twist stations at CL={target_cl} with {:?}",
        initial.len(),
        config.method
    );

    let run = match config.method {
        Method::Lbfgs {
            memory,
            grad_tol,
            cost_tol,
        } => {
            let solver: Lbfgs = LBFGS::new(MoreThuenteLineSearch::new(), memory)
                .with_tolerance_grad(grad_tol)
                .map_err(OptimizeError::solver)?
                .with_tolerance_cost(cost_tol)
                .map_err(OptimizeError::solver)?;
            Executor::new(objective, solver)
                .configure(|state| state.param(x0.clone()).max_iters(config.max_iters))
                .run()
                .map(|result| Outcome::from_state(result.state()))
        }
        Method::NelderMead {
            initial_step,
            sd_tol,
        } => {
            let solver: NelderMead<Twist, f64> = NelderMead::new(simplex(&x0, initial_step))
                .with_sd_tolerance(sd_tol)
                .map_err(OptimizeError::solver)?;
            Executor::new(objective, solver)
                .configure(|state| state.max_iters(config.max_iters))
                .run()
                .map(|result| Outcome::from_state(result.state()))
        }
    };

    if let Some(error) = log.take_aborted() {
        return Err(OptimizeError::Objective(error));
    }

    let outcome = run.unwrap_or_else(|error| {
        warn!("minimizer stopped early: {error}");
        Outcome {
            best: None,
            termination: Termination::Failed(error.to_string()),
            iterations: 0,
        }
    });

    let best = outcome
        .best
        .or_else(|| log.best().map(|(_, twist)| twist))
        .unwrap_or(x0);

    let schedule = initial.with_twist(objective.clamp(&best))?;
    let state = model
        .evaluate(&schedule)
        .map_err(OptimizeError::FinalEvaluation)?;
    let drag_coefficient = state.drag_coefficient();
    let loading = SpanwiseLoading::from_state(&state, target_cl);

    info!(
        "finished after {} iterations and {} evaluations ({:?}): cd={drag_coefficient:.6e}, alpha={:.4} deg",
        outcome.iterations,
        log.evaluations(),
        outcome.termination,
        state.alpha.get::<degree>()
    );

    Ok(OptimizationResult {
        stations: schedule.stations().to_vec(),
        twist: schedule.twist().to_vec(),
        drag_coefficient,
        objective: drag_coefficient * config.scale_factor.into_inner(),
        alpha: state.alpha,
        termination: outcome.termination,
        iterations: outcome.iterations,
        evaluations: log.evaluations(),
        failed_evaluations: log.failures(),
        loading,
        state,
    })
}

/// Starting simplex: `x0` and one vertex stepped along each axis.
fn simplex(x0: &[f64], step: f64) -> Vec<Twist> {
    let mut vertices = Vec::with_capacity(x0.len() + 1);
    vertices.push(x0.to_vec());
    for k in 0..x0.len() {
        let mut vertex = x0.to_vec();
        vertex[k] += step;
        vertices.push(vertex);
    }
    vertices
}

fn termination(reason: Option<&TerminationReason>) -> Termination {
    match reason {
        Some(TerminationReason::SolverConverged | TerminationReason::TargetCostReached) => {
            Termination::Converged
        }
        Some(TerminationReason::MaxItersReached) => Termination::MaxIters,
        Some(other) => Termination::Failed(format!("{other:?}")),
        None => Termination::Failed("no termination reason reported".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplex_has_one_vertex_per_axis() {
        let vertices = simplex(&[0.0, 1.0, 2.0], 0.5);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0], vec![0.0, 1.0, 2.0]);
        assert_eq!(vertices[2], vec![0.0, 1.5, 2.0]);
    }

    #[test]
    fn termination_reasons_map_to_status() {
        assert_eq!(
            termination(Some(&TerminationReason::SolverConverged)),
            Termination::Converged
        );
        assert_eq!(
            termination(Some(&TerminationReason::MaxItersReached)),
            Termination::MaxIters
        );
        assert!(matches!(
            termination(Some(&TerminationReason::SolverExit("line search".into()))),
            Termination::Failed(reason) if reason.contains("line search")
        ));
        assert!(matches!(termination(None), Termination::Failed(_)));
    }
}
