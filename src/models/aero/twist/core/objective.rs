//! Scaled drag objective driven by the minimizer.

use std::cell::{Cell, RefCell};

use argmin::core::{CostFunction, Error as ArgminError, Gradient};

use crate::support::aero::{AeroSolver, SceneError};

use super::{
    EvaluationError, TwistModel,
    config::{CheckedConfig, FailurePolicy, TwistBounds},
    schedule::TwistSchedule,
};

/// Running record of objective evaluations.
#[derive(Debug, Default)]
pub(super) struct EvaluationLog {
    evaluations: Cell<usize>,
    failures: Cell<usize>,
    best: RefCell<Option<(f64, Vec<f64>)>>,
    aborted: RefCell<Option<EvaluationError>>,
}

impl EvaluationLog {
    pub(super) fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    pub(super) fn failures(&self) -> usize {
        self.failures.get()
    }

    /// Lowest successful objective value and the twist that produced it.
    pub(super) fn best(&self) -> Option<(f64, Vec<f64>)> {
        self.best.borrow().clone()
    }

    /// Takes the error that stopped the run under [`FailurePolicy::Abort`].
    pub(super) fn take_aborted(&self) -> Option<EvaluationError> {
        self.aborted.borrow_mut().take()
    }

    fn record_success(&self, objective: f64, twist: &[f64]) {
        let mut best = self.best.borrow_mut();
        if best.as_ref().is_none_or(|(value, _)| objective < *value) {
            *best = Some((objective, twist.to_vec()));
        }
    }

    /// Keeps an evaluation error for the driver and hands argmin its message.
    fn abort_on_error<T>(&self, result: Result<T, EvaluationError>) -> Result<T, ArgminError> {
        result.map_err(|error| {
            let message = error.to_string();
            *self.aborted.borrow_mut() = Some(error);
            ArgminError::msg(message)
        })
    }
}

/// Drag coefficient times a scale factor, as a function of twist.
///
/// Stations are fixed; the minimizer only moves the twist angles.
pub(super) struct DragObjective<'a, S> {
    model: &'a TwistModel<'a, S>,
    schedule: &'a TwistSchedule,
    scale_factor: f64,
    fd_step: f64,
    failure_policy: FailurePolicy,
    bounds: Option<TwistBounds>,
    log: &'a EvaluationLog,
}

impl<'a, S: AeroSolver> DragObjective<'a, S> {
    pub(super) fn new(
        model: &'a TwistModel<'a, S>,
        schedule: &'a TwistSchedule,
        config: &CheckedConfig,
        log: &'a EvaluationLog,
    ) -> Self {
        Self {
            model,
            schedule,
            scale_factor: config.scale_factor.into_inner(),
            fd_step: config.fd_step.into_inner(),
            failure_policy: config.failure_policy,
            bounds: config.bounds,
            log,
        }
    }

    /// Applies the twist bounds, if any.
    pub(super) fn clamp(&self, twist: &[f64]) -> Vec<f64> {
        match self.bounds {
            Some(bounds) => twist.iter().map(|&t| bounds.clamp(t)).collect(),
            None => twist.to_vec(),
        }
    }

    /// Returns `scale_factor * cd` at the given twist.
    ///
    /// Under [`FailurePolicy::Penalize`] a failed evaluation returns the
    /// penalty instead of an error.
    ///
    /// # Errors
    ///
    /// Returns the [`EvaluationError`] under [`FailurePolicy::Abort`], or a
    /// [`EvaluationError::SolverFailure`] if the twist cannot form a schedule.
    pub(super) fn scaled_drag(&self, twist: &[f64]) -> Result<f64, EvaluationError> {
        let twist = self.clamp(twist);
        self.log.evaluations.set(self.log.evaluations.get() + 1);

        let result = match self.schedule.with_twist(twist.clone()) {
            Ok(schedule) => self.model.evaluate(&schedule),
            Err(_) => Err(EvaluationError::SolverFailure(SceneError::NonFinite)),
        };

        match result {
            Ok(state) => {
                let objective = state.drag_coefficient() * self.scale_factor;
                self.log.record_success(objective, &twist);
                Ok(objective)
            }
            Err(error) => {
                self.log.failures.set(self.log.failures.get() + 1);
                match self.failure_policy {
                    FailurePolicy::Penalize { penalty } => {
                        log::warn!("evaluation at twist {twist:?} penalized: {error}");
                        Ok(penalty)
                    }
                    FailurePolicy::Abort => Err(error),
                }
            }
        }
    }

    /// Forward-difference gradient of [`Self::scaled_drag`].
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying evaluations.
    pub(super) fn gradient_fd(&self, twist: &[f64]) -> Result<Vec<f64>, EvaluationError> {
        let h = self.fd_step;
        let center = self.scaled_drag(twist)?;

        let mut perturbed = twist.to_vec();
        let mut gradient = Vec::with_capacity(twist.len());
        for k in 0..twist.len() {
            perturbed[k] = twist[k] + h;
            let value = self.scaled_drag(&perturbed)?;
            perturbed[k] = twist[k];
            gradient.push((value - center) / h);
        }

        Ok(gradient)
    }
}

impl<S> Clone for DragObjective<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for DragObjective<'_, S> {}

impl<S: AeroSolver> CostFunction for DragObjective<'_, S> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, ArgminError> {
        self.log.abort_on_error(self.scaled_drag(param))
    }
}

impl<S: AeroSolver> Gradient for DragObjective<'_, S> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, ArgminError> {
        self.log.abort_on_error(self.gradient_fd(param))
    }
}
