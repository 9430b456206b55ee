use crate::support::constraint::{Constrained, ConstraintError, NonNegative, StrictlyPositive};

use super::ConfigurationError;

/// Settings for a twist optimization run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    pub method: Method,

    /// Forward-difference step for the objective gradient, in degrees.
    pub fd_step: f64,

    /// Factor applied to the drag coefficient to form the objective.
    pub scale_factor: f64,

    /// What the objective reports when an evaluation fails.
    pub failure_policy: FailurePolicy,

    /// Maximum minimizer iterations.
    pub max_iters: u64,

    /// Optional limits applied to every twist angle before evaluation.
    pub bounds: Option<TwistBounds>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            fd_step: 0.01,
            scale_factor: 1000.0,
            failure_policy: FailurePolicy::default(),
            max_iters: 100,
            bounds: None,
        }
    }
}

/// Minimization algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// L-BFGS with More-Thuente line search on finite-difference gradients.
    Lbfgs {
        /// Number of stored correction pairs.
        memory: usize,
        /// Stop when the gradient norm falls below this.
        grad_tol: f64,
        /// Stop when the objective change falls below this.
        cost_tol: f64,
    },

    /// Derivative-free simplex search.
    NelderMead {
        /// Offset of each initial simplex vertex from the start, in degrees.
        initial_step: f64,
        /// Stop when the standard deviation of vertex costs falls below this.
        sd_tol: f64,
    },
}

impl Default for Method {
    fn default() -> Self {
        Self::Lbfgs {
            memory: 7,
            grad_tol: 1e-6,
            cost_tol: 1e-10,
        }
    }
}

/// Handling of failed aerodynamic evaluations inside the objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailurePolicy {
    /// Report this objective value and continue.
    Penalize { penalty: f64 },

    /// Stop the run and return the evaluation error.
    Abort,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::Penalize { penalty: 1.0e6 }
    }
}

/// Inclusive limits on twist angles, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwistBounds {
    pub lower: f64,
    pub upper: f64,
}

impl TwistBounds {
    pub(super) fn clamp(&self, twist: f64) -> f64 {
        twist.clamp(self.lower, self.upper)
    }
}

/// Configuration with every value checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CheckedConfig {
    pub method: Method,
    pub fd_step: Constrained<f64, StrictlyPositive>,
    pub scale_factor: Constrained<f64, StrictlyPositive>,
    pub failure_policy: FailurePolicy,
    pub max_iters: u64,
    pub bounds: Option<TwistBounds>,
}

impl OptimizerConfig {
    /// Validates every setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Setting`] naming the first invalid value,
    /// or [`ConfigurationError::Bounds`] for unusable bounds.
    pub(crate) fn check(&self) -> Result<CheckedConfig, ConfigurationError> {
        let positive = |name, value: f64| {
            StrictlyPositive::new(value)
                .map_err(|source| ConfigurationError::Setting { name, source })
        };

        let fd_step = positive("fd_step", self.fd_step)?;
        let scale_factor = positive("scale_factor", self.scale_factor)?;

        match self.method {
            Method::Lbfgs {
                memory,
                grad_tol,
                cost_tol,
            } => {
                #[allow(clippy::cast_precision_loss)]
                positive("memory", memory as f64)?;
                positive("grad_tol", grad_tol)?;
                positive("cost_tol", cost_tol)?;
            }
            Method::NelderMead {
                initial_step,
                sd_tol,
            } => {
                positive("initial_step", initial_step)?;
                positive("sd_tol", sd_tol)?;
            }
        }

        if let FailurePolicy::Penalize { penalty } = self.failure_policy {
            NonNegative::new(penalty)
                .map_err(|source| ConfigurationError::Setting {
                    name: "penalty",
                    source,
                })?;
            if penalty.is_infinite() {
                return Err(ConfigurationError::Setting {
                    name: "penalty",
                    source: ConstraintError::Infinite,
                });
            }
        }

        if let Some(bounds) = self.bounds
            && !(bounds.lower.is_finite()
                && bounds.upper.is_finite()
                && bounds.lower < bounds.upper)
        {
            return Err(ConfigurationError::Bounds);
        }

        Ok(CheckedConfig {
            method: self.method,
            fd_step,
            scale_factor,
            failure_policy: self.failure_policy,
            max_iters: self.max_iters,
            bounds: self.bounds,
        })
    }
}
