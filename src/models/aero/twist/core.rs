//! Twist optimization for minimum induced drag.
//!
//! The minimizer proposes twist angles at fixed span stations of the wing's
//! `design_section`. Each proposal is evaluated by [`TwistModel`], which
//! rebuilds the wing, trims it to the target lift coefficient and reads the
//! drag coefficient. After the minimizer stops, the model is evaluated once
//! more at the optimum and its stations are post-processed into a
//! [`SpanwiseLoading`].

mod adapter;
mod config;
mod distributions;
mod driver;
mod error;
mod objective;
mod results;
mod schedule;

#[cfg(test)]
pub(super) mod test_support;

pub use adapter::{SolvedAeroState, TwistModel};
pub use config::{FailurePolicy, Method, OptimizerConfig, TwistBounds};
pub use distributions::SpanwiseLoading;
pub use error::{ConfigurationError, EvaluationError, OptimizeError};
pub use results::{OptimizationResult, Termination};
pub use schedule::{ScheduleError, TwistSchedule, evenly_spaced};

pub(crate) use adapter::check_geometry;
pub(crate) use config::CheckedConfig;
pub(crate) use driver::optimize;
