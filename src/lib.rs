//! # Twine Twist
//!
//! Minimum induced drag twist optimization for lifting wings, built on
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! Given a wing with a section named `design_section`, a freestream and a
//! target lift coefficient, [`TwistOptimizer`](models::aero::twist::TwistOptimizer)
//! searches for the twist angles at evenly spaced span stations that
//! minimize drag once the wing is trimmed to that lift coefficient.
//!
//! ## Crate layout
//!
//! - [`models`]: The twist optimizer and its [`twine_core::Model`] adapter.
//! - [`support`]: Aerodynamic solver capabilities, a lifting-line backend and
//!   numeric constraints used by the models.
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! ## Example
//!
//! ```no_run
//! use twine_twist::{
//!     models::aero::twist::{OptimizerConfig, TwistOptimizer},
//!     support::aero::{flight::Freestream, geometry::WingGeometrySpec, lifting_line::LiftingLine},
//! };
//! use uom::si::{
//!     f64::{MassDensity, Velocity},
//!     mass_density::kilogram_per_cubic_meter,
//!     velocity::meter_per_second,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let geometry: WingGeometrySpec = serde_json::from_str(&std::fs::read_to_string("wing.json")?)?;
//! let freestream = Freestream::new(
//!     Velocity::new::<meter_per_second>(30.0),
//!     MassDensity::new::<kilogram_per_cubic_meter>(1.225),
//! )?;
//!
//! let optimizer = TwistOptimizer::new(
//!     geometry,
//!     freestream,
//!     LiftingLine::default(),
//!     OptimizerConfig::default(),
//! )?;
//! let result = optimizer.optimize(11, 0.5)?;
//! result.loading.write_csv(std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod support;
