//! Supporting utilities used by models.
//!
//! - [`aero`]: Aerodynamic solver capabilities, wing geometry and a
//!   lifting-line backend.
//! - [`constraint`]: Type-level numeric constraints for physical inputs.

pub mod aero;
pub mod constraint;
