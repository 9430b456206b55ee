//! Aerodynamic models.

pub mod twist;
