//! Public Twine models.
//!
//! Models are the primary public interface of this crate.
//!
//! # Model structure
//!
//! Each model lives in its own module and keeps its computation in an
//! internal `core` submodule. The `core` module is an implementation detail
//! and is **not** re-exported as a module; its public types are re-exported
//! by the owning model.
//!
//! The [`twine_core::Model`] implementations are thin adapters over the core
//! API, usable on their own or driven by a higher-level entry point such as
//! [`aero::twist::TwistOptimizer`].

pub mod aero;
