//! # TCI Models
//!
//! Thermal-comfort index models for gridded meteorological fields.
//!
//! The centerpiece is the Liljegren (Argonne) Wet Bulb Globe Temperature model,
//! which finds the globe temperature and the natural wet-bulb temperature of
//! every grid cell by root-finding a nonlinear heat balance.
//! Simpler closed-form indices (ACSM, Bernard, Dimiceli, JAG/TI wind chill)
//! are provided alongside it.
//!
//! ## Crate layout
//!
//! - [`models`]: Index models. Each exposes a dataset [`tool::Calculator`] and,
//!   where it makes sense, a [`twine_core::Model`] adapter for single cells.
//! - [`support`]: Supporting utilities used by models (air properties, solar
//!   geometry, root finding, gridded datasets, field generators).
//! - [`tool`]: The [`Tool`] orchestrator that fills in missing fields and runs
//!   calculators against a shared dataset.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//! Model-specific utility code lives in each model's internal `core` module
//! and is not part of the public API.

pub mod models;
pub mod support;
pub mod tool;

pub use tool::{Tool, ToolError};
