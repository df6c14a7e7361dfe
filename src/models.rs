//! Thermal-comfort index models.
//!
//! # Organization
//!
//! Models are grouped by the stress they describe: [`heat_stress`] holds the
//! WBGT models and [`cold_stress`] the wind-chill index.
//!
//! # Model structure
//!
//! A model with real computation keeps it in an internal `core` submodule.
//! The `core` module is an implementation detail and is **not** re-exported
//! as part of the public API.
//!
//! Models are exposed through thin adapters: a [`twine_core::Model`]
//! implementation for single cells where that makes sense, and a
//! [`Calculator`](crate::tool::Calculator) that runs the model over a dataset.

pub mod cold_stress;
pub mod heat_stress;
