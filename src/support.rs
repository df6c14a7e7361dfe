//! Supporting utilities used by models.
//!
//! These modules are public because they are useful on their own, but their
//! APIs are not stable.

pub mod air;
pub mod constraint;
pub mod generators;
pub mod grid;
pub mod root;
pub mod solar;
pub mod units;
