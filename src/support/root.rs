//! Bracketed root finding for scalar residual functions.
//!
//! [`brent`] is a derivative-free bracketed solver (Brent's method, in the
//! variant popularized by `brentq`). [`bracket`] holds the sign checks and
//! residual scans used to decide whether a bracket is worth solving and to
//! explain why it wasn't.

pub mod bracket;
pub mod brent;

pub use bracket::{Sign, scan, straddles};
