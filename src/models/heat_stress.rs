//! Heat-stress indices based on the Wet Bulb Globe Temperature.

pub mod approx;
pub mod argonne;
