//! Cold-stress indices.

pub mod wind_chill;
