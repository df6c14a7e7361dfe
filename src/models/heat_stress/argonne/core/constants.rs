use uom::si::{
    f64::{Length, SpecificHeatCapacity},
    length::millimeter,
    specific_heat_capacity::joule_per_kilogram_kelvin,
};

use crate::support::air::{MOLAR_MASS_AIR, MOLAR_MASS_H2O};

/// Stefan-Boltzmann constant in W/(m²·K⁴).
pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;

/// Wetted wick of the natural wet-bulb thermometer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wick {
    pub emissivity: f64,
    pub albedo: f64,
    pub diameter: Length,
    pub length: Length,
}

/// Black globe of the globe thermometer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Globe {
    pub emissivity: f64,
    pub albedo: f64,
    pub diameter: Length,
}

/// Material and radiative constants of the Liljegren model.
///
/// Read-only for a model run. The defaults are the values published with
/// the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constants {
    /// Specific heat of air used in the psychrometric ratio.
    pub cp: SpecificHeatCapacity,
    pub wick: Wick,
    pub globe: Globe,
    /// Emissivity of the ground surface.
    pub surface_emissivity: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            cp: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(1003.5),
            wick: Wick {
                emissivity: 0.95,
                albedo: 0.4,
                diameter: Length::new::<millimeter>(7.0),
                length: Length::new::<millimeter>(25.4),
            },
            globe: Globe {
                emissivity: 0.95,
                albedo: 0.05,
                diameter: Length::new::<millimeter>(50.8),
            },
            surface_emissivity: 0.999,
        }
    }
}

impl Constants {
    /// Psychrometric ratio `cp · M_air / M_h2o` in J/(kg·K).
    #[must_use]
    pub fn evaporation_ratio(&self) -> f64 {
        self.cp.get::<joule_per_kilogram_kelvin>() * MOLAR_MASS_AIR / MOLAR_MASS_H2O
    }
}
