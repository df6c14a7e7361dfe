//! Thermodynamic and transport properties of moist near-surface air.
//!
//! Closed-form closures used by the heat-balance models: saturation vapor
//! pressure and its inverse, ideal-gas density, Sutherland viscosity, power-law
//! conductivity, and the dimensionless groups built from them.
//!
//! Every function is a pure per-element computation with no branching, so it
//! can be mapped over arrays of any shape. Inputs outside the physical domain
//! (non-positive temperatures or pressures) yield `NaN` or infinities rather
//! than panics.

mod wind;

pub use wind::{wind_at_height, wind_direction, wind_speed};

use uom::si::{
    f64::{
        AvailableEnergy, DiffusionCoefficient, DynamicViscosity, MassDensity, Pressure,
        SpecificHeatCapacity, ThermalConductivity, ThermodynamicTemperature,
    },
    available_energy::joule_per_kilogram,
    diffusion_coefficient::square_meter_per_second,
    dynamic_viscosity::pascal_second,
    mass_density::kilogram_per_cubic_meter,
    pressure::kilopascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::units::SpecificGasConstant;

/// Universal gas constant in J/(kmol·K).
pub const GAS_CONSTANT: f64 = 8314.34;

/// Molar mass of dry air in kg/kmol.
pub const MOLAR_MASS_AIR: f64 = 28.965;

/// Molar mass of water in kg/kmol.
pub const MOLAR_MASS_H2O: f64 = 18.015;

/// Specific gas constant of dry air.
#[must_use]
pub fn dry_air_gas_constant() -> SpecificGasConstant {
    SpecificGasConstant::new::<joule_per_kilogram_kelvin>(GAS_CONSTANT / MOLAR_MASS_AIR)
}

/// Saturation vapor pressure over water (Buck-type exponential fit).
///
/// Valid roughly between 200 K and 400 K.
#[must_use]
pub fn saturated_vapor_pressure(temperature: ThermodynamicTemperature) -> Pressure {
    let t = temperature.get::<kelvin>();
    Pressure::new::<kilopascal>(0.611 * (17.2694 * (t - 273.16) / (t - 35.86)).exp())
}

/// Dewpoint temperature for a given vapor pressure.
///
/// Exact inverse of [`saturated_vapor_pressure`].
#[must_use]
pub fn dewpoint(vapor_pressure: Pressure) -> ThermodynamicTemperature {
    let l = (vapor_pressure.get::<kilopascal>() / 0.611).ln();
    ThermodynamicTemperature::new::<kelvin>((17.2694 * 273.16 - 35.86 * l) / (17.2694 - l))
}

/// Relative humidity (fraction) from vapor pressure and air temperature.
#[must_use]
pub fn relative_humidity(vapor_pressure: Pressure, temperature: ThermodynamicTemperature) -> f64 {
    vapor_pressure.get::<kilopascal>() / saturated_vapor_pressure(temperature).get::<kilopascal>()
}

/// Vapor pressure from relative humidity (fraction) and air temperature.
#[must_use]
pub fn vapor_pressure(relative_humidity: f64, temperature: ThermodynamicTemperature) -> Pressure {
    saturated_vapor_pressure(temperature) * relative_humidity
}

/// Density of air from the ideal gas law.
#[must_use]
pub fn air_density(temperature: ThermodynamicTemperature, pressure: Pressure) -> MassDensity {
    pressure / (dry_air_gas_constant() * temperature)
}

/// Dynamic viscosity of air (Sutherland's law).
#[must_use]
pub fn dynamic_viscosity(temperature: ThermodynamicTemperature) -> DynamicViscosity {
    let t = temperature.get::<kelvin>();
    DynamicViscosity::new::<pascal_second>(1.458e-6 * t.powf(1.5) / (t + 110.4))
}

/// Thermal conductivity of air.
#[must_use]
pub fn thermal_conductivity(temperature: ThermodynamicTemperature) -> ThermalConductivity {
    let t = temperature.get::<kelvin>();
    ThermalConductivity::new::<watt_per_meter_kelvin>(0.02624 * (t / 300.0).powf(0.8646))
}

/// Specific heat capacity of air at constant pressure.
#[must_use]
pub fn thermal_capacity(temperature: ThermodynamicTemperature) -> SpecificHeatCapacity {
    let t = temperature.get::<kelvin>();
    SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(1002.5 + 275e-6 * (t - 200.0).powi(2))
}

/// Thermal diffusivity of air, `k / (ρ·cp)`.
#[must_use]
pub fn thermal_diffusivity(
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
) -> DiffusionCoefficient {
    let k = thermal_conductivity(temperature).get::<watt_per_meter_kelvin>();
    let rho = air_density(temperature, pressure).get::<kilogram_per_cubic_meter>();
    let cp = thermal_capacity(temperature).get::<joule_per_kilogram_kelvin>();
    DiffusionCoefficient::new::<square_meter_per_second>(k / (rho * cp))
}

/// Latent heat of vaporization of water.
#[must_use]
pub fn heat_of_evaporation(temperature: ThermodynamicTemperature) -> AvailableEnergy {
    let t = temperature.get::<kelvin>();
    AvailableEnergy::new::<joule_per_kilogram>((313.15 - t) / 30.0 * -71100.0 + 2.4073e6)
}

/// Prandtl number of air (dimensionless).
#[must_use]
pub fn prandtl_number(temperature: ThermodynamicTemperature) -> f64 {
    let cp = thermal_capacity(temperature).get::<joule_per_kilogram_kelvin>();
    let mu = dynamic_viscosity(temperature).get::<pascal_second>();
    let k = thermal_conductivity(temperature).get::<watt_per_meter_kelvin>();
    cp * mu / k
}

/// Schmidt number of water vapor in air (dimensionless).
///
/// Uses the thermal diffusivity as a stand-in for the vapor diffusivity.
#[must_use]
pub fn schmidt_number(temperature: ThermodynamicTemperature, pressure: Pressure) -> f64 {
    let mu = dynamic_viscosity(temperature).get::<pascal_second>();
    let rho = air_density(temperature, pressure).get::<kilogram_per_cubic_meter>();
    let alpha = thermal_diffusivity(temperature, pressure).get::<square_meter_per_second>();
    mu / (rho * alpha)
}

/// Clear-sky emissivity of the atmosphere from near-surface vapor pressure.
#[must_use]
pub fn atmospheric_emissivity(vapor_pressure: Pressure) -> f64 {
    0.575 * vapor_pressure.get::<kilopascal>().powf(0.143)
}

/// Vapor pressure over water from a dewpoint with the Magnus formula.
///
/// Takes and returns plain values (°C in, hPa out) as used by empirical
/// index formulas calibrated against it.
#[must_use]
pub fn magnus_vapor_pressure_hpa(dewpoint_c: f64) -> f64 {
    6.112 * (17.67 * dewpoint_c / (dewpoint_c + 243.5)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::thermodynamic_temperature::degree_celsius;

    fn temp(k: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(k)
    }

    #[test]
    fn saturation_pressure_at_reference_points() {
        // 0.611 kPa at the triple point by construction.
        assert_relative_eq!(
            saturated_vapor_pressure(temp(273.16)).get::<kilopascal>(),
            0.611,
            epsilon = 1e-12
        );
        // Close to the tabulated 3.17 kPa at 25 °C.
        let e25 = saturated_vapor_pressure(ThermodynamicTemperature::new::<degree_celsius>(25.0));
        assert_relative_eq!(e25.get::<kilopascal>(), 3.17, epsilon = 0.01);
    }

    #[test]
    fn dewpoint_inverts_saturation_pressure() {
        for t in [240.0, 273.15, 290.0, 305.0, 330.0] {
            let e = saturated_vapor_pressure(temp(t));
            assert_relative_eq!(dewpoint(e).get::<kelvin>(), t, epsilon = 1e-9);
        }
    }

    #[test]
    fn humidity_and_vapor_pressure_are_consistent() {
        let t = temp(300.0);
        let e = vapor_pressure(0.5, t);
        assert_relative_eq!(relative_humidity(e, t), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn sea_level_air() {
        let t = temp(288.15);
        let p = Pressure::new::<kilopascal>(101.325);

        assert_relative_eq!(
            air_density(t, p).get::<kilogram_per_cubic_meter>(),
            1.225,
            epsilon = 1e-3
        );
        assert_relative_eq!(dynamic_viscosity(t).get::<pascal_second>(), 1.789e-5, epsilon = 1e-7);
        assert_relative_eq!(thermal_conductivity(temp(300.0)).get::<watt_per_meter_kelvin>(), 0.02624);
    }

    #[test]
    fn dimensionless_groups_are_near_textbook_values() {
        let t = temp(300.0);
        let p = Pressure::new::<kilopascal>(101.3);

        assert_relative_eq!(prandtl_number(t), 0.71, epsilon = 0.02);
        // Using the thermal diffusivity makes Sc equal to Pr.
        assert_relative_eq!(schmidt_number(t, p), prandtl_number(t), epsilon = 1e-12);
    }

    #[test]
    fn latent_heat_decreases_with_temperature() {
        let cold = heat_of_evaporation(temp(273.15)).get::<joule_per_kilogram>();
        let warm = heat_of_evaporation(temp(313.15)).get::<joule_per_kilogram>();
        assert_relative_eq!(warm, 2.4073e6);
        assert!(cold > warm);
    }

    #[test]
    fn emissivity_grows_with_moisture() {
        let dry = atmospheric_emissivity(Pressure::new::<kilopascal>(0.5));
        let moist = atmospheric_emissivity(Pressure::new::<kilopascal>(2.5));
        assert!(dry < moist && moist < 1.0);
        assert_relative_eq!(atmospheric_emissivity(Pressure::new::<kilopascal>(1.0)), 0.575);
    }

    #[test]
    fn magnus_at_twenty_degrees() {
        assert_relative_eq!(magnus_vapor_pressure_hpa(20.0), 23.37, epsilon = 0.01);
    }

    #[test]
    fn invalid_domain_is_nan_not_panic() {
        assert!(saturated_vapor_pressure(temp(f64::NAN)).get::<kilopascal>().is_nan());
        assert!(dewpoint(Pressure::new::<kilopascal>(-1.0)).get::<kelvin>().is_nan());
    }
}
