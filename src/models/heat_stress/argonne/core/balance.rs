//! Energy balances of the black globe and the natural wet-bulb wick.
//!
//! Both residuals are expressed so that their root is the sought temperature.
//! Air properties are evaluated at the film temperature, the mean of the
//! candidate temperature and the air temperature.

use std::f64::consts::PI;

use uom::si::{
    available_energy::joule_per_kilogram,
    dynamic_viscosity::pascal_second,
    f64::{Pressure, ThermodynamicTemperature},
    heat_flux_density::watt_per_square_meter,
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    pressure::kilopascal,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use crate::support::air;

use super::{
    constants::{Constants, STEFAN_BOLTZMANN},
    params::CellParams,
};

/// Heat balances of one grid cell.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeatBalance<'a> {
    params: &'a CellParams,
    constants: &'a Constants,
}

/// Air properties at a film temperature.
struct Film {
    density: f64,
    viscosity: f64,
    conductivity: f64,
    prandtl: f64,
}

impl<'a> HeatBalance<'a> {
    pub(crate) fn new(params: &'a CellParams, constants: &'a Constants) -> Self {
        Self { params, constants }
    }

    fn t2m(&self) -> f64 {
        self.params.t2m.get::<kelvin>()
    }

    fn pressure(&self) -> Pressure {
        self.params.pressure
    }

    fn film_temperature(&self, candidate: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(0.5 * (candidate + self.t2m()))
    }

    fn film(&self, temperature: ThermodynamicTemperature) -> Film {
        Film {
            density: air::air_density(temperature, self.pressure())
                .get::<kilogram_per_cubic_meter>(),
            viscosity: air::dynamic_viscosity(temperature).get::<pascal_second>(),
            conductivity: air::thermal_conductivity(temperature).get::<watt_per_meter_kelvin>(),
            prandtl: air::prandtl_number(temperature),
        }
    }

    fn reynolds(&self, film: &Film, diameter: f64) -> f64 {
        self.params.wind_speed.get::<meter_per_second>() * film.density * diameter / film.viscosity
    }

    /// Emissivity of the atmosphere at a temperature, keeping the cell's
    /// relative humidity.
    fn emissivity(&self, temperature: ThermodynamicTemperature) -> f64 {
        air::atmospheric_emissivity(air::vapor_pressure(self.params.rh, temperature))
    }

    fn irradiance(&self) -> f64 {
        self.params.irradiance.get::<watt_per_square_meter>()
    }

    /// Residual of the globe balance at a candidate globe temperature in K.
    ///
    /// Scaled to K⁴; positive below the root and negative above it.
    pub(crate) fn globe_residual(&self, tg: f64) -> f64 {
        let globe = &self.constants.globe;
        let diameter = globe.diameter.get::<meter>();
        let tref = self.film_temperature(tg);
        let film = self.film(tref);

        let re = self.reynolds(&film, diameter);
        let nusselt = 2.0 + 0.6 * re.sqrt() * film.prandtl.powf(0.3333);
        let h = nusselt * film.conductivity * diameter;

        let t2m = self.t2m();
        let skt = self.params.skt.get::<kelvin>();
        let p = self.params;
        let sigma_eps = STEFAN_BOLTZMANN * globe.emissivity;

        let longwave = 0.5 * self.emissivity(tref) * t2m.powi(4)
            + 0.5 * self.constants.surface_emissivity * skt.powi(4);
        let convection = h / sigma_eps * (tg - t2m);
        let shortwave = self.irradiance() / (2.0 * sigma_eps)
            * (1.0 - globe.albedo)
            * (p.direct_fraction * (1.0 / (2.0 * p.cos_zenith) - 1.0) + 1.0 + p.albedo);

        longwave - convection + shortwave - tg.powi(4)
    }

    /// Residual of the wick balance at a candidate wet-bulb temperature in K.
    ///
    /// Negative below the root and positive above it.
    pub(crate) fn wet_bulb_residual(&self, tnw: f64) -> f64 {
        let wick = &self.constants.wick;
        let diameter = wick.diameter.get::<meter>();
        let aspect = 0.25 * diameter / wick.length.get::<meter>();
        let tref = self.film_temperature(tnw);
        let film = self.film(tref);

        let t2m = self.t2m();
        let skt = self.params.skt.get::<kelvin>();
        let p = self.params;

        let radiation = STEFAN_BOLTZMANN
            * wick.emissivity
            * (0.5
                * (self.emissivity(p.t2m) * t2m.powi(4)
                    + self.constants.surface_emissivity * skt.powi(4))
                - tnw.powi(4))
            + (1.0 - wick.albedo)
                * self.irradiance()
                * ((1.0 - p.direct_fraction) * (1.0 + aspect)
                    + p.direct_fraction * (p.cos_zenith.acos().tan() / PI + aspect)
                    + p.albedo);

        let re = self.reynolds(&film, diameter);
        let h = 0.281 * re.powf(0.6) * film.prandtl.powf(0.44) * film.conductivity / diameter;

        let esat = air::saturated_vapor_pressure(ThermodynamicTemperature::new::<kelvin>(tnw))
            .get::<kilopascal>();
        let e = p.vapor_pressure.get::<kilopascal>();
        let wet_fraction = (esat - e) / (p.pressure.get::<kilopascal>() - esat);

        let schmidt = air::schmidt_number(tref, self.pressure());
        let evaporation = air::heat_of_evaporation(tref).get::<joule_per_kilogram>()
            / self.constants.evaporation_ratio()
            * wet_fraction
            * (film.prandtl / schmidt).powf(0.56);

        tnw - (t2m - evaporation + radiation / h)
    }
}
