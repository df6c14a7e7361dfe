use std::fmt;

use uom::si::{
    f64::{HeatFluxDensity, Pressure, ThermodynamicTemperature, Velocity},
    heat_flux_density::watt_per_square_meter,
    pressure::kilopascal,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

/// Field names of the parameter tuple, in tuple order.
pub const FIELDS: [&str; 10] = [
    "t2m", "skt", "rh", "e_kPa", "P_kPa", "ws", "Isw_in", "Isw_frac", "solcza", "fal",
];

/// The ten per-cell inputs of the heat balances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellParams {
    /// Air temperature at 2 m.
    pub t2m: ThermodynamicTemperature,

    /// Surface skin temperature.
    pub skt: ThermodynamicTemperature,

    /// Relative humidity as a fraction.
    pub rh: f64,

    /// Vapor pressure.
    pub vapor_pressure: Pressure,

    /// Air pressure.
    pub pressure: Pressure,

    /// Wind speed at sensor height.
    pub wind_speed: Velocity,

    /// Incoming shortwave irradiance.
    pub irradiance: HeatFluxDensity,

    /// Direct-beam fraction of the irradiance.
    pub direct_fraction: f64,

    /// Cosine of the solar zenith angle.
    pub cos_zenith: f64,

    /// Surface albedo.
    pub albedo: f64,
}

impl CellParams {
    /// Builds parameters from plain values in [`FIELDS`] order and units
    /// (K, K, 1, kPa, kPa, m/s, W/m², 1, 1, 1).
    #[must_use]
    pub fn from_row(row: [f64; 10]) -> Self {
        let [t2m, skt, rh, e, p, ws, isw, frac, cza, fal] = row;
        Self {
            t2m: ThermodynamicTemperature::new::<kelvin>(t2m),
            skt: ThermodynamicTemperature::new::<kelvin>(skt),
            rh,
            vapor_pressure: Pressure::new::<kilopascal>(e),
            pressure: Pressure::new::<kilopascal>(p),
            wind_speed: Velocity::new::<meter_per_second>(ws),
            irradiance: HeatFluxDensity::new::<watt_per_square_meter>(isw),
            direct_fraction: frac,
            cos_zenith: cza,
            albedo: fal,
        }
    }

    /// Inverse of [`CellParams::from_row`].
    #[must_use]
    pub fn to_row(&self) -> [f64; 10] {
        [
            self.t2m.get::<kelvin>(),
            self.skt.get::<kelvin>(),
            self.rh,
            self.vapor_pressure.get::<kilopascal>(),
            self.pressure.get::<kilopascal>(),
            self.wind_speed.get::<meter_per_second>(),
            self.irradiance.get::<watt_per_square_meter>(),
            self.direct_fraction,
            self.cos_zenith,
            self.albedo,
        ]
    }

    /// Returns `true` if every parameter is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_row().iter().all(|v| v.is_finite())
    }

    /// Returns `true` if the cell lacks usable direct sunlight.
    ///
    /// That is the case when the sun is at or below `night_cza`, the
    /// irradiance is at most 1 W/m², or the direct fraction is at most 0.01.
    #[must_use]
    pub fn is_night(&self, night_cza: f64) -> bool {
        self.cos_zenith <= night_cza
            || self.irradiance.get::<watt_per_square_meter>() <= 1.0
            || self.direct_fraction <= 0.01
    }
}

impl fmt::Display for CellParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in FIELDS.iter().zip(self.to_row()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}
