//! Solar position ephemeris.
//!
//! Implements the NOAA solar calculator: Julian-century series for the sun's
//! mean longitude and anomaly, orbital eccentricity, obliquity, declination
//! and equation of time, followed by an approximate atmospheric refraction
//! correction of the elevation angle.
//!
//! Accuracy is about a minute of arc for dates between 1901 and 2099.

use jiff::Timestamp;
use uom::si::{angle::degree, f64::Angle};

/// Total solar irradiance at one astronomical unit, in W/m².
pub const SOLAR_CONSTANT: f64 = 1367.0;

const SECONDS_PER_DAY: f64 = 86_400.0;
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;
const J2000_JULIAN_DAY: f64 = 2_451_545.0;
const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Position of the sun seen from a point on the earth's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Zenith angle, corrected for atmospheric refraction.
    pub zenith: Angle,

    /// Azimuth, clockwise from north.
    pub azimuth: Angle,

    /// Hour angle, negative before local solar noon.
    pub hour_angle: Angle,

    /// Elevation above the horizon, corrected for atmospheric refraction.
    pub elevation: Angle,

    /// Earth-sun distance in astronomical units.
    pub sun_distance: f64,
}

impl SolarPosition {
    /// Cosine of the refraction-corrected zenith angle.
    #[must_use]
    pub fn cos_zenith(&self) -> f64 {
        self.zenith.get::<degree>().to_radians().cos()
    }
}

/// Computes the solar position at `time` for a location in degrees.
#[must_use]
pub fn position(time: Timestamp, longitude: f64, latitude: f64) -> SolarPosition {
    #[allow(clippy::cast_precision_loss)]
    let seconds = time.as_millisecond() as f64 / 1000.0;
    position_at_unix(seconds, longitude, latitude)
}

/// Computes the solar position for seconds since the Unix epoch.
#[must_use]
pub fn position_at_unix(seconds: f64, longitude: f64, latitude: f64) -> SolarPosition {
    let days = seconds / SECONDS_PER_DAY;
    let jc = (days + UNIX_EPOCH_JULIAN_DAY - J2000_JULIAN_DAY) / DAYS_PER_JULIAN_CENTURY;
    let day_fraction = days.rem_euclid(1.0);

    let mean_long = (280.466_46 + jc * (36_000.769_83 + 0.000_303_2 * jc)).rem_euclid(360.0);
    let mean_anom = 357.529_11 + jc * (35_999.050_29 - 0.000_153_7 * jc);
    let ecc = 0.016_708_634 - jc * (0.000_042_037 + 0.000_000_126_7 * jc);

    let m = mean_anom.to_radians();
    let center = m.sin() * (1.914_602 - jc * (0.004_817 + 0.000_014 * jc))
        + (2.0 * m).sin() * (0.019_993 - 0.000_101 * jc)
        + (3.0 * m).sin() * 0.000_289;

    let true_long = mean_long + center;
    let true_anom = mean_anom + center;
    let sun_distance =
        1.000_001_018 * (1.0 - ecc * ecc) / (1.0 + ecc * true_anom.to_radians().cos());

    let omega = (125.04 - 1934.136 * jc).to_radians();
    let apparent_long = (true_long - 0.005_69 - 0.004_78 * omega.sin()).to_radians();
    let mean_obliquity = 23.0
        + (26.0 + (21.448 - jc * (46.815 + jc * (0.000_59 - jc * 0.001_813))) / 60.0) / 60.0;
    let obliquity = (mean_obliquity + 0.002_56 * omega.cos()).to_radians();

    let declination = (obliquity.sin() * apparent_long.sin()).asin();

    let y = (obliquity / 2.0).tan().powi(2);
    let l = mean_long.to_radians();
    let eq_of_time = 4.0
        * (y * (2.0 * l).sin() - 2.0 * ecc * m.sin()
            + 4.0 * ecc * y * m.sin() * (2.0 * l).cos()
            - 0.5 * y * y * (4.0 * l).sin()
            - 1.25 * ecc * ecc * (2.0 * m).sin())
        .to_degrees();

    let true_solar_minutes = (day_fraction * 1440.0 + eq_of_time + 4.0 * longitude).rem_euclid(1440.0);
    let hour_angle = true_solar_minutes / 4.0 - 180.0;

    let lat = latitude.to_radians();
    let cos_zenith = (lat.sin() * declination.sin()
        + lat.cos() * declination.cos() * hour_angle.to_radians().cos())
    .clamp(-1.0, 1.0);
    let zenith = cos_zenith.acos();

    let elevation = 90.0 - zenith.to_degrees();
    let corrected_elevation = elevation + refraction(elevation);

    let azimuth_cos = ((lat.sin() * zenith.cos() - declination.sin()) / (lat.cos() * zenith.sin()))
        .clamp(-1.0, 1.0);
    let azimuth_acos = azimuth_cos.acos().to_degrees();
    let azimuth = if hour_angle > 0.0 {
        (azimuth_acos + 180.0).rem_euclid(360.0)
    } else {
        (540.0 - azimuth_acos).rem_euclid(360.0)
    };

    SolarPosition {
        zenith: Angle::new::<degree>(90.0 - corrected_elevation),
        azimuth: Angle::new::<degree>(azimuth),
        hour_angle: Angle::new::<degree>(hour_angle),
        elevation: Angle::new::<degree>(corrected_elevation),
        sun_distance,
    }
}

/// Approximate atmospheric refraction in degrees for an elevation in degrees.
#[must_use]
pub fn refraction(elevation: f64) -> f64 {
    let arcseconds = if elevation > 85.0 {
        0.0
    } else if elevation > 5.0 {
        let t = elevation.to_radians().tan();
        58.1 / t - 0.07 / t.powi(3) + 0.000_086 / t.powi(5)
    } else if elevation > -0.575 {
        1735.0 + elevation * (-518.2 + elevation * (103.4 + elevation * (-12.79 + elevation * 0.711)))
    } else {
        -20.772 / elevation.to_radians().tan()
    };
    arcseconds / 3600.0
}
