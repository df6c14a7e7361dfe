//! Shortwave radiation rates, direct-beam split, albedo and 2 m wind.
//!
//! Radiation inputs are energies accumulated over the
//! `radiation_integration_time` option (J/m²). When `radiation_cumulative` is
//! set they accumulate since the start of the series and are differenced
//! first.

use ndarray::{Array2, Array3, Axis, Zip, s};

use crate::support::{grid::FieldMeta, solar::SOLAR_CONSTANT};

use super::{Context, Generator, GeneratorError, GeneratorRegistry, option};

/// Exponent of the power-law profile scaling 10 m wind to 2 m.
const WIND_PROFILE_EXPONENT: f64 = 0.28;

/// Largest direct-beam fraction passed on to the models.
const MAX_DIRECT_FRACTION: f64 = 0.9;

pub(super) fn register(registry: &mut GeneratorRegistry) {
    let integration = [option::RADIATION_INTEGRATION_TIME];

    registry
        .register(
            Generator::new("irradiance", |ctx| {
                radiation_rate(ctx, "ssrd", "Isw_in", "Surface solar irradiance downwards")
            })
            .provides(&["Isw_in"])
            .requires(&["ssrd"])
            .options(&integration),
        )
        .register(
            Generator::new("net_irradiance", |ctx| {
                radiation_rate(ctx, "ssr", "Isw_net", "Net short-wave radiation flux")
            })
            .provides(&["Isw_net"])
            .requires(&["ssr"])
            .options(&integration),
        )
        .register(
            Generator::new("cloud_direct_fraction", cloud_split)
                .provides(&["Isw_frac", "Ibeam"])
                .requires(&["Isw_in", "tcc"]),
        )
        .register(
            Generator::new("cloud_direct_fraction", cloud_split)
                .provides(&["Isw_frac", "Ibeam"])
                .requires(&["ssrd", "tcc"])
                .options(&integration),
        )
        .register(
            Generator::new("direct_fraction", direct_split)
                .provides(&["Isw_frac", "Ibeam"])
                .requires(&["Isw_in"]),
        )
        .register(
            Generator::new("direct_fraction", direct_split)
                .provides(&["Isw_frac", "Ibeam"])
                .requires(&["ssrd"])
                .options(&integration),
        )
        .register(
            Generator::new("albedo", albedo)
                .provides(&["fal"])
                .requires(&["Isw_in", "Isw_net"]),
        )
        .register(
            Generator::new("albedo", albedo)
                .provides(&["fal"])
                .requires(&["ssrd", "ssr"])
                .options(&integration),
        )
        .register(
            Generator::new("wind_2m", wind_2m)
                .provides(&["ws2"])
                .requires(&["ws10"]),
        )
        .register(
            Generator::new("wind_2m", wind_2m)
                .provides(&["ws2"])
                .requires(&["u10", "v10"]),
        );
}

/// Converts running totals along the time axis into per-step amounts.
///
/// The first step is kept as is. A decrease marks a restart of the
/// accumulation, in which case the value itself is the step amount.
#[must_use]
pub fn deaccumulate(values: &Array3<f64>) -> Array3<f64> {
    let mut out = values.clone();
    for t in 1..values.len_of(Axis(0)) {
        let previous = values.index_axis(Axis(0), t - 1);
        let current = values.index_axis(Axis(0), t);
        Zip::from(out.index_axis_mut(Axis(0), t))
            .and(&current)
            .and(&previous)
            .for_each(|step, &now, &before| {
                let diff = now - before;
                *step = if diff < 0.0 { now } else { diff };
            });
    }
    out
}

fn radiation_rate(
    ctx: &mut Context<'_>,
    source: &str,
    target: &str,
    long_name: &str,
) -> Result<(), GeneratorError> {
    let seconds = ctx.options().number(option::RADIATION_INTEGRATION_TIME)?;
    let energy = ctx.values(source)?;
    let energy = if ctx.options().flag(option::RADIATION_CUMULATIVE) {
        deaccumulate(energy)
    } else {
        energy.clone()
    };
    ctx.insert(target, energy / seconds, FieldMeta::new("W m**-2", long_name))
}

/// Erbs diffuse fraction for a clearness index.
fn diffuse_fraction(clearness: f64) -> f64 {
    if clearness <= 0.22 {
        1.0 - 0.09 * clearness
    } else if clearness <= 0.8 {
        0.9511 - 0.1604 * clearness + 4.388 * clearness.powi(2) - 16.638 * clearness.powi(3)
            + 12.336 * clearness.powi(4)
    } else {
        0.165
    }
}

/// Diffuse fraction for a total cloud cover between 0 and 1.
fn cloud_diffuse_fraction(cover: f64) -> f64 {
    if cover <= 0.22 {
        1.0 - 0.09 * cover
    } else if cover <= 0.8 {
        0.9511 - 0.1604 * cover + 4.39 * cover.powi(2) - 16.64 * cover.powi(3)
    } else {
        0.165
    }
}

/// Direct-beam fraction of global irradiance under a total cloud cover.
fn cloud_direct_fraction(irradiance: f64, cover: f64) -> f64 {
    if irradiance.is_nan() || cover.is_nan() {
        return f64::NAN;
    }
    if irradiance < 1.0 {
        return 0.0;
    }
    (1.0 - cloud_diffuse_fraction(cover)).clamp(0.0, MAX_DIRECT_FRACTION)
}

/// Direct-beam fraction of global irradiance.
///
/// `zenith` is in radians and `sun_distance` in astronomical units.
fn direct_fraction(irradiance: f64, zenith: f64, sun_distance: f64) -> f64 {
    if irradiance.is_nan() {
        return f64::NAN;
    }
    if irradiance < 1.0 {
        return 0.0;
    }

    let extraterrestrial = SOLAR_CONSTANT * zenith.cos() / (sun_distance * sun_distance);
    if extraterrestrial <= 0.0 {
        return 0.0;
    }

    let clearness = (irradiance / extraterrestrial).min(1.0);
    (1.0 - diffuse_fraction(clearness)).clamp(0.0, MAX_DIRECT_FRACTION)
}

fn cloud_split(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    ctx.ensure("Isw_in")?;

    let fraction = Zip::from(ctx.values("Isw_in")?)
        .and(ctx.values("tcc")?)
        .map_collect(|&isw, &cover| cloud_direct_fraction(isw, cover));

    insert_split(ctx, fraction, "diffuse fraction from total cloud cover")
}

fn direct_split(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    ctx.ensure_all(&["Isw_in", "solza", "soldist"])?;

    let fraction = Zip::from(ctx.values("Isw_in")?)
        .and(ctx.values("solza")?)
        .and(ctx.values("soldist")?)
        .map_collect(|&isw, &zenith, &distance| direct_fraction(isw, zenith, distance));

    insert_split(ctx, fraction, "Erbs diffuse fraction from the clearness index")
}

fn insert_split(
    ctx: &mut Context<'_>,
    fraction: Array3<f64>,
    method: &str,
) -> Result<(), GeneratorError> {
    let beam = ctx.values("Isw_in")? * &fraction;

    ctx.insert(
        "Isw_frac",
        fraction,
        FieldMeta::new("1", "Fraction direct/total radiation").with_attr("method", method),
    )?;
    ctx.insert(
        "Ibeam",
        beam,
        FieldMeta::new("W m**-2", "Direct beam irradiance"),
    )
}

/// Median of the finite values, `NaN` if there are none.
fn finite_median(values: impl Iterator<Item = f64>) -> f64 {
    let mut finite: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        0.5 * (finite[mid - 1] + finite[mid])
    } else {
        finite[mid]
    }
}

fn albedo(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    ctx.ensure_all(&["Isw_in", "Isw_net"])?;

    let reflected = Zip::from(ctx.values("Isw_in")?)
        .and(ctx.values("Isw_net")?)
        .map_collect(|&incoming, &net| (incoming - net) / incoming);

    let (steps, lats, lons) = reflected.dim();
    let median = Array2::from_shape_fn((lats, lons), |(i, j)| {
        finite_median(reflected.slice(s![.., i, j]).iter().copied())
    });
    let values = Array3::from_shape_fn((steps, lats, lons), |(_, i, j)| median[[i, j]]);

    ctx.insert(
        "fal",
        values,
        FieldMeta::new("1", "Albedo").with_attr("method", "time median of reflected fraction"),
    )
}

fn wind_2m(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    ctx.ensure("ws10")?;
    let values = ctx.values("ws10")? * (2.0_f64 / 10.0).powf(WIND_PROFILE_EXPONENT);
    ctx.insert("ws2", values, FieldMeta::new("m s**-1", "Wind speed at 2 metre"))
}
