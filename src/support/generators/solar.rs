//! Coordinate broadcasts and solar geometry fields.

use ndarray::Array3;
use uom::si::angle::{degree, radian};

use crate::support::{
    grid::{Axis, FieldMeta},
    solar::{self, SolarPosition},
};

use super::{Context, Generator, GeneratorError, GeneratorRegistry};

const COORDINATES: [&str; 3] = ["time", "longitude", "latitude"];

pub(super) fn register(registry: &mut GeneratorRegistry) {
    registry
        .register(
            Generator::new("coordinates", coordinates)
                .provides(&["ts", "lon", "lat"])
                .requires(&COORDINATES),
        )
        .register(
            Generator::new("solar_position", solar_position)
                .provides(&["solza", "solaz", "solhra", "soldist"])
                .requires(&COORDINATES),
        );
}

fn coordinates(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    let grid = ctx.grid();
    let ts = grid.broadcast(Axis::Time, &grid.unix_seconds())?;
    let lon = grid.broadcast(Axis::Longitude, grid.longitude())?;
    let lat = grid.broadcast(Axis::Latitude, grid.latitude())?;

    ctx.insert("ts", ts, FieldMeta::new("s", "seconds since 1970-01-01"))?;
    ctx.insert("lon", lon, FieldMeta::new("degrees_east", "longitude"))?;
    ctx.insert("lat", lat, FieldMeta::new("degrees_north", "latitude"))
}

fn solar_position(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    let grid = ctx.grid();
    let seconds = grid.unix_seconds();
    let positions: Array3<SolarPosition> = Array3::from_shape_fn(grid.shape(), |(t, i, j)| {
        solar::position_at_unix(seconds[t], grid.longitude()[j], grid.latitude()[i])
    });

    let noaa = "https://gml.noaa.gov/grad/solcalc/calcdetails.html";
    ctx.insert(
        "solza",
        positions.mapv(|p| p.zenith.get::<radian>()),
        FieldMeta::new("rad", "Solar zenith angle corrected for atmospheric refraction")
            .with_attr("source", noaa),
    )?;
    ctx.insert(
        "solaz",
        positions.mapv(|p| p.azimuth.get::<degree>()),
        FieldMeta::new("deg CW from N", "Solar azimuth angle").with_attr("source", noaa),
    )?;
    ctx.insert(
        "solhra",
        positions.mapv(|p| p.hour_angle.get::<radian>()),
        FieldMeta::new("rad", "Solar hour angle").with_attr("source", noaa),
    )?;
    ctx.insert(
        "soldist",
        positions.mapv(|p| p.sun_distance),
        FieldMeta::new("au", "Earth-sun distance").with_attr("source", noaa),
    )
}
