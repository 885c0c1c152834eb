//! Coordinate conversion module
//!
//! Provides conversions between world grid coordinates and the Web Mercator
//! longitude/latitude space used by the slippy map frontend.
//!
//! The world is an arbitrary-sized square. It is centered inside the smallest
//! power-of-two square that contains it, so that one world cell is exactly one
//! slippy-map tile at zoom [`MapProjection::zoom`]. Markers projected through
//! [`MapProjection`] and raster tiles produced by [`crate::render`] share the
//! same zoom and offset and therefore line up at every zoom level.

mod projection;

pub use projection::{MapProjection, UNIT_SCALE};

use std::f64::consts::PI;

use thiserror::Error;

/// Maximum latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -85.05112878;

/// Errors from forward (lon/lat → map) conversions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),
}

/// Smallest zoom level whose tile grid is at least `size` tiles wide.
///
/// Returns the unique minimal `zoom` with `2^zoom >= size`; sizes 0 and 1
/// both map to zoom 0.
#[inline]
pub fn zoom_for_size(size: u32) -> u32 {
    size.max(1).next_power_of_two().trailing_zeros()
}

/// Converts a position in tile units at `zoom` to longitude/latitude.
///
/// Fractional positions are allowed; `(0, 0)` is the northwest corner of the
/// map and `(2^zoom, 2^zoom)` the southeast corner.
///
/// # Returns
///
/// `(lon, lat)` in degrees, GeoJSON order.
#[inline]
pub fn tile_to_lon_lat(x: f64, y: f64, zoom: u32) -> (f64, f64) {
    let n = 2.0_f64.powi(zoom as i32);

    let lon = x / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let lat_rad = (PI * (1.0 - 2.0 * y / n)).sinh().atan();
    let lat = lat_rad.to_degrees();

    (lon, lat)
}

/// Converts longitude/latitude to a fractional position in tile units.
///
/// # Arguments
///
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `zoom` - Zoom level
#[inline]
pub fn lon_lat_to_tile(lon: f64, lat: f64, zoom: u32) -> Result<(f64, f64), CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }

    let n = 2.0_f64.powi(zoom as i32);
    let x = (lon + 180.0) / 360.0 * n;
    let lat_rad = lat.to_radians();
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n;

    Ok((x, y))
}
