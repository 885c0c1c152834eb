//! Projection of world grid coordinates onto the slippy map.

use super::{lon_lat_to_tile, tile_to_lon_lat, zoom_for_size, CoordError};

/// Number of world grid cells per coarse legends unit.
///
/// Site and region coordinates from the legends are given in these units.
pub const UNIT_SCALE: u32 = crate::world::REGION_UNIT;

/// Projection parameters derived from the world size.
///
/// At zoom level `zoom` the map is `map_size × map_size` tiles and one world
/// cell is exactly one tile. The world sits centered in that square, shifted
/// by `offset` cells from the northwest corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapProjection {
    /// Smallest zoom with `2^zoom >= world_size`.
    pub zoom: u32,
    /// `2^zoom`.
    pub map_size: u32,
    /// Padding between the map edge and the world, in cells.
    pub offset: u32,
}

impl MapProjection {
    /// Derive the projection for a world of the given side length.
    pub fn for_world(world_size: u32) -> Self {
        let zoom = zoom_for_size(world_size);
        let map_size = 1u32 << zoom;
        let offset = (map_size - world_size.min(map_size)) / 2;
        Self {
            zoom,
            map_size,
            offset,
        }
    }

    /// Convert a world cell coordinate to `(lon, lat)`.
    ///
    /// The result is the northwest corner of the cell, which is where the
    /// cell's pixels start in the rendered tiles.
    pub fn to_lon_lat(&self, x: i64, y: i64) -> (f64, f64) {
        let tx = (x + self.offset as i64) as f64;
        let ty = (y + self.offset as i64) as f64;
        tile_to_lon_lat(tx, ty, self.zoom)
    }

    /// Convert a world cell coordinate to the `(lon, lat)` of the cell's
    /// center.
    pub fn cell_center_to_lon_lat(&self, x: i64, y: i64) -> (f64, f64) {
        let tx = (x + self.offset as i64) as f64 + 0.5;
        let ty = (y + self.offset as i64) as f64 + 0.5;
        tile_to_lon_lat(tx, ty, self.zoom)
    }

    /// Convert a coarse legends coordinate to `(lon, lat)`.
    ///
    /// The coordinate is scaled by [`UNIT_SCALE`] and moved by half a unit
    /// so the marker sits at the center of the unit.
    pub fn unit_to_lon_lat(&self, ux: i64, uy: i64) -> (f64, f64) {
        let scale = UNIT_SCALE as i64;
        self.to_lon_lat(ux * scale + scale / 2, uy * scale + scale / 2)
    }

    /// Convert `(lon, lat)` back to a fractional world cell coordinate.
    pub fn from_lon_lat(&self, lon: f64, lat: f64) -> Result<(f64, f64), CoordError> {
        let (tx, ty) = lon_lat_to_tile(lon, lat, self.zoom)?;
        Ok((tx - self.offset as f64, ty - self.offset as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two_world_has_no_offset() {
        let projection = MapProjection::for_world(256);
        assert_eq!(projection.zoom, 8);
        assert_eq!(projection.map_size, 256);
        assert_eq!(projection.offset, 0);
    }

    #[test]
    fn test_odd_world_is_centered() {
        // 257 cells need a 512 wide map: (512 - 257) / 2 = 127
        let projection = MapProjection::for_world(257);
        assert_eq!(projection.zoom, 9);
        assert_eq!(projection.map_size, 512);
        assert_eq!(projection.offset, 127);
    }

    #[test]
    fn test_world_center_maps_near_origin() {
        let projection = MapProjection::for_world(272);
        let (lon, lat) = projection.to_lon_lat(136, 136);
        assert!(lon.abs() < 1.0, "lon {} should be near 0", lon);
        assert!(lat.abs() < 1.0, "lat {} should be near 0", lat);
    }

    #[test]
    fn test_unit_coordinates_are_scaled_and_centered() {
        let projection = MapProjection::for_world(272);
        assert_eq!(projection.unit_to_lon_lat(2, 3), projection.to_lon_lat(40, 56));
    }

    #[test]
    fn test_cell_center_is_half_a_cell_inside() {
        let projection = MapProjection::for_world(1040);
        let (lon, lat) = projection.cell_center_to_lon_lat(123, 456);
        let (x, y) = projection.from_lon_lat(lon, lat).unwrap();
        assert!((x - 123.5).abs() < 1e-6);
        assert!((y - 456.5).abs() < 1e-6);

        let (corner_lon, corner_lat) = projection.to_lon_lat(123, 456);
        assert!(lon > corner_lon);
        assert!(lat < corner_lat);
    }

    #[test]
    fn test_roundtrip_through_lon_lat() {
        let projection = MapProjection::for_world(1040);
        let (lon, lat) = projection.to_lon_lat(123, 456);
        let (x, y) = projection.from_lon_lat(lon, lat).unwrap();
        assert!((x - 123.0).abs() < 1e-6);
        assert!((y - 456.0).abs() < 1e-6);
    }

    #[test]
    fn test_tiny_worlds() {
        let projection = MapProjection::for_world(1);
        assert_eq!(projection.zoom, 0);
        assert_eq!(projection.offset, 0);

        let projection = MapProjection::for_world(4);
        assert_eq!(projection.zoom, 2);
        assert_eq!(projection.offset, 0);
    }
}
