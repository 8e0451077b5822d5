//! Types and functions for working with coordinates and extents.
//!
//! Coordinates are expressed in the units of the view's projection. For the default
//! [`crate::SWISS_LV03`] projection these are meters, with Bern's old observatory at
//! `600_000, 200_000`.

/// Point in the view's projection.
pub type Coordinate = geo_types::Coord<f64>;

/// Axis-aligned bounding box in the view's projection.
pub type Extent = geo_types::Rect<f64>;

/// Construct [`Coordinate`] from its easting and northing.
pub fn xy(x: f64, y: f64) -> Coordinate {
    Coordinate { x, y }
}

/// Construct [`Extent`] from `[min_x, min_y, max_x, max_y]`, the order most map engines use.
/// Corners given the other way around are normalized.
pub fn extent(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Extent {
    Extent::new(xy(min_x, min_y), xy(max_x, max_y))
}

/// Flatten the extent back into `[min_x, min_y, max_x, max_y]`.
pub fn extent_bounds(extent: &Extent) -> [f64; 4] {
    let min = extent.min();
    let max = extent.max();
    [min.x, min.y, max.x, max.y]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructing_extent() {
        let extent = extent(0.0, 0.0, 100.0, 50.0);
        assert_eq!(xy(0.0, 0.0), extent.min());
        assert_eq!(xy(100.0, 50.0), extent.max());
        assert_eq!(xy(50.0, 25.0), extent.center());
    }

    #[test]
    fn swapped_corners_are_normalized() {
        let extent = extent(100.0, 50.0, 0.0, 0.0);
        assert_eq!([0.0, 0.0, 100.0, 50.0], extent_bounds(&extent));
    }
}
