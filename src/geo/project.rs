use crate::foundation::core::Point;
use crate::telemetry::series::{GeoBounds, GeoPoint};

/// Inner margin kept clear on every side of a square map canvas.
pub const MAP_INSET: f64 = 10.0;

/// Approximate meters per degree of latitude.
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Approximate meters per degree of longitude near 40° N.
///
/// Deliberately a fixed constant rather than a latitude-dependent value; the
/// radar window is ~100 m wide, where the error is invisible.
pub const METERS_PER_DEGREE_LON: f64 = 85_000.0;

/// Degree half-window that guarantees `window_meters` is fully visible on
/// both axes of the local map.
pub fn local_zoom_range(window_meters: f64) -> f64 {
    (window_meters / METERS_PER_DEGREE_LAT).max(window_meters / METERS_PER_DEGREE_LON)
}

/// Project a fix onto a square global map canvas of side `map_size`,
/// north-up, using the full activity bounds.
///
/// `bounds.lat_max, bounds.lon_min` lands at the top-left inset corner;
/// a degenerate (zero-range) bounds maps every fix to the canvas center.
pub fn project_global(p: GeoPoint, bounds: &GeoBounds, map_size: f64) -> Point {
    if bounds.coord_range == 0.0 {
        return Point::new(map_size / 2.0, map_size / 2.0);
    }
    let span = map_size - 2.0 * MAP_INSET;
    let x = (p.lon - bounds.lon_min) / bounds.coord_range * span + MAP_INSET;
    let y = (bounds.lat_max - p.lat) / bounds.coord_range * span + MAP_INSET;
    Point::new(x, y)
}

/// Project a fix onto a square local map canvas of side `map_size`,
/// centered on `center` with a `zoom_range` degree half-window.
///
/// Without a center there is nothing to be relative to, so everything maps
/// to the canvas center.
pub fn project_local(
    p: GeoPoint,
    center: Option<GeoPoint>,
    zoom_range: f64,
    map_size: f64,
) -> Point {
    let Some(c) = center else {
        return Point::new(map_size / 2.0, map_size / 2.0);
    };
    let span = map_size - 2.0 * MAP_INSET;
    let x = (p.lon - (c.lon - zoom_range)) / (2.0 * zoom_range) * span + MAP_INSET;
    let y = ((c.lat + zoom_range) - p.lat) / (2.0 * zoom_range) * span + MAP_INSET;
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> GeoBounds {
        GeoBounds {
            lat_min: 40.0,
            lat_max: 40.02,
            lon_min: -75.03,
            lon_max: -75.0,
            coord_range: 0.03,
        }
    }

    #[test]
    fn global_corners_hit_insets() {
        let b = bounds();
        let nw = project_global(
            GeoPoint {
                lat: b.lat_max,
                lon: b.lon_min,
            },
            &b,
            200.0,
        );
        assert_eq!((nw.x, nw.y), (10.0, 10.0));

        let se = project_global(
            GeoPoint {
                lat: b.lat_min,
                lon: b.lon_max,
            },
            &b,
            200.0,
        );
        assert_eq!(se.x, 190.0);
        // Latitude span is smaller than the coord range, so the south edge
        // sits above the inset corner; it still never exceeds it.
        assert!(se.y <= 190.0);
    }

    #[test]
    fn global_square_bounds_hit_opposite_corner() {
        let b = GeoBounds {
            lat_min: 40.0,
            lat_max: 40.03,
            lon_min: -75.03,
            lon_max: -75.0,
            coord_range: 0.03,
        };
        let se = project_global(
            GeoPoint {
                lat: b.lat_min,
                lon: b.lon_max,
            },
            &b,
            200.0,
        );
        assert_eq!((se.x, se.y), (190.0, 190.0));
    }

    #[test]
    fn global_is_pure() {
        let b = bounds();
        let p = GeoPoint {
            lat: 40.01,
            lon: -75.01,
        };
        assert_eq!(project_global(p, &b, 200.0), project_global(p, &b, 200.0));
    }

    #[test]
    fn degenerate_range_maps_to_center() {
        let b = GeoBounds {
            lat_min: 40.0,
            lat_max: 40.0,
            lon_min: -75.0,
            lon_max: -75.0,
            coord_range: 0.0,
        };
        let p = project_global(GeoPoint { lat: 40.0, lon: -75.0 }, &b, 120.0);
        assert_eq!((p.x, p.y), (60.0, 60.0));
    }

    #[test]
    fn local_without_center_maps_to_center() {
        let p = project_local(GeoPoint { lat: 40.0, lon: -75.0 }, None, 0.001, 120.0);
        assert_eq!((p.x, p.y), (60.0, 60.0));
    }

    #[test]
    fn local_center_maps_to_center() {
        let c = GeoPoint {
            lat: 40.0,
            lon: -75.0,
        };
        let p = project_local(c, Some(c), 0.001, 120.0);
        assert_eq!((p.x, p.y), (60.0, 60.0));
    }

    #[test]
    fn zoom_range_takes_the_larger_axis() {
        // Longitude degrees are shorter in meters, so they dominate.
        assert_eq!(local_zoom_range(100.0), 100.0 / METERS_PER_DEGREE_LON);
        assert!(local_zoom_range(100.0) > 100.0 / METERS_PER_DEGREE_LAT);
    }
}
