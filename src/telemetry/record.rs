/// One decoded sensor-log record, as handed over by the log-parsing
/// collaborator.
///
/// Every field is optional: sensors drop in and out mid-activity and a
/// missing value is a representable state, not an error. Positions arrive in
/// the log's native fixed-point "semicircle" units and are converted to
/// degrees during series extraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RawRecord {
    /// Heart rate in beats per minute.
    pub heart_rate: Option<u32>,
    /// Speed in meters per second.
    pub speed: Option<f64>,
    /// Single-leg cadence in revolutions per minute.
    pub cadence: Option<f64>,
    /// Cumulative distance in meters.
    pub distance: Option<f64>,
    /// Power in watts.
    pub power: Option<u32>,
    /// Latitude in semicircle units.
    pub position_lat: Option<i32>,
    /// Longitude in semicircle units.
    pub position_long: Option<i32>,
}

/// Convert semicircle units to degrees: `±2^31` spans `±180°`.
pub fn semicircles_to_degrees(raw: i64) -> f64 {
    raw as f64 * (180.0 / 2f64.powi(31))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicircles_anchor_points() {
        assert_eq!(semicircles_to_degrees(0), 0.0);
        assert_eq!(semicircles_to_degrees(1 << 31), 180.0);
        assert_eq!(semicircles_to_degrees(-(1 << 31)), -180.0);
    }

    #[test]
    fn semicircles_is_linear() {
        let a = semicircles_to_degrees(1 << 20);
        assert_eq!(semicircles_to_degrees(3 << 20), 3.0 * a);
    }

    #[test]
    fn semicircles_round_trips() {
        let raw = 477_626_154i64; // ~40.03 degrees
        let deg = semicircles_to_degrees(raw);
        let back = (deg / 180.0 * 2f64.powi(31)).round() as i64;
        assert_eq!(back, raw);
    }

    #[test]
    fn record_deserializes_with_gaps() {
        let rec: RawRecord = serde_json::from_str(r#"{"heart_rate": 150}"#).unwrap();
        assert_eq!(rec.heart_rate, Some(150));
        assert_eq!(rec.speed, None);
        assert_eq!(rec.position_lat, None);
    }
}
