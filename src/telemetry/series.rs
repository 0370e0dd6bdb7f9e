use crate::telemetry::record::{RawRecord, semicircles_to_degrees};

/// A GPS fix in degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, north positive.
    pub lat: f64,
    /// Longitude in degrees, east positive.
    pub lon: f64,
}

/// Bounding box over every fix in a trail.
///
/// `coord_range` is the larger of the two spans so the global map keeps its
/// aspect ratio. A zero range (single fix, or all fixes identical) is a valid
/// value; the projector maps everything to the canvas center in that case.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    /// `max(lat_max - lat_min, lon_max - lon_min)`.
    pub coord_range: f64,
}

impl GeoBounds {
    /// Reduce an iterator of fixes into bounds. `None` when there are no
    /// fixes at all.
    pub fn from_fixes<I: IntoIterator<Item = GeoPoint>>(fixes: I) -> Option<Self> {
        let mut it = fixes.into_iter();
        let first = it.next()?;
        let mut b = GeoBounds {
            lat_min: first.lat,
            lat_max: first.lat,
            lon_min: first.lon,
            lon_max: first.lon,
            coord_range: 0.0,
        };
        for p in it {
            b.lat_min = b.lat_min.min(p.lat);
            b.lat_max = b.lat_max.max(p.lat);
            b.lon_min = b.lon_min.min(p.lon);
            b.lon_max = b.lon_max.max(p.lon);
        }
        b.coord_range = (b.lat_max - b.lat_min).max(b.lon_max - b.lon_min);
        Some(b)
    }
}

/// One telemetry sample at a 1 Hz time index.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TelemetrySample {
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
    /// GPS fix, if the record carried both coordinates.
    pub position: Option<GeoPoint>,
}

/// The whole activity: ordered samples, an index-aligned GPS trail, and the
/// bounds over every fix.
///
/// Built once, never mutated afterwards; concurrent frame tasks share it by
/// plain reference.
#[derive(Clone, Debug)]
pub struct TelemetrySeries {
    samples: Vec<TelemetrySample>,
    trail: Vec<Option<GeoPoint>>,
    bounds: Option<GeoBounds>,
}

impl TelemetrySeries {
    /// Extract samples and the GPS trail from decoded records in one pass.
    ///
    /// A record missing either coordinate yields "no fix", never a zero
    /// coordinate. Missing numeric fields stay absent.
    pub fn from_records(records: &[RawRecord]) -> Self {
        let mut samples = Vec::with_capacity(records.len());
        let mut trail = Vec::with_capacity(records.len());

        for rec in records {
            let position = match (rec.position_lat, rec.position_long) {
                (Some(lat), Some(lon)) => Some(GeoPoint {
                    lat: semicircles_to_degrees(i64::from(lat)),
                    lon: semicircles_to_degrees(i64::from(lon)),
                }),
                _ => None,
            };
            samples.push(TelemetrySample {
                heart_rate: rec.heart_rate,
                speed: rec.speed,
                cadence: rec.cadence,
                distance: rec.distance,
                power: rec.power,
                position,
            });
            trail.push(position);
        }

        let bounds = GeoBounds::from_fixes(trail.iter().filter_map(|p| *p));
        Self {
            samples,
            trail,
            bounds,
        }
    }

    /// Number of samples (1 Hz, so also the activity length in seconds).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` when no records were decoded at all.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The index-aligned trail: `trail()[i]` is the fix for sample `i`.
    pub fn trail(&self) -> &[Option<GeoPoint>] {
        &self.trail
    }

    /// Bounds over every fix; `None` when the activity has no fixes, in
    /// which case map rendering is skipped entirely.
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    /// Nearest-previous sample for an activity offset (1 Hz sample-and-hold).
    ///
    /// `index = clamp(floor(offset), 0, len - 1)`; sub-second precision is
    /// intentionally discarded and offsets past the end of the recording
    /// clamp to the last sample. `None` only for an empty series.
    pub fn sample_at(&self, offset_secs: f64) -> Option<(usize, &TelemetrySample)> {
        if self.samples.is_empty() {
            return None;
        }
        let idx = (offset_secs.max(0.0).floor() as usize).min(self.samples.len() - 1);
        Some((idx, &self.samples[idx]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec_at(lat: Option<i32>, lon: Option<i32>) -> RawRecord {
        RawRecord {
            position_lat: lat,
            position_long: lon,
            ..RawRecord::default()
        }
    }

    #[test]
    fn half_fix_is_no_fix() {
        let series =
            TelemetrySeries::from_records(&[rec_at(Some(1 << 20), None), rec_at(None, Some(55))]);
        assert_eq!(series.trail(), &[None, None][..]);
        assert!(series.bounds().is_none());
    }

    #[test]
    fn trail_aligns_with_samples() {
        let series = TelemetrySeries::from_records(&[
            rec_at(Some(1 << 20), Some(2 << 20)),
            rec_at(None, None),
            rec_at(Some(3 << 20), Some(1 << 20)),
        ]);
        assert_eq!(series.len(), 3);
        assert!(series.trail()[0].is_some());
        assert!(series.trail()[1].is_none());
        assert!(series.trail()[2].is_some());
        for (i, fix) in series.trail().iter().enumerate() {
            assert_eq!(*fix, series.sample_at(i as f64).unwrap().1.position);
        }
    }

    #[test]
    fn bounds_span_all_fixes() {
        let series = TelemetrySeries::from_records(&[
            rec_at(Some(1 << 20), Some(4 << 20)),
            rec_at(Some(3 << 20), Some(2 << 20)),
        ]);
        let b = series.bounds().unwrap();
        assert_eq!(b.lat_min, semicircles_to_degrees(1 << 20));
        assert_eq!(b.lat_max, semicircles_to_degrees(3 << 20));
        assert_eq!(b.lon_min, semicircles_to_degrees(2 << 20));
        assert_eq!(b.lon_max, semicircles_to_degrees(4 << 20));
        // Both spans are equal here, so range is either of them.
        assert_eq!(b.coord_range, b.lat_max - b.lat_min);
    }

    #[test]
    fn single_fix_has_zero_range() {
        let series = TelemetrySeries::from_records(&[rec_at(Some(5 << 20), Some(5 << 20))]);
        let b = series.bounds().unwrap();
        assert_eq!(b.coord_range, 0.0);
    }

    #[test]
    fn missing_fields_stay_absent() {
        let series = TelemetrySeries::from_records(&[RawRecord::default()]);
        let (_, sample) = series.sample_at(0.0).unwrap();
        assert_eq!(sample.heart_rate, None);
        assert_eq!(sample.speed, None);
        assert_eq!(sample.position, None);
    }

    #[test]
    fn sample_at_clamps_both_ends() {
        let series = TelemetrySeries::from_records(&[
            RawRecord {
                heart_rate: Some(100),
                ..RawRecord::default()
            },
            RawRecord {
                heart_rate: Some(110),
                ..RawRecord::default()
            },
            RawRecord {
                heart_rate: Some(120),
                ..RawRecord::default()
            },
        ]);
        assert_eq!(series.sample_at(0.0).unwrap().0, 0);
        assert_eq!(series.sample_at(0.99).unwrap().0, 0);
        assert_eq!(series.sample_at(1.0).unwrap().0, 1);
        assert_eq!(series.sample_at(2.0).unwrap().0, 2);
        // Past the end of the recording: hold the last sample.
        assert_eq!(series.sample_at(1e9).unwrap().0, 2);
    }

    #[test]
    fn empty_series_has_no_samples() {
        let series = TelemetrySeries::from_records(&[]);
        assert!(series.is_empty());
        assert!(series.sample_at(0.0).is_none());
    }
}
