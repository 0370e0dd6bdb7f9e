use crate::telemetry::series::{TelemetrySample, TelemetrySeries};

/// Display-ready values for one overlay frame, derived from a sample at
/// lookup time rather than stored.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStats {
    /// Heart rate in bpm, `0` when absent.
    pub heart_rate: u32,
    /// Formatted pace per kilometre (`"m:ss"`), `"--:--"` when not moving.
    pub pace: String,
    /// Cadence in steps per minute. The log counts single-leg revolutions,
    /// so the displayed value is doubled.
    pub cadence_spm: u32,
    /// Distance covered in kilometres.
    pub distance_km: f64,
    /// Power in watts, `0` when absent.
    pub power: u32,
    /// Sample index the stats were derived from.
    pub index: usize,
}

impl FrameStats {
    fn from_sample(index: usize, sample: &TelemetrySample) -> Self {
        Self {
            heart_rate: sample.heart_rate.unwrap_or(0),
            pace: format_pace(sample.speed),
            cadence_spm: sample.cadence.map(|c| (c * 2.0) as u32).unwrap_or(0),
            distance_km: sample.distance.unwrap_or(0.0) / 1000.0,
            power: sample.power.unwrap_or(0),
            index,
        }
    }
}

impl TelemetrySeries {
    /// Sample-and-hold lookup plus derivation of display fields.
    ///
    /// `None` only for an empty series; any `offset_secs >= 0` otherwise
    /// resolves via clamping (see [`TelemetrySeries::sample_at`]).
    pub fn stats_at(&self, offset_secs: f64) -> Option<FrameStats> {
        let (index, sample) = self.sample_at(offset_secs)?;
        Some(FrameStats::from_sample(index, sample))
    }
}

/// Format speed (m/s) as pace per kilometre.
///
/// `1000 / speed` seconds per km, rendered `minutes:seconds` with a two-digit
/// seconds field. Not moving (absent, zero or negative speed) renders the
/// `"--:--"` sentinel.
pub fn format_pace(speed: Option<f64>) -> String {
    match speed {
        Some(v) if v > 0.0 => {
            let pace_secs = 1000.0 / v;
            let mins = (pace_secs / 60.0) as u64;
            let secs = (pace_secs % 60.0) as u64;
            format!("{mins}:{secs:02}")
        }
        _ => "--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::record::RawRecord;

    fn series_with_speeds(speeds: &[Option<f64>]) -> TelemetrySeries {
        let records: Vec<RawRecord> = speeds
            .iter()
            .map(|s| RawRecord {
                speed: *s,
                ..RawRecord::default()
            })
            .collect();
        TelemetrySeries::from_records(&records)
    }

    #[test]
    fn pace_sentinel_iff_not_moving() {
        assert_eq!(format_pace(None), "--:--");
        assert_eq!(format_pace(Some(0.0)), "--:--");
        assert_eq!(format_pace(Some(-1.0)), "--:--");
        assert_ne!(format_pace(Some(0.1)), "--:--");
    }

    #[test]
    fn pace_round_trips_exact_speeds() {
        // Speeds that divide 1000 m without a binary fraction remainder, so
        // 1000/speed is exact and truncation cannot flip a digit.
        for (speed, expected) in [
            (10.0, "1:40"),
            (8.0, "2:05"),
            (5.0, "3:20"),
            (4.0, "4:10"),
            (2.0, "8:20"),
            (1.0, "16:40"),
        ] {
            assert_eq!(format_pace(Some(speed)), expected);
        }
    }

    #[test]
    fn five_sample_scenario() {
        let series =
            series_with_speeds(&[Some(0.0), Some(2.0), Some(4.0), Some(0.0), Some(5.0)]);
        let paces: Vec<String> = (0..5)
            .map(|i| series.stats_at(i as f64).unwrap().pace)
            .collect();
        assert_eq!(paces, ["--:--", "8:20", "4:10", "--:--", "3:20"]);
    }

    #[test]
    fn stats_clamp_past_end() {
        let series = series_with_speeds(&[Some(2.0), Some(5.0)]);
        assert_eq!(series.stats_at(100.0).unwrap().index, 1);
        assert_eq!(series.stats_at(100.0).unwrap().pace, "3:20");
    }

    #[test]
    fn cadence_is_doubled_and_truncated() {
        let series = TelemetrySeries::from_records(&[RawRecord {
            cadence: Some(87.4),
            ..RawRecord::default()
        }]);
        assert_eq!(series.stats_at(0.0).unwrap().cadence_spm, 174);
    }

    #[test]
    fn absent_fields_default_to_zero() {
        let series = TelemetrySeries::from_records(&[RawRecord::default()]);
        let stats = series.stats_at(0.0).unwrap();
        assert_eq!(stats.heart_rate, 0);
        assert_eq!(stats.cadence_spm, 0);
        assert_eq!(stats.distance_km, 0.0);
        assert_eq!(stats.power, 0);
    }

    #[test]
    fn distance_converts_to_km() {
        let series = TelemetrySeries::from_records(&[RawRecord {
            distance: Some(12_345.0),
            ..RawRecord::default()
        }]);
        assert_eq!(series.stats_at(0.0).unwrap().distance_km, 12.345);
    }
}
