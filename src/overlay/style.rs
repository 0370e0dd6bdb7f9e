use std::path::PathBuf;

/// Sizing and font configuration for the overlay.
///
/// Every length is a fraction of `base = min(width, height)` so the overlay
/// is resolution independent.
#[derive(Clone, Debug)]
pub struct OverlayStyle {
    /// Bold font file for metric values. `None` tries a set of well-known
    /// system font locations.
    pub font_bold: Option<PathBuf>,
    /// Regular font file for unit suffixes; falls back to the bold font.
    pub font_regular: Option<PathBuf>,
    /// Main (value) font size fraction.
    pub font_frac: f64,
    /// Unit-suffix font size fraction.
    pub font_small_frac: f64,
    /// Outer margin fraction.
    pub margin_frac: f64,
    /// Panel padding fraction.
    pub padding_frac: f64,
    /// Global route map side, as a fraction of `base`.
    pub route_map_frac: f64,
    /// Radar map side, as a fraction of `base`.
    pub radar_map_frac: f64,
    /// Real-world half-window shown by the radar map, in meters.
    pub radar_window_meters: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_bold: None,
            font_regular: None,
            font_frac: 0.05,
            font_small_frac: 0.035,
            margin_frac: 0.03,
            padding_frac: 0.025,
            route_map_frac: 0.5,
            radar_map_frac: 0.3,
            radar_window_meters: 100.0,
        }
    }
}

/// Straight-alpha RGBA used across the overlay drawing code.
pub(crate) type Rgba = [u8; 4];

pub(crate) const VALUE_COLOR: Rgba = [255, 255, 255, 255];
pub(crate) const UNIT_COLOR: Rgba = [255, 255, 255, 200];
/// Trail not yet traveled.
pub(crate) const TRAIL_AHEAD_COLOR: Rgba = [255, 255, 255, 255];
/// Trail up to the current position, slightly dimmed.
pub(crate) const TRAIL_BEHIND_COLOR: Rgba = [200, 200, 200, 255];
pub(crate) const MARKER_COLOR: Rgba = [255, 255, 255, 255];
pub(crate) const RADAR_BACKGROUND: Rgba = [0, 0, 0, 120];
pub(crate) const RADAR_BORDER: Rgba = [255, 255, 255, 150];
