use crate::foundation::error::{PaceframeError, PaceframeResult};

pub use kurbo::Point;

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
///
/// Kept rational because video containers report rates like `30000/1001`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> PaceframeResult<Self> {
        if num == 0 {
            return Err(PaceframeError::validation("Fps num must be > 0"));
        }
        if den == 0 {
            return Err(PaceframeError::validation("Fps den must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Geometry and timing of the source video, as reported by a probing
/// collaborator (see [`crate::probe`]) or supplied explicitly.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame rate.
    pub fps: Fps,
    /// Total duration in seconds.
    pub duration_secs: f64,
}

impl VideoInfo {
    /// Number of overlay frames to generate: `round(duration * fps)`.
    pub fn total_frames(self) -> u64 {
        (self.duration_secs * self.fps.as_f64()).round().max(0.0) as u64
    }

    /// Canvas matching the video geometry.
    pub fn canvas(self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// A rendered overlay frame as RGBA8 pixels.
///
/// Overlay frames are **straight alpha** at this boundary (the muxing
/// collaborator composites them over video). The `premultiplied` flag makes
/// that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_rejects_zero_parts() {
        assert!(Fps::new(0, 1).is_err());
        assert!(Fps::new(30, 0).is_err());
        assert!(Fps::new(30, 1).is_ok());
    }

    #[test]
    fn fps_ntsc_rate() {
        let fps = Fps::new(30000, 1001).unwrap();
        assert!((fps.as_f64() - 29.97).abs() < 0.01);
    }

    #[test]
    fn total_frames_rounds() {
        let info = VideoInfo {
            width: 64,
            height: 64,
            fps: Fps::new(30, 1).unwrap(),
            duration_secs: 1.49,
        };
        // 44.7 rounds to 45, not truncates to 44.
        assert_eq!(info.total_frames(), 45);
    }

    #[test]
    fn total_frames_empty_video() {
        let info = VideoInfo {
            width: 64,
            height: 64,
            fps: Fps::new(30, 1).unwrap(),
            duration_secs: 0.0,
        };
        assert_eq!(info.total_frames(), 0);
    }
}
