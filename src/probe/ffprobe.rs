use std::path::Path;
use std::process::Command;

use crate::foundation::core::{Fps, VideoInfo};
use crate::foundation::error::{PaceframeError, PaceframeResult};

/// Return `true` when an `ffprobe` binary is available on `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[derive(serde::Deserialize)]
struct StreamsDoc {
    #[serde(default)]
    streams: Vec<StreamEntry>,
}

#[derive(serde::Deserialize)]
struct StreamEntry {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

#[derive(serde::Deserialize)]
struct FormatDoc {
    format: FormatEntry,
}

#[derive(serde::Deserialize)]
struct FormatEntry {
    duration: Option<String>,
}

/// Probe a video's geometry and timing with `ffprobe`.
///
/// This is the probing collaborator from the pipeline's point of view;
/// callers that already know the geometry can construct a [`VideoInfo`]
/// directly instead.
pub fn probe_video(path: &Path) -> PaceframeResult<VideoInfo> {
    if !path.is_file() {
        return Err(PaceframeError::input(format!(
            "video file not found: '{}'",
            path.display()
        )));
    }
    if !is_ffprobe_on_path() {
        return Err(PaceframeError::input(
            "ffprobe is required to probe videos, but was not found on PATH",
        ));
    }

    let streams_json = run_ffprobe(path, "stream=width,height,r_frame_rate")?;
    let (width, height, fps) = parse_stream_info(&streams_json)?;
    let format_json = run_ffprobe(path, "format=duration")?;
    let duration_secs = parse_duration(&format_json)?;

    Ok(VideoInfo {
        width,
        height,
        fps,
        duration_secs,
    })
}

fn run_ffprobe(path: &Path, entries: &str) -> PaceframeResult<String> {
    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_entries", entries])
        .arg(path)
        .output()
        .map_err(|e| PaceframeError::input(format!("failed to spawn ffprobe: {e}")))?;
    if !output.status.success() {
        return Err(PaceframeError::input(format!(
            "ffprobe failed for '{}'",
            path.display()
        )));
    }
    String::from_utf8(output.stdout)
        .map_err(|e| PaceframeError::input(format!("ffprobe produced invalid UTF-8: {e}")))
}

fn parse_stream_info(json: &str) -> PaceframeResult<(u32, u32, Fps)> {
    let doc: StreamsDoc = serde_json::from_str(json)
        .map_err(|e| PaceframeError::input(format!("parse ffprobe stream info: {e}")))?;
    let stream = doc
        .streams
        .iter()
        .find(|s| s.width.is_some() && s.height.is_some())
        .ok_or_else(|| PaceframeError::input("ffprobe reported no video stream"))?;
    let width = stream
        .width
        .ok_or_else(|| PaceframeError::input("video stream has no width"))?;
    let height = stream
        .height
        .ok_or_else(|| PaceframeError::input("video stream has no height"))?;
    let rate = stream
        .r_frame_rate
        .as_deref()
        .ok_or_else(|| PaceframeError::input("video stream has no frame rate"))?;
    Ok((width, height, parse_rational_fps(rate)?))
}

fn parse_duration(json: &str) -> PaceframeResult<f64> {
    let doc: FormatDoc = serde_json::from_str(json)
        .map_err(|e| PaceframeError::input(format!("parse ffprobe format info: {e}")))?;
    let raw = doc
        .format
        .duration
        .ok_or_else(|| PaceframeError::input("ffprobe reported no duration"))?;
    let secs: f64 = raw
        .parse()
        .map_err(|e| PaceframeError::input(format!("bad duration '{raw}': {e}")))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(PaceframeError::input(format!("bad duration '{raw}'")));
    }
    Ok(secs)
}

/// Parse an ffprobe rational frame rate like `"30000/1001"` or `"25"`.
pub fn parse_rational_fps(raw: &str) -> PaceframeResult<Fps> {
    let bad = || PaceframeError::input(format!("bad frame rate '{raw}'"));
    match raw.split_once('/') {
        Some((num, den)) => {
            let num: u32 = num.trim().parse().map_err(|_| bad())?;
            let den: u32 = den.trim().parse().map_err(|_| bad())?;
            Fps::new(num, den).map_err(|_| bad())
        }
        None => {
            let num: u32 = raw.trim().parse().map_err(|_| bad())?;
            Fps::new(num, 1).map_err(|_| bad())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational_rates_parse() {
        assert_eq!(parse_rational_fps("30000/1001").unwrap(), Fps::new(30000, 1001).unwrap());
        assert_eq!(parse_rational_fps("25").unwrap(), Fps::new(25, 1).unwrap());
        assert_eq!(parse_rational_fps("60/1").unwrap(), Fps::new(60, 1).unwrap());
    }

    #[test]
    fn degenerate_rates_are_rejected() {
        assert!(parse_rational_fps("0/1").is_err());
        assert!(parse_rational_fps("30/0").is_err());
        assert!(parse_rational_fps("nope").is_err());
        assert!(parse_rational_fps("-30/1").is_err());
    }

    #[test]
    fn stream_info_parses_ffprobe_shape() {
        let json = r#"{"streams":[{"width":1920,"height":1080,"r_frame_rate":"30000/1001"}]}"#;
        let (w, h, fps) = parse_stream_info(json).unwrap();
        assert_eq!((w, h), (1920, 1080));
        assert_eq!(fps, Fps::new(30000, 1001).unwrap());
    }

    #[test]
    fn audio_only_streams_are_skipped() {
        // Audio streams carry no width/height; the first video stream wins.
        let json = r#"{"streams":[{"r_frame_rate":"0/0"},{"width":640,"height":480,"r_frame_rate":"25/1"}]}"#;
        let (w, h, fps) = parse_stream_info(json).unwrap();
        assert_eq!((w, h), (640, 480));
        assert_eq!(fps, Fps::new(25, 1).unwrap());
    }

    #[test]
    fn no_video_stream_is_an_input_error() {
        let err = parse_stream_info(r#"{"streams":[]}"#).unwrap_err();
        assert!(matches!(err, PaceframeError::Input(_)));
    }

    #[test]
    fn duration_parses_ffprobe_shape() {
        let json = r#"{"format":{"duration":"63.366000"}}"#;
        assert!((parse_duration(json).unwrap() - 63.366).abs() < 1e-9);
    }

    #[test]
    fn missing_duration_is_an_input_error() {
        assert!(parse_duration(r#"{"format":{}}"#).is_err());
    }
}
