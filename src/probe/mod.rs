//! Video probing collaborator (`ffprobe`).

pub mod ffprobe;

pub use ffprobe::{is_ffprobe_on_path, parse_rational_fps, probe_video};
