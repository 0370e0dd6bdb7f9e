//! Paceframe burns recorded activity telemetry into per-frame video overlays.
//!
//! The pipeline:
//!
//! - Decode-side collaborators hand over a [`RawRecord`] sequence and a
//!   [`VideoInfo`] (geometry, frame rate, duration).
//! - [`TelemetrySeries`] extracts time-indexed samples, the GPS trail and its
//!   bounding box in one pass; everything is immutable afterwards.
//! - [`OverlayJob`] renders one transparent overlay per video frame (metrics
//!   panel, global route map, local radar map) across a bounded worker
//!   pool, writing indexed PNG files and reporting progress with an ETA.
//! - The resulting [`FrameSequence`] is the contract with an external
//!   muxing/encoding collaborator, which composites the overlays onto the
//!   source video.
#![forbid(unsafe_code)]

mod foundation;

pub mod geo;
pub mod overlay;
pub mod pipeline;
pub mod probe;
pub mod telemetry;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRGBA, Point, VideoInfo};
pub use crate::foundation::error::{PaceframeError, PaceframeResult};

pub use crate::overlay::{FontSet, OverlayRenderer, OverlayStyle};
pub use crate::pipeline::{
    CollectingProgress, FrameSequence, JobState, NullProgress, OverlayJob, ProgressReport,
    ProgressSink,
};
pub use crate::telemetry::lookup::FrameStats;
pub use crate::telemetry::record::RawRecord;
pub use crate::telemetry::series::{GeoBounds, GeoPoint, TelemetrySample, TelemetrySeries};
