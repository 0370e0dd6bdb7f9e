use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::foundation::core::{FrameIndex, Fps, VideoInfo};
use crate::foundation::error::{PaceframeError, PaceframeResult};
use crate::overlay::renderer::OverlayRenderer;
use crate::overlay::style::OverlayStyle;
use crate::overlay::text::FontSet;
use crate::pipeline::progress::{
    FRAME_BAND_START, ProgressSink, REPORT_EVERY, frame_band_percent,
};
use crate::telemetry::series::TelemetrySeries;

/// Upper bound on the worker pool, regardless of core count.
pub const MAX_WORKERS: usize = 8;

/// Job lifecycle. `Completed` and `Error` are terminal and absorbing: a job
/// never leaves them and cannot be re-run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Error,
}

/// Descriptor of a finished overlay frame sequence, everything the muxing
/// collaborator needs: N images at frame rate F, each the size of the source
/// video, in index order.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    dir: PathBuf,
    frame_count: u64,
    fps: Fps,
    width: u32,
    height: u32,
}

impl FrameSequence {
    /// Directory holding the frame files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of frames written.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frame rate the sequence was generated for.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// printf-style name pattern, for muxers that take one.
    pub fn pattern(&self) -> &'static str {
        "frame_%06d.png"
    }

    /// Path of one frame file.
    pub fn frame_path(&self, index: FrameIndex) -> PathBuf {
        self.dir.join(frame_file_name(index.0))
    }

    /// Delete the frame files (and the directory, when that leaves it
    /// empty). Called by the job driver once the muxer has consumed the
    /// sequence.
    pub fn purge(self) -> PaceframeResult<()> {
        for n in 0..self.frame_count {
            let path = self.dir.join(frame_file_name(n));
            if let Err(e) = std::fs::remove_file(&path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                return Err(PaceframeError::pipeline(format!(
                    "failed to remove frame '{}': {e}",
                    path.display()
                )));
            }
        }
        let _ = std::fs::remove_dir(&self.dir);
        Ok(())
    }
}

fn frame_file_name(n: u64) -> String {
    format!("frame_{n:06}.png")
}

/// One overlay-generation job: renders `round(duration * fps)` transparent
/// overlay frames for a video that starts `offset_seconds` into the
/// activity, using a bounded worker pool.
pub struct OverlayJob {
    series: TelemetrySeries,
    video: VideoInfo,
    offset_seconds: f64,
    output_dir: PathBuf,
    style: OverlayStyle,
    workers: Option<usize>,
    state: JobState,
}

impl OverlayJob {
    pub fn new(
        series: TelemetrySeries,
        video: VideoInfo,
        offset_seconds: f64,
        output_dir: impl Into<PathBuf>,
        style: OverlayStyle,
    ) -> Self {
        Self {
            series,
            video,
            offset_seconds,
            output_dir: output_dir.into(),
            style,
            workers: None,
            state: JobState::Pending,
        }
    }

    /// Override the worker count (the default is `min(cores, 8)`).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Run the job to completion.
    ///
    /// Any failure is fatal to the whole job: submission of new frame tasks
    /// stops, in-flight tasks drain, the job transitions to [`JobState::Error`],
    /// the sink receives the `-1` sentinel, and partially written frames are
    /// purged.
    pub fn run(&mut self, progress: &dyn ProgressSink) -> PaceframeResult<FrameSequence> {
        if self.state != JobState::Pending {
            return Err(PaceframeError::validation(
                "job already ran; completed and error states are terminal",
            ));
        }
        self.state = JobState::Processing;
        match self.run_frames(progress) {
            Ok(seq) => {
                self.state = JobState::Completed;
                Ok(seq)
            }
            Err(e) => {
                self.state = JobState::Error;
                progress.report(-1, &format!("overlay job failed: {e}"));
                purge_partial_frames(&self.output_dir, self.video.total_frames());
                Err(e)
            }
        }
    }

    #[tracing::instrument(skip_all)]
    fn run_frames(&self, progress: &dyn ProgressSink) -> PaceframeResult<FrameSequence> {
        if !self.offset_seconds.is_finite() || self.offset_seconds < 0.0 {
            return Err(PaceframeError::input(
                "offset_seconds must be a non-negative number",
            ));
        }
        if self.series.is_empty() {
            return Err(PaceframeError::input("decoded record sequence is empty"));
        }
        let total = self.video.total_frames();
        if total == 0 {
            return Err(PaceframeError::input("video has no frames to overlay"));
        }

        let fonts = FontSet::load(&self.style)?;
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            PaceframeError::input(format!(
                "failed to create output dir '{}': {e}",
                self.output_dir.display()
            ))
        })?;

        let workers = match self.workers {
            Some(n) => n,
            None => default_workers(),
        };
        let pool = build_worker_pool(workers)?;
        let canvas = self.video.canvas();
        let frame_duration = self.video.fps.frame_duration_secs();

        tracing::info!(total, workers, "starting overlay frame generation");
        progress.report(
            FRAME_BAND_START,
            &format!("rendering {total} frames with {workers} workers"),
        );

        let completed = AtomicU64::new(0);
        let started = Instant::now();
        let (tx, rx) = crossbeam_channel::unbounded::<u64>();

        std::thread::scope(|scope| {
            // Single-writer reporter: workers never touch the sink directly,
            // so messages arrive in a total order. Counts that would move
            // percent backwards (completion order is not submission order)
            // are dropped.
            let reporter = scope.spawn(|| {
                let mut last = 0u64;
                while let Ok(count) = rx.recv() {
                    if count <= last {
                        continue;
                    }
                    last = count;
                    let elapsed = started.elapsed().as_secs_f64();
                    let eta = (elapsed / count as f64 * (total - count) as f64) as u64;
                    progress.report(
                        frame_band_percent(count, total),
                        &format!("rendered {count}/{total} frames (eta {eta}s, {workers} workers)"),
                    );
                }
            });

            let render_result = pool.install(|| {
                (0..total).into_par_iter().try_for_each_init(
                    || OverlayRenderer::new(self.style.clone(), fonts.clone()),
                    |renderer, n| -> PaceframeResult<()> {
                        let renderer = renderer.as_mut().map_err(|e| {
                            PaceframeError::pipeline(format!("renderer init failed: {e}"))
                        })?;
                        let activity_time = self.offset_seconds + n as f64 * frame_duration;
                        let stats = self.series.stats_at(activity_time).ok_or_else(|| {
                            PaceframeError::pipeline("telemetry series vanished mid-job")
                        })?;
                        let frame = renderer.render(&stats, canvas, &self.series)?;

                        let path = self.output_dir.join(frame_file_name(n));
                        image::save_buffer_with_format(
                            &path,
                            &frame.data,
                            frame.width,
                            frame.height,
                            image::ColorType::Rgba8,
                            image::ImageFormat::Png,
                        )
                        .map_err(|e| {
                            PaceframeError::pipeline(format!(
                                "write frame '{}': {e}",
                                path.display()
                            ))
                        })?;

                        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        if done % REPORT_EVERY == 0 || done == total {
                            let _ = tx.send(done);
                        }
                        Ok(())
                    },
                )
            });

            drop(tx);
            let _ = reporter.join();
            render_result
        })?;

        tracing::info!(frames = total, "overlay frame generation complete");
        Ok(FrameSequence {
            dir: self.output_dir.clone(),
            frame_count: total,
            fps: self.video.fps,
            width: self.video.width,
            height: self.video.height,
        })
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
        .min(MAX_WORKERS)
}

fn build_worker_pool(workers: usize) -> PaceframeResult<rayon::ThreadPool> {
    if workers == 0 {
        return Err(PaceframeError::validation("worker count must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| PaceframeError::pipeline(format!("failed to build worker pool: {e}")))
}

/// Best-effort removal of whatever the failed job managed to write.
fn purge_partial_frames(dir: &Path, total: u64) {
    for n in 0..total {
        let _ = std::fs::remove_file(dir.join(frame_file_name(n)));
    }
    let _ = std::fs::remove_dir(dir);
}
