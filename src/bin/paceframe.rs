use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "paceframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single overlay frame as a PNG to check the layout.
    Preview(PreviewArgs),
    /// Render the full overlay frame sequence for a video.
    Frames(FramesArgs),
}

#[derive(Args, Debug)]
struct GeometryArgs {
    /// Source video to probe with ffprobe.
    #[arg(long)]
    video: Option<PathBuf>,

    /// Frame width in pixels (alternative to --video).
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Frame height in pixels (alternative to --video).
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Frame rate, integer or rational like 30000/1001 (with --width/--height).
    #[arg(long, default_value = "30")]
    fps: String,

    /// Video duration in seconds (with --width/--height).
    #[arg(long, default_value_t = 0.0)]
    duration: f64,
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Bold font file for metric values (defaults to system fonts).
    #[arg(long)]
    font_bold: Option<PathBuf>,

    /// Regular font file for unit suffixes (defaults to system fonts).
    #[arg(long)]
    font_regular: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Decoded record sequence as JSON (array of records).
    #[arg(long)]
    records: PathBuf,

    /// Activity offset of the previewed frame, MM:SS or plain seconds.
    #[arg(long, default_value = "0:00")]
    offset: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    geometry: GeometryArgs,

    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Args, Debug)]
struct FramesArgs {
    /// Decoded record sequence as JSON (array of records).
    #[arg(long)]
    records: PathBuf,

    /// Activity offset where the video begins, MM:SS or plain seconds.
    #[arg(long, default_value = "0:00")]
    offset: String,

    /// Directory to write the frame sequence into.
    #[arg(long)]
    out_dir: PathBuf,

    /// Worker pool size (default: min(cores, 8)).
    #[arg(long)]
    workers: Option<usize>,

    #[command(flatten)]
    geometry: GeometryArgs,

    #[command(flatten)]
    fonts: FontArgs,
}

/// Progress sink that mirrors reports onto stderr.
struct StderrProgress;

impl paceframe::ProgressSink for StderrProgress {
    fn report(&self, percent: i32, message: &str) {
        eprintln!("[{percent:>3}%] {message}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn read_records(path: &Path) -> anyhow::Result<Vec<paceframe::RawRecord>> {
    let f = File::open(path).with_context(|| format!("open records '{}'", path.display()))?;
    let r = BufReader::new(f);
    let records: Vec<paceframe::RawRecord> =
        serde_json::from_reader(r).with_context(|| "parse records JSON")?;
    Ok(records)
}

/// Accept `MM:SS` (the form activity apps show) or plain seconds.
fn parse_offset(raw: &str) -> anyhow::Result<f64> {
    if let Some((mins, secs)) = raw.split_once(':') {
        let mins: u64 = mins
            .trim()
            .parse()
            .with_context(|| format!("bad offset '{raw}', expected MM:SS"))?;
        let secs: u64 = secs
            .trim()
            .parse()
            .with_context(|| format!("bad offset '{raw}', expected MM:SS"))?;
        if secs >= 60 {
            anyhow::bail!("bad offset '{raw}': seconds must be < 60");
        }
        Ok((mins * 60 + secs) as f64)
    } else {
        let secs: f64 = raw
            .trim()
            .parse()
            .with_context(|| format!("bad offset '{raw}', expected MM:SS or seconds"))?;
        Ok(secs)
    }
}

fn resolve_video(geometry: &GeometryArgs) -> anyhow::Result<paceframe::VideoInfo> {
    if let Some(video) = &geometry.video {
        return Ok(paceframe::probe::probe_video(video)?);
    }
    let (Some(width), Some(height)) = (geometry.width, geometry.height) else {
        anyhow::bail!("pass either --video or both --width and --height");
    };
    Ok(paceframe::VideoInfo {
        width,
        height,
        fps: paceframe::probe::parse_rational_fps(&geometry.fps)?,
        duration_secs: geometry.duration,
    })
}

fn style_with_fonts(fonts: &FontArgs) -> paceframe::OverlayStyle {
    paceframe::OverlayStyle {
        font_bold: fonts.font_bold.clone(),
        font_regular: fonts.font_regular.clone(),
        ..paceframe::OverlayStyle::default()
    }
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let offset = parse_offset(&args.offset)?;
    let records = read_records(&args.records)?;
    let series = paceframe::TelemetrySeries::from_records(&records);
    let video = resolve_video(&args.geometry)?;

    let style = style_with_fonts(&args.fonts);
    let fonts = paceframe::FontSet::load(&style)?;
    let mut renderer = paceframe::OverlayRenderer::new(style, fonts)?;

    let stats = series
        .stats_at(offset)
        .ok_or_else(|| anyhow::anyhow!("records file contains no records"))?;
    let frame = renderer.render(&stats, video.canvas(), &series)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let offset = parse_offset(&args.offset)?;

    eprintln!("[  0%] reading records");
    let records = read_records(&args.records)?;
    let series = paceframe::TelemetrySeries::from_records(&records);

    eprintln!("[  5%] resolving video geometry");
    let video = resolve_video(&args.geometry)?;

    let mut job = paceframe::OverlayJob::new(
        series,
        video,
        offset,
        &args.out_dir,
        style_with_fonts(&args.fonts),
    );
    if let Some(workers) = args.workers {
        job = job.with_workers(workers);
    }

    let seq = job.run(&StderrProgress)?;

    eprintln!(
        "wrote {} frames ({}x{}) to {}",
        seq.frame_count(),
        seq.width(),
        seq.height(),
        seq.dir().display()
    );
    eprintln!(
        "mux input: -framerate {}/{} -i {}",
        seq.fps().num,
        seq.fps().den,
        seq.dir().join(seq.pattern()).display()
    );
    Ok(())
}
