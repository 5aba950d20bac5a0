use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use shotframe::{
    Color, DEFAULT_JPEG_QUALITY, DirectoryDownload, ExportObserver, ExportProgress,
    ExportSettings, ExportState, FfmpegBackend, FrameRatioSpec, MediaKind, SceneStyle,
    ShotframeError, StillFormat, Studio, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "shotframe", version, about = "Frame photos and videos on a styled canvas")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a video (requires `ffmpeg`) or, for images, a still.
    Export(ExportArgs),
    /// Export an image source as a still.
    Still(StillArgs),
    /// Run the preview loop for a number of refresh ticks and save the last frame as PNG.
    Preview(PreviewArgs),
    /// Print the canvas geometry for a media size as JSON.
    Layout(LayoutArgs),
}

#[derive(Args, Debug, Default)]
struct StyleArgs {
    /// Style JSON file; flags below override its values.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Background colour (`#RRGGBB`).
    #[arg(long)]
    background: Option<Color>,

    /// Corner radius in pixels (0 disables rounding).
    #[arg(long)]
    radius: Option<u32>,

    /// Frame ratio, `auto` or `W:H`.
    #[arg(long)]
    ratio: Option<FrameRatioSpec>,

    /// Horizontal shadow offset.
    #[arg(long, allow_hyphen_values = true)]
    shadow_x: Option<i32>,

    /// Vertical shadow offset.
    #[arg(long, allow_hyphen_values = true)]
    shadow_y: Option<i32>,

    /// Shadow blur radius.
    #[arg(long)]
    shadow_blur: Option<u32>,

    /// Shadow opacity in percent.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    shadow_opacity: Option<u8>,
}

impl StyleArgs {
    fn resolve(&self) -> anyhow::Result<SceneStyle> {
        let mut style = match &self.style {
            Some(path) => SceneStyle::from_path(path)
                .with_context(|| format!("load style '{}'", path.display()))?,
            None => SceneStyle::default(),
        };
        if let Some(c) = self.background {
            style.background = c;
        }
        if let Some(r) = self.radius {
            style.corner_radius = r;
        }
        if let Some(r) = self.ratio {
            style.frame_ratio = r;
        }
        if let Some(x) = self.shadow_x {
            style.shadow.offset_x = x;
        }
        if let Some(y) = self.shadow_y {
            style.shadow.offset_y = y;
        }
        if let Some(b) = self.shadow_blur {
            style.shadow.blur_radius = b;
        }
        if let Some(p) = self.shadow_opacity {
            style.shadow = style.shadow.with_opacity_percent(p);
        }
        style.validate()?;
        Ok(style)
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum StillChoice {
    #[default]
    Png,
    Jpeg,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Directory receiving the exported file.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Label prefixed to the output file name.
    #[arg(long)]
    label: Option<String>,

    /// Still encoding for image sources.
    #[arg(long, value_enum, default_value_t = StillChoice::Png)]
    format: StillChoice,

    /// JPEG quality.
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Video bitrate in bits per second.
    #[arg(long)]
    bitrate: Option<u64>,
}

impl OutputArgs {
    fn settings(&self) -> ExportSettings {
        let mut settings = ExportSettings::from_env();
        if let Some(label) = &self.label {
            settings.label = label.clone();
        }
        if let Some(b) = self.bitrate {
            settings.bitrate_bps = b;
        }
        settings.jpeg_quality = self.quality;
        settings
    }

    fn still_format(&self) -> StillFormat {
        match self.format {
            StillChoice::Png => StillFormat::Png,
            StillChoice::Jpeg => StillFormat::Jpeg {
                quality: self.quality,
            },
        }
    }
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Photo or video to frame.
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args, Debug)]
struct StillArgs {
    /// Photo to frame.
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Photo or video to frame.
    input: PathBuf,

    /// Refresh ticks to run.
    #[arg(long, default_value_t = 1)]
    ticks: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Media width in pixels.
    #[arg(long)]
    width: u32,

    /// Media height in pixels.
    #[arg(long)]
    height: u32,

    /// Frame ratio, `auto` or `W:H`.
    #[arg(long, default_value = "auto")]
    ratio: FrameRatioSpec,

    /// Viewport height for the display scale.
    #[arg(long, default_value_t = 1080.0)]
    viewport_height: f64,

    /// Container width for the display scale.
    #[arg(long, default_value_t = 1920.0)]
    container_width: f64,
}

/// Exit status when an export started and then aborted; the input is untouched and the same
/// command can be run again.
const EXIT_EXPORT_ABORTED: u8 = 3;

/// Marks an export that aborted after it started.
#[derive(Debug, thiserror::Error)]
#[error("export aborted; the source is unchanged and the export can be retried")]
struct ExportAborted;

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shotframe=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Still(args) => cmd_still(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Layout(args) => cmd_layout(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(exit_status(&err))
        }
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ExportAborted>().is_some() {
        EXIT_EXPORT_ABORTED
    } else {
        1
    }
}

/// Tag errors that leave the loaded source ready for another export attempt.
fn classify_export_error(err: ShotframeError) -> anyhow::Error {
    let retryable = err.is_export_failure();
    let err = anyhow::Error::new(err);
    if retryable {
        err.context(ExportAborted)
    } else {
        err
    }
}

/// Prints progress lines while a video export records.
#[derive(Default)]
struct ProgressPrinter {
    last: Option<u8>,
}

impl ExportObserver for ProgressPrinter {
    fn on_state(&mut self, state: ExportState) {
        eprintln!("{}", state.as_str());
    }

    fn on_progress(&mut self, progress: &ExportProgress) {
        if self.last == Some(progress.percent) {
            return;
        }
        self.last = Some(progress.percent);
        match &progress.remaining {
            Some(r) => eprintln!("{}% ({r})", progress.percent),
            None => eprintln!("{}%", progress.percent),
        }
    }

    fn on_failed(&mut self, error: &ShotframeError) {
        eprintln!("export failed: {error}");
    }
}

fn open_studio(
    input: &Path,
    style: SceneStyle,
    settings: ExportSettings,
) -> anyhow::Result<Studio> {
    let mut studio = Studio::new(style, settings)?;
    studio
        .load_path(input)
        .with_context(|| format!("load '{}'", input.display()))?;
    Ok(studio)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let settings = args.output.settings();
    let studio = open_studio(&args.input, args.style.resolve()?, settings)?;
    let mut download = DirectoryDownload::new(&args.output.out_dir);

    let kind = studio
        .context()
        .map(|c| c.source().kind())
        .context("no media loaded")?;
    let location = match kind {
        MediaKind::Video => {
            let backend = FfmpegBackend::new(studio.settings().tools.clone());
            studio
                .export_video(&backend, &mut download, &mut ProgressPrinter::default())
                .map_err(classify_export_error)?
                .location
        }
        MediaKind::Image => {
            studio
                .export_still(args.output.still_format(), &mut download)
                .map_err(classify_export_error)?
                .location
        }
    };
    report_written(location)
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let settings = args.output.settings();
    let studio = open_studio(&args.input, args.style.resolve()?, settings)?;
    let mut download = DirectoryDownload::new(&args.output.out_dir);
    let report = studio
        .export_still(args.output.still_format(), &mut download)
        .map_err(classify_export_error)?;
    report_written(report.location)
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let mut studio = open_studio(&args.input, args.style.resolve()?, ExportSettings::from_env())?;
    for _ in 0..args.ticks.max(1) {
        studio.refresh()?;
    }
    let ctx = studio.context().context("no media loaded")?;
    let frame = ctx.live().surface().snapshot();
    let bytes = shotframe::encode_still(frame, StillFormat::Png)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let geometry = shotframe::compute_geometry(args.width, args.height, args.ratio)?;
    let viewport = Viewport {
        height: args.viewport_height,
        container_width: args.container_width,
    };
    let (display_width, display_height) = geometry.display_size(viewport);
    let out = serde_json::json!({
        "canvas_width": geometry.canvas_width,
        "canvas_height": geometry.canvas_height,
        "media_x": geometry.media_x,
        "media_y": geometry.media_y,
        "ratio": args.ratio.to_string(),
        "display_scale": geometry.display_scale(viewport),
        "display_width": display_width,
        "display_height": display_height,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn report_written(location: Option<PathBuf>) -> anyhow::Result<()> {
    match location {
        Some(path) => eprintln!("wrote {}", path.display()),
        None => eprintln!("export delivered"),
    }
    Ok(())
}
