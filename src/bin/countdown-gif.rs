use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};

use countdown_gif::server::config::{LoggerConfig, LoggerFormat, ServiceConfig};
use countdown_gif::server::logger::init_logger;
use countdown_gif::{FontLibrary, FontOptions, RenderRequest};

#[derive(Parser, Debug)]
#[command(name = "countdown-gif", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Render one countdown GIF to disk.
    Render(RenderArgs),
    /// Render the first frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// JSON service config; environment variables and flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    port: Option<u16>,

    /// Directory rendered GIFs are written to.
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Font file for the counters. Defaults to a system sans-serif face.
    #[arg(long)]
    font_regular: Option<PathBuf>,

    /// Font file for the labels. Defaults to a system semibold face.
    #[arg(long)]
    font_semibold: Option<PathBuf>,
}

impl FontArgs {
    fn apply(self, opts: &mut FontOptions) {
        if let Some(path) = self.font_regular {
            opts.regular = Some(path);
        }
        if let Some(path) = self.font_semibold {
            opts.semibold = Some(path);
        }
    }
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Target date/time, e.g. `2030-01-01` or `2030-01-01T12:00:00+02:00`.
    #[arg(long)]
    time: String,

    /// Width before zoom (150-500).
    #[arg(long)]
    width: Option<i64>,

    /// Height before zoom (150-500).
    #[arg(long)]
    height: Option<i64>,

    /// Text color, `RRGGBB`.
    #[arg(long)]
    color: Option<String>,

    /// Background color, `RRGGBB`.
    #[arg(long)]
    bg: Option<String>,

    /// Output file stem.
    #[arg(long)]
    name: Option<String>,

    /// Number of frames (1-90).
    #[arg(long)]
    frames: Option<i64>,
}

impl From<RequestArgs> for RenderRequest {
    fn from(args: RequestArgs) -> Self {
        Self {
            time: Some(args.time),
            width: args.width,
            height: args.height,
            text_color: args.color,
            background_color: args.bg,
            name: args.name,
            frames: args.frames,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Directory the GIF is written to.
    #[arg(long, default_value = "./tmp")]
    out_dir: PathBuf,

    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    fonts: FontArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServiceConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = args.scratch_dir {
        config.scratch_dir = dir;
    }
    args.fonts.apply(&mut config.fonts);
    init_logger(&config.logger);

    let rt = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    rt.block_on(countdown_gif::server::run(config))?;
    Ok(())
}

fn cli_logger() {
    init_logger(&LoggerConfig {
        level: std::env::var("COUNTDOWN_LOGGER_LEVEL").unwrap_or_else(|_| "warn".to_owned()),
        format: LoggerFormat::Compact,
    });
}

fn load_fonts(args: FontArgs) -> anyhow::Result<FontLibrary> {
    let mut opts = FontOptions {
        regular: std::env::var_os("COUNTDOWN_FONT_REGULAR").map(PathBuf::from),
        semibold: std::env::var_os("COUNTDOWN_FONT_SEMIBOLD").map(PathBuf::from),
    };
    args.apply(&mut opts);
    FontLibrary::load(&opts).context("load fonts")
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    cli_logger();
    let fonts = load_fonts(args.fonts)?;
    let request = RenderRequest::from(args.request);
    let outcome = countdown_gif::render_countdown(&request, &fonts, &args.out_dir, Utc::now())?;

    eprintln!(
        "wrote {} ({} frames, {} bytes)",
        outcome.path.display(),
        outcome.frames,
        outcome.bytes
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    cli_logger();
    let fonts = load_fonts(args.fonts)?;
    let request = RenderRequest::from(args.request);
    let frame = countdown_gif::render_preview_frame(&request, &fonts, Utc::now())?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
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
