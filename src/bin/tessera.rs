use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tessera", version, about = "Composite images into PNGs")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one request to a PNG.
    Render(RenderArgs),
    /// Render many JSON request files in parallel.
    Batch(BatchArgs),
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// Renderer config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Template preset (overrides the config file).
    #[arg(long, value_enum)]
    template: Option<TemplateArg>,

    /// Register a font file, as `PATH=FAMILY`. Repeatable.
    #[arg(long = "font", value_parser = parse_font_arg)]
    fonts: Vec<(PathBuf, String)>,

    /// Attempt renders without a background instead of rejecting them up front.
    #[arg(long, default_value_t = false)]
    lenient: bool,

    /// What a failing profile picture does.
    #[arg(long, value_enum)]
    profile_failure: Option<ProfileFailureArg>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// JSON request body file.
    #[arg(long, conflicts_with = "query", required_unless_present = "query")]
    request: Option<PathBuf>,

    /// URL query string, e.g. `backgroundImage=bg.png&textContent=Hi`.
    #[arg(long)]
    query: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// JSON request body files.
    #[arg(required = true)]
    requests: Vec<PathBuf>,

    /// Output directory; each result is written as `<request stem>.png`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TemplateArg {
    Freeform,
    ProfileCard,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ProfileFailureArg {
    Abort,
    Skip,
}

fn parse_font_arg(s: &str) -> Result<(PathBuf, String), String> {
    let (path, family) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATH=FAMILY, got '{s}'"))?;
    if path.is_empty() || family.trim().is_empty() {
        return Err(format!("expected PATH=FAMILY, got '{s}'"));
    }
    Ok((PathBuf::from(path), family.trim().to_string()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn build_renderer(args: &ConfigArgs) -> anyhow::Result<tessera::Renderer> {
    let mut cfg = match &args.config {
        Some(path) => tessera::RenderConfig::from_path(path)?,
        None => tessera::RenderConfig::default(),
    };
    cfg.apply_env();

    if let Some(t) = args.template {
        cfg.template.preset = match t {
            TemplateArg::Freeform => tessera::TemplatePreset::Freeform,
            TemplateArg::ProfileCard => tessera::TemplatePreset::ProfileCard,
        };
    }
    for (path, family) in &args.fonts {
        let path = std::fs::canonicalize(path)
            .with_context(|| format!("font file '{}'", path.display()))?;
        cfg.fonts.push(tessera::FontSource {
            path,
            family: family.clone(),
        });
    }
    if args.lenient {
        cfg.input_policy = tessera::InputPolicy::Lenient;
    }
    if let Some(p) = args.profile_failure {
        cfg.profile_failure = match p {
            ProfileFailureArg::Abort => tessera::ProfileFailure::Abort,
            ProfileFailureArg::Skip => tessera::ProfileFailure::Skip,
        };
    }

    Ok(cfg.build_renderer()?)
}

fn read_request(path: &Path) -> anyhow::Result<tessera::RenderRequest> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read request '{}'", path.display()))?;
    tessera::RenderRequest::from_json_slice(&bytes)
        .with_context(|| format!("parse request '{}'", path.display()))
}

fn write_png(out: &Path, png: &tessera::RenderedImage) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, &png.bytes).with_context(|| format!("write png '{}'", out.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let renderer = build_renderer(&args.config)?;
    let request = match (&args.request, &args.query) {
        (Some(path), _) => read_request(path)?,
        (None, Some(q)) => tessera::RenderRequest::from_query_str(q),
        (None, None) => anyhow::bail!("one of --request or --query is required"),
    };

    let png = renderer.render_request(request)?;
    write_png(&args.out, &png)?;
    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        png.width,
        png.height
    );
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let renderer = build_renderer(&args.config)?;

    let mut specs = Vec::with_capacity(args.requests.len());
    for path in &args.requests {
        specs.push(read_request(path)?.into_render_spec());
    }

    let results = renderer.render_batch(specs, args.threads)?;
    let mut failed = 0usize;
    for (path, result) in args.requests.iter().zip(results) {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        let out = args.out_dir.join(format!("{stem}.png"));
        match result {
            Ok(png) => {
                write_png(&out, &png)?;
                eprintln!("wrote {}", out.display());
            }
            Err(err) => {
                failed += 1;
                tracing::error!(request = %path.display(), error = %err, "render failed");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} renders failed", args.requests.len());
    }
    Ok(())
}
