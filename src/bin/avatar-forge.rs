use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use avatar_forge::{
    AvatarConfig, EngineConfig, HexColor, HttpUploader, PartSelection, RasterOptions,
};

#[derive(Parser, Debug)]
#[command(name = "avatar-forge", version)]
struct Cli {
    /// Log per-layer decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the merged SVG document for a selection.
    Compose(ComposeArgs),
    /// Compose and rasterize a selection to PNG or JPEG.
    Render(RenderArgs),
    /// Print the palette derived from a hex color as JSON.
    Palette(PaletteArgs),
    /// Compose, rasterize and upload; print the avatar config to persist.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Selection JSON (`PartSelection` or a stored avatar config).
    #[arg(long)]
    selection: PathBuf,

    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Selection JSON (`PartSelection` or a stored avatar config).
    #[arg(long)]
    selection: PathBuf,

    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Output edge length in pixels; overrides the config.
    #[arg(long)]
    size: Option<u32>,
}

#[derive(Parser, Debug)]
struct PaletteArgs {
    /// Base color, `#rgb` or `#rrggbb`.
    hex: String,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Selection JSON (`PartSelection` or a stored avatar config).
    #[arg(long)]
    selection: PathBuf,

    /// Engine config JSON; must set `upload_url`.
    #[arg(long)]
    config: PathBuf,

    /// Bearer token for the upload endpoint.
    #[arg(long)]
    token: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Render(args) => cmd_render(args),
        Command::Palette(args) => cmd_palette(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(p) => Ok(EngineConfig::from_path(p)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Accepts either shape; a stored config is recognized by its `outfit` key.
fn read_selection(path: &Path) -> anyhow::Result<PartSelection> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("open selection '{}'", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| "parse selection JSON")?;
    let selection = if value.get("outfit").is_some() {
        let cfg: AvatarConfig =
            serde_json::from_value(value).with_context(|| "parse avatar config")?;
        cfg.to_selection()?
    } else {
        serde_json::from_value(value).with_context(|| "parse part selection")?
    };
    selection.validate()?;
    Ok(selection)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let selection = read_selection(&args.selection)?;
    let source = cfg.asset_source();

    let merged = avatar_forge::compose_with(&selection, source.as_ref(), &cfg.compose_options()?)?;

    ensure_parent(&args.out)?;
    std::fs::write(&args.out, &merged.markup)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({} layers)",
        args.out.display(),
        merged.layer_count()
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let selection = read_selection(&args.selection)?;
    let source = cfg.asset_source();

    let merged = avatar_forge::compose_with(&selection, source.as_ref(), &cfg.compose_options()?)?;
    let raster = RasterOptions {
        size: args.size.unwrap_or(cfg.output_size),
        ..cfg.raster_options()
    };
    let image = avatar_forge::rasterize_with(&merged, &raster)?;

    ensure_parent(&args.out)?;
    std::fs::write(&args.out, &image.bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({}x{} {})",
        args.out.display(),
        image.width,
        image.height,
        image.mime()
    );
    Ok(())
}

fn cmd_palette(args: PaletteArgs) -> anyhow::Result<()> {
    let color = HexColor::parse(&args.hex)?;
    let palette = avatar_forge::derive_palette(&color);
    println!("{}", serde_json::to_string_pretty(&palette)?);
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let cfg = EngineConfig::from_path(&args.config)?;
    let upload_url = cfg
        .upload_url
        .clone()
        .context("config must set upload_url for export")?;
    let selection = read_selection(&args.selection)?;
    let source = cfg.asset_source();
    let uploader = HttpUploader::new(upload_url);

    let persisted = avatar_forge::export_avatar_with(
        &selection,
        source.as_ref(),
        &uploader,
        &args.token,
        &cfg.export_options()?,
    )
    .map_err(|e| {
        if e.is_retryable() {
            anyhow::Error::new(e).context("failed to export avatar, try again")
        } else {
            anyhow::Error::new(e).context("failed to export avatar")
        }
    })?;

    println!("{}", serde_json::to_string_pretty(&persisted)?);
    Ok(())
}
