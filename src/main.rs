use anyhow::Context;
use clap::{Parser, Subcommand};
use pcbexpose::{
    exposure_options, finish_exposure, init_logging, render_layer, Bounds, Config, Layer,
    PreviewRecord,
};
use std::path::{Path, PathBuf};

/// Render Gerber layers into exposure masks for resin printer screens
#[derive(Parser)]
#[command(name = "pcbexpose")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a Gerber file and save the rendered layer as PNG
    Render {
        /// Gerber (RS-274X) file
        input: PathBuf,

        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,

        /// Configuration file (.json or .toml); defaults are used otherwise
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Drill layer whose pads are cut out of the rendered layer
        #[arg(long)]
        drill: Option<PathBuf>,

        /// Apply the configured panel correction
        #[arg(long)]
        corrected: bool,

        /// Save the finished exposure mask (mirror, bezel margin, resist
        /// inversion) instead of the plain layer
        #[arg(long)]
        mask: bool,
    },

    /// Encode an image into a preview record
    Encode {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// File offset the record is written at; the bytes before it are zeroed
        #[arg(long, default_value_t = 0)]
        address: u32,
    },

    /// Decode a preview record and save it as PNG
    Decode {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// File offset of the record header
        #[arg(long, default_value_t = 0)]
        address: usize,
    },

    /// Print layer kind, item count and bounds of a Gerber file
    Info { input: PathBuf },

    /// Write a default configuration file
    Config { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    match Cli::parse().command {
        Commands::Render {
            input,
            output,
            config,
            drill,
            corrected,
            mask,
        } => run_render(
            &input,
            &output,
            config.as_deref(),
            drill.as_deref(),
            corrected,
            mask,
        ),
        Commands::Encode {
            input,
            output,
            address,
        } => run_encode(&input, &output, address),
        Commands::Decode {
            input,
            output,
            address,
        } => run_decode(&input, &output, address),
        Commands::Info { input } => run_info(&input),
        Commands::Config { path } => Config::new()
            .save_to_file(&path)
            .with_context(|| format!("Failed to write {}", path.display())),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::new()),
    }
}

fn run_render(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    drill: Option<&Path>,
    corrected: bool,
    mask: bool,
) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let layer = Layer::load(input, Bounds::new())?;
    let drills = drill
        .map(|path| Layer::load(path, *layer.bounds()))
        .transpose()?;

    let image = render_layer(&config, &layer, drills.as_ref(), corrected)?;
    let saved = if mask {
        finish_exposure(&image, &exposure_options(&config)).save(output)
    } else {
        image.save(output)
    };
    saved.with_context(|| format!("Failed to save {}", output.display()))?;

    tracing::info!(output = %output.display(), "Saved image");
    Ok(())
}

fn run_encode(input: &Path, output: &Path, address: u32) -> anyhow::Result<()> {
    let image = image::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?
        .to_rgb8();
    let record = PreviewRecord::from_image(&image);

    let mut bytes = vec![0u8; address as usize];
    bytes.extend(record.to_bytes(address));
    std::fs::write(output, bytes).with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        width = record.resolution_x,
        height = record.resolution_y,
        payload = record.payload.len(),
        "Encoded preview"
    );
    Ok(())
}

fn run_decode(input: &Path, output: &Path, address: usize) -> anyhow::Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let record = PreviewRecord::from_bytes(&bytes, address)?;
    record
        .to_image()?
        .save(output)
        .with_context(|| format!("Failed to save {}", output.display()))?;
    Ok(())
}

fn run_info(input: &Path) -> anyhow::Result<()> {
    let layer = Layer::load(input, Bounds::new())?;
    let result = &layer.interpretation;
    let bounds = layer.bounds();

    println!("Layer:      {}", layer.kind);
    println!("Items:      {} ({} dark)", result.items.len(), result.dark_count());
    println!("Apertures:  {}", result.apertures_defined);
    println!(
        "Bounds:     ({:.4}, {:.4}) - ({:.4}, {:.4}) in",
        bounds.min_x(),
        bounds.min_y(),
        bounds.max_x(),
        bounds.max_y()
    );
    println!(
        "Size:       {:.4} x {:.4} in",
        bounds.width(),
        bounds.height()
    );
    if result.is_stopped() {
        println!("Terminated: stop command");
    }
    Ok(())
}
