use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use craters::generator::{generate, GeneratorConfig};
use craters::{CraterDetector, DetectorConfig};

/// Lunar crater detection and synthetic crater fields.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Log debug output of every pipeline stage.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect craters in an image and write an annotated copy.
    Detect {
        /// Image to analyse.
        #[arg(short, long)]
        input: PathBuf,
        /// Annotated output image. Defaults to `output-<input file name>`.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Detector configuration file (.yaml, .yml or .json).
        #[arg(short, long)]
        config: Option<String>,
        /// Also write the field statistics to this file (.yaml, .yml or .json).
        #[arg(long)]
        stats: Option<String>,
    },
    /// Run the multi-scale Hough circle detector and list the circles.
    Circles {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Generate a synthetic crater field.
    Generate {
        /// Output width in pixels.
        #[arg(long, default_value_t = 1024)]
        width: u32,
        /// Output height in pixels.
        #[arg(long, default_value_t = 1024)]
        height: u32,
        /// Number of craters to draw.
        #[arg(short = 'n', long, default_value_t = 700)]
        num_craters: usize,
        /// Smallest crater size in pixels.
        #[arg(long, default_value_t = 10.0)]
        min_rad: f64,
        /// Largest crater size in pixels.
        #[arg(long, default_value_t = 30.0)]
        max_rad: f64,
        #[arg(long, default_value_t = 5.0)]
        shadow_factor: f64,
        /// Power-law exponent of the crater sizes.
        #[arg(long, default_value_t = -1.5, allow_hyphen_values = true)]
        alpha: f64,
        /// Seed for a reproducible field.
        #[arg(long)]
        rand_seed: Option<u64>,
        /// Sun angle in degrees.
        #[arg(short = 'a', long, default_value_t = 0.0, allow_hyphen_values = true)]
        angle: f64,
        /// Output image.
        #[arg(short, long, default_value = "craters.png")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _logger = common::setup_logging(if cli.verbose { "debug" } else { "info" }, true);

    let result = match cli.command {
        Command::Detect {
            input,
            output,
            config,
            stats,
        } => run_detect(&input, output, config.as_deref(), stats.as_deref()),
        Command::Circles { input, config } => run_circles(&input, config.as_deref()),
        Command::Generate {
            width,
            height,
            num_craters,
            min_rad,
            max_rad,
            shadow_factor,
            alpha,
            rand_seed,
            angle,
            output,
        } => run_generate(
            GeneratorConfig {
                num_craters,
                width,
                height,
                min_radius: min_rad,
                max_radius: max_rad,
                shadow_factor,
                alpha,
                sun_angle_degrees: angle,
                seed: rand_seed,
            },
            &output,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_detector(config: Option<&str>) -> Result<CraterDetector> {
    let config: DetectorConfig = match config {
        Some(path) => common::file_format::load_file(path)
            .with_context(|| format!("Failed to load detector config '{path}'"))?,
        None => DetectorConfig::default(),
    };
    Ok(CraterDetector::new(config)?)
}

fn open_image(path: &Path) -> Result<image::DynamicImage> {
    image::open(path).with_context(|| format!("Can't load image file '{}'", path.display()))
}

fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.png".to_string());
    PathBuf::from(format!("output-{name}"))
}

fn run_detect(
    input: &Path,
    output: Option<PathBuf>,
    config: Option<&str>,
    stats_path: Option<&str>,
) -> Result<()> {
    let detector = load_detector(config)?;
    let image = open_image(input)?;
    let detection = detector
        .detect(&image)
        .with_context(|| format!("Detection failed on '{}'", input.display()))?;

    let output = output.unwrap_or_else(|| default_output(input));
    detection
        .annotated
        .save(&output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    log::info!("Saved annotated image to {}", output.display());

    let stats = detection.field.stats();
    log::info!("Crater stats:");
    log::info!("  Width: {}", stats.width);
    log::info!("  Height: {}", stats.height);
    log::info!("  Number of craters: {}", stats.num_craters);
    log::info!("  Max radius: {:.2}", stats.max_rad);
    log::info!("  Min radius: {:.2}", stats.min_rad);
    log::info!("  Average radius: {:.2}", stats.mean_rad);
    log::info!("  Average sun angle (degrees): {:.2}", stats.sun_angle_degrees);
    log::debug!(
        "  Thresholds: dark <= {}, bright >= {}",
        detection.bounds.min_val,
        detection.bounds.max_val
    );

    if let Some(path) = stats_path {
        common::file_format::save_file(path, &stats)
            .with_context(|| format!("Failed to write stats '{path}'"))?;
        log::info!("Saved stats to {path}");
    }
    Ok(())
}

fn run_circles(input: &Path, config: Option<&str>) -> Result<()> {
    let detector = load_detector(config)?;
    let image = open_image(input)?;
    let circles = detector
        .find_circles(&image)
        .with_context(|| format!("Circle detection failed on '{}'", input.display()))?;

    log::info!("{} circles in {}", circles.len(), input.display());
    for circle in &circles {
        log::info!("  x={} y={} r={}", circle.x, circle.y, circle.radius);
    }
    Ok(())
}

fn run_generate(config: GeneratorConfig, output: &Path) -> Result<()> {
    let (image, stats) = generate(&config).context("Error generating craters")?;
    image
        .save(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    log::info!("Saved crater field to {}", output.display());

    log::info!("Generated field stats:");
    log::info!("  Width: {}", stats.width);
    log::info!("  Height: {}", stats.height);
    log::info!("  Number of craters: {}", stats.num_craters);
    log::info!("  Max radius: {}", stats.max_rad);
    log::info!("  Min radius: {}", stats.min_rad);
    log::info!("  Average radius: {:.2}", stats.mean_rad);
    log::info!("  Sun angle (degrees): {}", stats.sun_angle_degrees);
    log::info!("  Shadow factor: {}", stats.shadow_factor);
    log::info!("  Alpha: {}", stats.alpha);
    Ok(())
}
