mod banner;
mod progress;
mod summary;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use console::Style;
use timestack_core::error::TimestackError;
use timestack_core::pipeline::{run_to_file, PipelineConfig};
use timestack_core::stack::{FrameRange, ReduceMethod, Roi};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::progress::ConsoleReporter;

#[derive(Parser)]
#[command(
    name = "timestack",
    about = "Create time-stack images from movies or animated gifs",
    version,
    disable_version_flag = true
)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,

    /// Path to input file (video, animated GIF or SER)
    #[arg(long = "input_file")]
    input_file: PathBuf,

    /// Path to output image; format follows the extension (png, jpg, tif, bmp)
    #[arg(long = "output_file")]
    output_file: PathBuf,

    /// How frames are flattened: 'min' or 'max'
    #[arg(long, default_value = "min")]
    method: ReduceMethod,

    /// Keep every n-th frame
    #[arg(long, default_value = "1")]
    interval: usize,

    /// Convert frames to grayscale before flattening
    #[arg(long)]
    grayscale: bool,

    /// Output resolution in DPI (100 keeps one pixel per source pixel)
    #[arg(long)]
    dpi: Option<u32>,

    /// Left edge of the region of interest (inclusive)
    #[arg(long = "x_min", allow_negative_numbers = true)]
    x_min: Option<i64>,

    /// Right edge of the region of interest (exclusive)
    #[arg(long = "x_max", allow_negative_numbers = true)]
    x_max: Option<i64>,

    /// Top edge of the region of interest (inclusive)
    #[arg(long = "y_min", allow_negative_numbers = true)]
    y_min: Option<i64>,

    /// Bottom edge of the region of interest (exclusive)
    #[arg(long = "y_max", allow_negative_numbers = true)]
    y_max: Option<i64>,

    /// First sampled frame to keep (inclusive)
    #[arg(long = "first_frame", allow_negative_numbers = true)]
    first_frame: Option<i64>,

    /// Last sampled frame to keep (exclusive)
    #[arg(long = "last_frame", allow_negative_numbers = true)]
    last_frame: Option<i64>,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            method: self.method,
            interval: self.interval,
            grayscale: self.grayscale,
            roi: Roi {
                x_min: self.x_min,
                x_max: self.x_max,
                y_min: self.y_min,
                y_max: self.y_max,
            },
            frame_range: FrameRange {
                first: self.first_frame,
                last: self.last_frame,
            },
            dpi: self.dpi,
            ..PipelineConfig::new(&self.input_file, &self.output_file)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", Style::new().red().bold().apply_to("error:"));
            let code = err
                .downcast_ref::<TimestackError>()
                .map_or(1, TimestackError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    banner::print_banner();

    let config = cli.pipeline_config();
    debug!(?config, "Resolved pipeline configuration");
    summary::print_run_summary(&config);

    let reporter = ConsoleReporter::new();
    let composite = run_to_file(&config, &reporter)
        .with_context(|| format!("time stack of '{}' failed", config.input.display()))?;

    println!(
        "\nSaved {}x{} time stack to {}",
        composite.width(),
        composite.height(),
        config.output.display()
    );
    Ok(())
}
