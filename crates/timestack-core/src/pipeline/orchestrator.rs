use tracing::info;

use crate::error::Result;
use crate::frame::CompositeImage;
use crate::io::open_source;
use crate::render::save_composite;
use crate::stack::{build_stack, crop_stack, reduce_channels, sample_interval};

use super::config::PipelineConfig;
use super::types::{NoOpReporter, PipelineStage, ProgressReporter};

/// Run every stage up to and including the temporal reduction.
///
/// The whole decoded video is held in memory; peak usage is roughly
/// `frames * width * height * channels` bytes, plus eight bytes per sample
/// once grayscale conversion runs.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
) -> Result<CompositeImage> {
    reporter.begin_stage(PipelineStage::Validating, None);
    config.validate()?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Reading, config.input.to_str());
    let mut source = open_source(&config.input)?;
    let source_info = source.info().clone();
    info!(
        format = %source_info.format,
        width = source_info.width,
        height = source_info.height,
        channels = source_info.channels,
        "Reading input"
    );
    // Spatial bounds are checkable as soon as the frame size is known.
    config
        .roi
        .resolve(source_info.width as usize, source_info.height as usize)?;
    let raw = source.read_frames()?;
    drop(source);
    let stack = build_stack(raw)?;
    reporter.advance(stack.frame_count());
    reporter.finish_stage();

    let interval = config.interval.to_string();
    reporter.begin_stage(PipelineStage::Sampling, Some(&interval));
    let stack = sample_interval(&stack, config.interval)?;
    reporter.advance(stack.frame_count());
    reporter.finish_stage();

    reporter.begin_stage(
        PipelineStage::Cropping,
        Some(if config.grayscale { "grayscale" } else { "color" }),
    );
    let stack = if config.crops() {
        crop_stack(&stack, &config.roi, &config.frame_range)?
    } else {
        stack
    };
    let stack = reduce_channels(stack, config.grayscale)?;
    reporter.advance(stack.frame_count());
    reporter.finish_stage();

    let method = config.method.to_string();
    reporter.begin_stage(PipelineStage::Flattening, Some(&method));
    let composite = stack.reduce(config.method)?;
    reporter.finish_stage();

    Ok(composite)
}

/// Run the pipeline without progress reporting and return the composite.
pub fn run_pipeline(config: &PipelineConfig) -> Result<CompositeImage> {
    run_pipeline_reported(config, &NoOpReporter)
}

/// Run the pipeline and write the rendered composite to `config.output`.
pub fn run_to_file(config: &PipelineConfig, reporter: &dyn ProgressReporter) -> Result<CompositeImage> {
    let composite = run_pipeline_reported(config, reporter)?;

    let output = config.output.to_str();
    reporter.begin_stage(PipelineStage::Rendering, output);
    save_composite(&composite, &config.output, &config.render_options())?;
    reporter.finish_stage();

    Ok(composite)
}
