use std::cell::{Cell, RefCell};
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use timestack_core::pipeline::{PipelineStage, ProgressReporter};

/// Prints one `[n/6]` line per stage, with a spinner while frames decode.
pub struct ConsoleReporter {
    step: Style,
    detail: Style,
    spinner: RefCell<Option<ProgressBar>>,
    frames: Cell<Option<usize>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            step: Style::new().cyan().bold(),
            detail: Style::new().dim(),
            spinner: RefCell::new(None),
            frames: Cell::new(None),
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn begin_stage(&self, stage: PipelineStage, detail: Option<&str>) {
        self.frames.set(None);
        let step = format!("[{}/{}]", stage.number(), PipelineStage::COUNT);
        match detail {
            Some(d) => println!(
                "{} {}: {}",
                self.step.apply_to(step),
                stage,
                self.detail.apply_to(d)
            ),
            None => println!("{} {}", self.step.apply_to(step), stage),
        }

        if stage == PipelineStage::Reading {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("      {spinner} decoding frames ({elapsed})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            *self.spinner.borrow_mut() = Some(pb);
        }
    }

    fn advance(&self, frames_done: usize) {
        self.frames.set(Some(frames_done));
    }

    fn finish_stage(&self) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_and_clear();
        }
        if let Some(frames) = self.frames.take() {
            println!("      {}", self.detail.apply_to(format!("{frames} frames")));
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        // A failed stage never reaches `finish_stage`.
        if let Some(pb) = self.spinner.get_mut().take() {
            pb.finish_and_clear();
        }
    }
}
