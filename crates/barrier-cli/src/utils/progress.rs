use barriermd::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;
const SETUP_TEMPLATE: &str = "{spinner:.green} {prefix:.bold} {msg}";
const DYNAMICS_TEMPLATE: &str =
    "{prefix:.bold} [{bar:36.cyan/blue}] {pos}/{len} steps | {msg} | eta {eta}";

/// Terminal view of a simulation: a spinner during setup, then a step bar whose
/// message tracks the most recently sampled frame and its temperature.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target);
        bar.set_style(setup_style());
        Self { bar }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        Box::new(move |progress| apply(&bar, progress))
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(bar: &ProgressBar, progress: Progress) {
    match progress {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_style(setup_style());
            bar.set_prefix(name);
            bar.set_message("");
            bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish_with_message("done");
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            bar.reset();
            bar.set_length(total_steps);
            bar.set_style(dynamics_style());
            bar.set_message("frame 0");
        }
        Progress::TaskIncrement => bar.inc(1),
        Progress::TaskFinish => {
            if let Some(total) = bar.length() {
                bar.set_position(total);
            }
        }
        Progress::FrameSampled {
            frame,
            step,
            temperature,
        } => {
            bar.set_message(format!("frame {frame} @ step {step}, T = {temperature:.0} K"));
        }
        Progress::Message(msg) => bar.println(format!("  {msg}")),
    }
}

fn setup_style() -> ProgressStyle {
    ProgressStyle::with_template(SETUP_TEMPLATE).expect("Failed to create spinner style template")
}

fn dynamics_style() -> ProgressStyle {
    ProgressStyle::with_template(DYNAMICS_TEMPLATE)
        .expect("Failed to create bar style template")
        .progress_chars("=> ")
}
