//! Progress reporting for book generation

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use storybook_application::{GenerationPhase, GenerationProgress};
use storybook_domain::{PageNumber, RunStage};

/// Reports progress during generation with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Step label shown in front of each bar
    fn step_name(phase: GenerationPhase) -> &'static str {
        match phase {
            GenerationPhase::Script => "Step 1/3",
            GenerationPhase::Illustrations => "Step 2/3",
            GenerationPhase::Saving => "Step 3/3",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationProgress for ProgressReporter {
    fn on_phase_start(&self, phase: GenerationPhase, total_tasks: usize) {
        // single-task phases get a spinner; there is nothing to count
        let pb = if total_tasks > 1 {
            let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
            pb.set_style(Self::bar_style());
            pb
        } else {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        };
        pb.set_prefix(Self::step_name(phase));
        pb.set_message(phase.display_name().to_string());

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_page_complete(&self, _phase: GenerationPhase, page: PageNumber, success: bool) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} page {}", "v".green(), page)
            } else {
                format!("{} page {}", "x".red(), page)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: GenerationPhase) {
        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} done", phase.display_name().green()));
        }
    }

    fn on_stage_entered(&self, stage: RunStage) {
        if stage == RunStage::Failed
            && let Ok(mut slot) = self.phase_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.abandon_with_message(format!("{}", "failed".red()));
        }
    }
}

/// Plain line-per-event progress on stderr, for when stderr is not a terminal
pub struct SimpleProgress;

impl SimpleProgress {
    fn phase_line(phase: GenerationPhase, total_tasks: usize) -> String {
        if total_tasks > 1 {
            format!(
                "{} {} ({} pages)",
                "->".cyan(),
                phase.display_name().bold(),
                total_tasks
            )
        } else {
            format!("{} {}", "->".cyan(), phase.display_name().bold())
        }
    }

    fn page_line(page: PageNumber, success: bool) -> String {
        if success {
            format!("  {} page {}", "v".green(), page)
        } else {
            format!("  {} page {} (failed)", "x".red(), page)
        }
    }

    fn stage_line(stage: RunStage) -> Option<String> {
        (stage == RunStage::Failed)
            .then(|| format!("{} {}", "x".red(), stage.display_name().red().bold()))
    }
}

impl GenerationProgress for SimpleProgress {
    fn on_phase_start(&self, phase: GenerationPhase, total_tasks: usize) {
        eprintln!("{}", Self::phase_line(phase, total_tasks));
    }

    fn on_page_complete(&self, _phase: GenerationPhase, page: PageNumber, success: bool) {
        eprintln!("{}", Self::page_line(page, success));
    }

    fn on_phase_complete(&self, _phase: GenerationPhase) {}

    fn on_stage_entered(&self, stage: RunStage) {
        if let Some(line) = Self::stage_line(stage) {
            eprintln!("{}", line);
        }
    }
}
