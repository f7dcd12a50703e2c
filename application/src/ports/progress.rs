//! Progress notification port
//!
//! Defines the interface for reporting progress during book generation.

use storybook_domain::{PageNumber, RunStage};

/// Phase of a generation run, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationPhase {
    /// Writing the ten-page script
    Script,
    /// Drawing the page illustrations
    Illustrations,
    /// Writing the book to disk
    Saving,
}

impl GenerationPhase {
    pub fn display_name(&self) -> &str {
        match self {
            GenerationPhase::Script => "Writing story script",
            GenerationPhase::Illustrations => "Illustrating pages",
            GenerationPhase::Saving => "Saving book",
        }
    }
}

impl std::fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Callback for progress updates during generation
///
/// Implementations live in the presentation layer.
pub trait GenerationProgress: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: GenerationPhase, total_tasks: usize);

    /// Called when one page of a phase completes
    fn on_page_complete(&self, phase: GenerationPhase, page: PageNumber, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: GenerationPhase);

    /// Called each time the run enters a new stage, including `Failed`
    fn on_stage_entered(&self, _stage: RunStage) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl GenerationProgress for NoProgress {
    fn on_phase_start(&self, _phase: GenerationPhase, _total_tasks: usize) {}
    fn on_page_complete(&self, _phase: GenerationPhase, _page: PageNumber, _success: bool) {}
    fn on_phase_complete(&self, _phase: GenerationPhase) {}
}
