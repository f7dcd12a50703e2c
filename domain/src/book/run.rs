//! Generation run stages
//!
//! A run moves strictly forward:
//!
//! ```text
//! Idle -> ScriptGenerated -> Image1Generated -> ImagesComplete -> Persisted
//! ```
//!
//! and may enter `Failed` from any non-terminal stage.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Stage of a book generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStage {
    Idle,
    ScriptGenerated,
    Image1Generated,
    ImagesComplete,
    Persisted,
    Failed,
}

impl RunStage {
    pub fn as_str(&self) -> &str {
        match self {
            RunStage::Idle => "idle",
            RunStage::ScriptGenerated => "script_generated",
            RunStage::Image1Generated => "image1_generated",
            RunStage::ImagesComplete => "images_complete",
            RunStage::Persisted => "persisted",
            RunStage::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            RunStage::Idle => "Idle",
            RunStage::ScriptGenerated => "Script Generated",
            RunStage::Image1Generated => "Reference Image Generated",
            RunStage::ImagesComplete => "Images Complete",
            RunStage::Persisted => "Persisted",
            RunStage::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStage::Persisted | RunStage::Failed)
    }

    /// The only stage reachable from this one on success
    pub fn next(&self) -> Option<RunStage> {
        match self {
            RunStage::Idle => Some(RunStage::ScriptGenerated),
            RunStage::ScriptGenerated => Some(RunStage::Image1Generated),
            RunStage::Image1Generated => Some(RunStage::ImagesComplete),
            RunStage::ImagesComplete => Some(RunStage::Persisted),
            RunStage::Persisted | RunStage::Failed => None,
        }
    }
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tracks the stage of one generation run (Entity)
#[derive(Debug, Clone)]
pub struct GenerationRun {
    stage: RunStage,
    history: Vec<RunStage>,
    failure: Option<String>,
}

impl Default for GenerationRun {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationRun {
    pub fn new() -> Self {
        Self {
            stage: RunStage::Idle,
            history: vec![RunStage::Idle],
            failure: None,
        }
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    /// Every stage entered so far, starting with `Idle`
    pub fn history(&self) -> &[RunStage] {
        &self.history
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Move to `to`, which must be the immediate successor of the current stage
    pub fn advance(&mut self, to: RunStage) -> Result<(), DomainError> {
        if self.stage.next() != Some(to) {
            return Err(DomainError::InvalidTransition {
                from: self.stage.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        self.enter(to);
        Ok(())
    }

    /// Record an unrecovered error and enter `Failed`
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        if self.stage.is_terminal() {
            return Err(DomainError::InvalidTransition {
                from: self.stage.as_str().to_string(),
                to: RunStage::Failed.as_str().to_string(),
            });
        }
        self.failure = Some(reason.into());
        self.enter(RunStage::Failed);
        Ok(())
    }

    fn enter(&mut self, stage: RunStage) {
        self.stage = stage;
        self.history.push(stage);
    }
}
