//! Flow controller: Landing → Input → Processing → Result → Landing.
//!
//! The analysis result only exists inside `FlowState::Result`, so a Result
//! screen without a result cannot be represented, and leaving Result drops the
//! result together with its view state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::analysis::AnalysisError;
use crate::errors::ANALYSIS_FAILED_MESSAGE;
use crate::flow::input::{
    ImportOutcome, InputCollector, InputError, InputSnapshot, MIN_RESUME_CHARS,
};
use crate::models::analysis::AnalysisResult;
use crate::presenter::paywall::{PaymentTicket, PaywallError};
use crate::presenter::view::ResultPage;
use crate::presenter::ResultView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Landing,
    Input,
    Processing,
    Result,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Landing => "landing",
            Stage::Input => "input",
            Stage::Processing => "processing",
            Stage::Result => "result",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum FlowState {
    Landing,
    Input(InputCollector),
    /// The collector is kept so a failed analysis returns to the same text.
    Processing(InputCollector),
    Result(Box<ResultView>),
}

impl FlowState {
    pub fn stage(&self) -> Stage {
        match self {
            FlowState::Landing => Stage::Landing,
            FlowState::Input(_) => Stage::Input,
            FlowState::Processing(_) => Stage::Processing,
            FlowState::Result(_) => Stage::Result,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Cannot {action} during the {stage} stage")]
    InvalidTransition { action: &'static str, stage: Stage },

    #[error("Resume text needs at least {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Paywall(#[from] PaywallError),
}

/// A blocking, user-visible message raised when an analysis fails.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct FlowController {
    state: FlowState,
    notice: Option<Notice>,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowController {
    pub fn new() -> Self {
        Self {
            state: FlowState::Landing,
            notice: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FlowState::Processing(_))
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Landing → Input with an empty collector. Anywhere else it does nothing.
    pub fn start(&mut self) -> bool {
        if !matches!(self.state, FlowState::Landing) {
            return false;
        }
        self.state = FlowState::Input(InputCollector::new());
        true
    }

    fn input_mut(&mut self, action: &'static str) -> Result<&mut InputCollector, FlowError> {
        match &mut self.state {
            FlowState::Input(input) => Ok(input),
            other => Err(FlowError::InvalidTransition {
                action,
                stage: other.stage(),
            }),
        }
    }

    pub fn set_text(&mut self, text: String) -> Result<(), FlowError> {
        self.input_mut("edit text")?.set_text(text);
        Ok(())
    }

    pub fn import_file(
        &mut self,
        file_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<ImportOutcome, FlowError> {
        Ok(self
            .input_mut("import a file")?
            .import_file(file_name, content_type, bytes)?)
    }

    /// Input → Processing. Returns the text to analyze.
    pub fn begin_submit(&mut self) -> Result<String, FlowError> {
        let input = self.input_mut("submit")?;
        if !input.can_submit() {
            return Err(FlowError::TooShort {
                min: MIN_RESUME_CHARS,
                actual: input.char_count(),
            });
        }

        let text = input.text().to_string();
        if let FlowState::Input(input) = std::mem::replace(&mut self.state, FlowState::Landing) {
            self.state = FlowState::Processing(input);
        }
        self.notice = None;
        Ok(text)
    }

    /// Processing → Result on success, Processing → Input with a notice on failure.
    /// Returns whether the flow advanced to Result.
    pub fn finish_submit(
        &mut self,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Result<bool, FlowError> {
        let input = match std::mem::replace(&mut self.state, FlowState::Landing) {
            FlowState::Processing(input) => input,
            other => {
                let stage = other.stage();
                self.state = other;
                return Err(FlowError::InvalidTransition {
                    action: "finish an analysis",
                    stage,
                });
            }
        };

        match outcome {
            Ok(result) => {
                info!("Analysis stored, ats_score={}", result.ats_score);
                self.state = FlowState::Result(Box::new(ResultView::new(result)));
                Ok(true)
            }
            Err(e) => {
                error!("Failed to analyze resume: {e}");
                self.notice = Some(Notice {
                    message: ANALYSIS_FAILED_MESSAGE.to_string(),
                    raised_at: Utc::now(),
                });
                self.state = FlowState::Input(input);
                Ok(false)
            }
        }
    }

    /// Back to Landing, dropping any collector, result and pending payment.
    pub fn reset(&mut self) -> Result<(), FlowError> {
        if let FlowState::Processing(_) = self.state {
            return Err(FlowError::InvalidTransition {
                action: "reset",
                stage: Stage::Processing,
            });
        }
        self.state = FlowState::Landing;
        self.notice = None;
        Ok(())
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn result_view(&self) -> Option<&ResultView> {
        match &self.state {
            FlowState::Result(view) => Some(view.as_ref()),
            _ => None,
        }
    }

    pub fn result_view_mut(&mut self, action: &'static str) -> Result<&mut ResultView, FlowError> {
        match &mut self.state {
            FlowState::Result(view) => Ok(view.as_mut()),
            other => Err(FlowError::InvalidTransition {
                action,
                stage: other.stage(),
            }),
        }
    }

    /// Applies a finished simulated payment. Stale tickets, or a flow that has
    /// left Result since, are ignored.
    pub fn complete_payment(&mut self, ticket: PaymentTicket) -> bool {
        match &mut self.state {
            FlowState::Result(view) => view.paywall_mut().complete(ticket),
            _ => false,
        }
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        let input = match &self.state {
            FlowState::Input(input) | FlowState::Processing(input) => Some(input.snapshot()),
            _ => None,
        };
        FlowSnapshot {
            stage: self.stage(),
            loading: self.is_loading(),
            notice: self.notice().cloned(),
            input,
            result: self.result_view().map(ResultView::render),
        }
    }
}

/// What the browser renders for a session.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub stage: Stage,
    pub loading: bool,
    pub notice: Option<Notice>,
    pub input: Option<InputSnapshot>,
    pub result: Option<ResultPage>,
}
