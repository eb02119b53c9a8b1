//! Round progression: the questionnaire's state machine.
//!
//! The controller maps each [`Action`] to exactly one transition on the
//! borrowed [`Session`]:
//!
//! ```text
//! Intro ──confirm──▶ Active(1) ──submit──▶ … ──submit──▶ Active(N) ──submit──▶ Finished
//!                                                                               │  ▲
//!                                                                               └──┘ export
//! ```
//!
//! `Reset` is accepted everywhere and returns to the starting round. Any other
//! action outside its phase is rejected without touching the session.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::export::{ExportReport, ExportRow, Exporter, RowLayout};
use crate::model::{Phase, Scenario};
use crate::scenarios::{ScenarioBook, ScenarioError};
use crate::session::{Session, SessionError, SessionSettings};

/// Errors raised by controller actions. None of them change the session.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("cannot {action} during {phase}")]
    InvalidAction { action: &'static str, phase: Phase },

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type Result<T> = core::result::Result<T, ControllerError>;

/// Input rejected before it reaches the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty response")]
    EmptyResponse,
}

/// What a round's input starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DraftPolicy {
    /// Each round starts from its own seed text.
    #[default]
    ScenarioDefault,

    /// Each round starts from the previous round's answer.
    CarryOver,
}

/// Behaviour knobs fixed for the lifetime of a controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerOptions {
    pub draft_policy: DraftPolicy,
    pub skip_intro: bool,
    pub layout: RowLayout,
}

/// A participant action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the intro and begin round 1.
    ConfirmStart,

    /// Replace the draft with new text.
    Edit(String),

    /// Record the draft as this round's answer and move on.
    Submit,

    /// Write the response log to the configured sink.
    Export,

    /// Discard everything and start over.
    Reset,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::ConfirmStart => "start",
            Self::Edit(_) => "edit the draft",
            Self::Submit => "submit",
            Self::Export => "export",
            Self::Reset => "reset",
        }
    }
}

/// What an accepted action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Started,
    DraftUpdated,
    Recorded { round: u32, next: Phase },
    Exported(ExportReport),
    Reset,
}

/// Drives one session through the scenario book.
pub struct Controller<'a> {
    book: &'a ScenarioBook,
    session: &'a mut Session,
    exporter: &'a dyn Exporter,
    options: ControllerOptions,
}

impl<'a> Controller<'a> {
    pub fn new(
        book: &'a ScenarioBook,
        session: &'a mut Session,
        exporter: &'a dyn Exporter,
        options: ControllerOptions,
    ) -> Self {
        Self {
            book,
            session,
            exporter,
            options,
        }
    }

    /// Starting values for a session driven with these options.
    ///
    /// When the intro is skipped and drafts don't carry over, the session
    /// starts from round 1's own seed rather than the book's default.
    pub fn session_settings(
        book: &ScenarioBook,
        options: ControllerOptions,
    ) -> Result<SessionSettings> {
        let initial_round = u32::from(options.skip_intro);
        let default_draft = match options.draft_policy {
            DraftPolicy::ScenarioDefault if options.skip_intro => book.seed_for(1)?,
            _ => book.default_draft(),
        };
        Ok(SessionSettings {
            rounds: book.rounds(),
            initial_round,
            default_draft: default_draft.to_string(),
        })
    }

    pub fn session(&self) -> &Session {
        &*self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// The scenario for the current round.
    pub fn current_scenario(&self) -> Result<&'a Scenario> {
        Ok(self.book.lookup(self.session.current_round())?)
    }

    /// Apply one action.
    pub fn handle(&mut self, action: Action) -> Result<Outcome> {
        match (action, self.session.phase()) {
            (Action::Reset, _) => Ok(self.reset()),
            (Action::ConfirmStart, Phase::Intro) => self.confirm_start(),
            (Action::Edit(text), Phase::Active(_)) => {
                self.session.set_draft(text);
                Ok(Outcome::DraftUpdated)
            }
            (Action::Submit, Phase::Active(round)) => self.submit(round),
            (Action::Export, Phase::Finished) => Ok(Outcome::Exported(self.export())),
            (action, phase) => {
                warn!(action = action.name(), %phase, "action rejected");
                Err(ControllerError::InvalidAction {
                    action: action.name(),
                    phase,
                })
            }
        }
    }

    fn confirm_start(&mut self) -> Result<Outcome> {
        if self.options.draft_policy == DraftPolicy::ScenarioDefault {
            let seed = self.book.seed_for(1)?;
            self.session.set_draft(seed);
        }
        self.session.advance_round();
        info!(participant = self.session.participant(), "session started");
        Ok(Outcome::Started)
    }

    fn submit(&mut self, round: u32) -> Result<Outcome> {
        let scenario = self.book.lookup(round)?;
        let content = self.session.draft().to_string();
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyResponse.into());
        }

        // Resolve the next draft before mutating so a failure leaves no trace.
        let next_draft = match self.options.draft_policy {
            DraftPolicy::ScenarioDefault if round < self.book.rounds() => {
                self.book.seed_for(round + 1)?.to_string()
            }
            _ => content.clone(),
        };

        self.session
            .append_record(round, content, scenario.sample.clone(), Timestamp::now())?;
        self.session.set_draft(next_draft);
        self.session.advance_round();

        let next = self.session.phase();
        info!(round, %next, "round completed");
        Ok(Outcome::Recorded { round, next })
    }

    /// Build the row and hand it to the exporter. The session is only read.
    fn export(&self) -> ExportReport {
        let destination = self.exporter.describe();
        let result = ExportRow::build(&*self.session, self.options.layout, Timestamp::now())
            .and_then(|row| self.exporter.append_row(&row));

        match &result {
            Ok(()) => info!(%destination, "responses exported"),
            Err(e) => warn!(%destination, error = %e, "export failed"),
        }
        ExportReport::from_result(&destination, &result)
    }

    fn reset(&mut self) -> Outcome {
        self.session.reset();
        info!("session reset");
        Outcome::Reset
    }
}
