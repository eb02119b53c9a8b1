//! Session state: the participant's identity, round counter, response log,
//! and live draft.
//!
//! A [`SessionStore`] holds at most one [`Session`]. All mutation of a
//! session goes through the operations on [`Session`]; nothing else reaches
//! into its fields.

use jiff::Timestamp;
use tracing::debug;

use crate::model::{Phase, ResponseRecord};

/// Errors raised by session operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("out-of-order response: expected round {expected}, got round {got}")]
    InvalidRoundOrder { expected: u32, got: u32 },
}

pub type Result<T> = core::result::Result<T, SessionError>;

/// Fixed starting values for a session, shared by `initialize` and `reset`.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Number of active rounds, `N`.
    pub rounds: u32,

    /// Round a fresh or reset session starts at: 0 shows the intro, 1 skips it.
    pub initial_round: u32,

    /// Draft text a fresh or reset session starts with.
    pub default_draft: String,
}

/// One participant's pass through the questionnaire.
#[derive(Debug, Clone)]
pub struct Session {
    participant: String,
    round: u32,
    records: Vec<ResponseRecord>,
    draft: String,
    settings: SessionSettings,
}

impl Session {
    fn new(participant: String, settings: SessionSettings) -> Self {
        Self {
            participant,
            round: settings.initial_round,
            records: Vec::new(),
            draft: settings.default_draft.clone(),
            settings,
        }
    }

    /// The opaque participant identifier. Never changes once assigned.
    pub fn participant(&self) -> &str {
        &self.participant
    }

    pub fn current_round(&self) -> u32 {
        self.round
    }

    /// Number of active rounds.
    pub fn rounds(&self) -> u32 {
        self.settings.rounds
    }

    pub fn phase(&self) -> Phase {
        Phase::of(self.round, self.settings.rounds)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        debug!(len = self.draft.len(), "draft updated");
    }

    /// The response log, in round order.
    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    /// The answer submitted for `round`, if that round is complete.
    pub fn response(&self, round: u32) -> Option<&ResponseRecord> {
        self.records.iter().find(|r| r.round == round)
    }

    /// Append a response to the log.
    ///
    /// Rounds must be gapless: the first record is round 1 and each later one
    /// is exactly one past the previous. A rejected append leaves the log as
    /// it was.
    pub fn append_record(
        &mut self,
        round: u32,
        content: impl Into<String>,
        context: Option<String>,
        submitted_at: Timestamp,
    ) -> Result<()> {
        let expected = self.records.last().map_or(1, |r| r.round + 1);
        if round != expected {
            return Err(SessionError::InvalidRoundOrder {
                expected,
                got: round,
            });
        }

        let content = content.into();
        debug!(round, len = content.len(), "response recorded");
        self.records.push(ResponseRecord {
            round,
            content,
            context,
            submitted_at,
        });
        Ok(())
    }

    /// Move to the next round. Stops at the terminal sentinel `N + 1`.
    pub fn advance_round(&mut self) -> u32 {
        let terminal = self.settings.rounds + 1;
        if self.round < terminal {
            self.round += 1;
        }
        self.round
    }

    /// Back to the starting round with an empty log and the default draft.
    ///
    /// The participant identifier is kept. Any in-progress draft is lost.
    pub fn reset(&mut self) {
        self.round = self.settings.initial_round;
        self.records.clear();
        self.draft.clone_from(&self.settings.default_draft);
    }
}

/// Holds the session, creating it on first use.
#[derive(Debug)]
pub struct SessionStore {
    settings: SessionSettings,
    session: Option<Session>,
}

impl SessionStore {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            session: None,
        }
    }

    /// Create the session if none exists yet, then return it.
    ///
    /// `participant` is only called when a session is created, so the
    /// identifier is assigned exactly once. Calling again is a no-op.
    pub fn initialize(&mut self, participant: impl FnOnce() -> String) -> &mut Session {
        let settings = &self.settings;
        self.session.get_or_insert_with(|| {
            let session = Session::new(participant(), settings.clone());
            debug!(participant = session.participant(), "session created");
            session
        })
    }

    /// The session, if one has been created.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SessionSettings {
        SessionSettings {
            rounds: 5,
            initial_round: 0,
            default_draft: "default".into(),
        }
    }

    fn session() -> Session {
        Session::new("p-1".into(), settings())
    }

    #[test]
    fn fresh_session_starts_at_initial_round() {
        let s = session();
        assert_eq!(s.current_round(), 0);
        assert_eq!(s.phase(), Phase::Intro);
        assert_eq!(s.draft(), "default");
        assert!(s.records().is_empty());
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut store = SessionStore::new(settings());
        assert!(store.session().is_none());

        store.initialize(|| "first".into()).advance_round();
        let again = store.initialize(|| "second".into());

        assert_eq!(again.participant(), "first");
        assert_eq!(again.current_round(), 1);
    }

    #[test]
    fn append_requires_gapless_rounds() {
        let mut s = session();
        s.append_record(1, "A", None, Timestamp::now()).unwrap();

        let err = s.append_record(3, "C", None, Timestamp::now()).unwrap_err();

        assert_eq!(
            err,
            SessionError::InvalidRoundOrder {
                expected: 2,
                got: 3
            }
        );
        assert_eq!(s.records().len(), 1);
    }

    #[test]
    fn first_append_must_be_round_one() {
        let mut s = session();
        let err = s.append_record(2, "B", None, Timestamp::now()).unwrap_err();
        assert!(matches!(err, SessionError::InvalidRoundOrder { expected: 1, .. }));
        assert!(s.records().is_empty());
    }

    #[test]
    fn duplicate_round_is_rejected() {
        let mut s = session();
        s.append_record(1, "A", None, Timestamp::now()).unwrap();
        assert!(s.append_record(1, "A again", None, Timestamp::now()).is_err());
        assert_eq!(s.response(1).unwrap().content, "A");
    }

    #[test]
    fn advance_stops_at_terminal_sentinel() {
        let mut s = session();
        for _ in 0..10 {
            s.advance_round();
        }
        assert_eq!(s.current_round(), 6);
        assert_eq!(s.phase(), Phase::Finished);
    }

    #[test]
    fn reset_keeps_participant_only() {
        let mut s = session();
        s.advance_round();
        s.set_draft("typed");
        s.append_record(1, "A", Some("code".into()), Timestamp::now())
            .unwrap();
        s.advance_round();

        s.reset();

        assert_eq!(s.participant(), "p-1");
        assert_eq!(s.current_round(), 0);
        assert_eq!(s.draft(), "default");
        assert!(s.records().is_empty());
    }

    #[test]
    fn reset_honours_skipped_intro() {
        let mut s = Session::new(
            "p-2".into(),
            SessionSettings {
                initial_round: 1,
                ..settings()
            },
        );
        s.advance_round();
        s.reset();
        assert_eq!(s.current_round(), 1);
    }
}
