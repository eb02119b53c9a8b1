//! Session phase: where a session stands in the round sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a session is, derived from its round counter.
///
/// Round 0 is the intro, rounds `1..=N` are active, and `N + 1` is the
/// terminal sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "round", rename_all = "camelCase")]
pub enum Phase {
    /// Orientation text, nothing collected yet.
    Intro,

    /// A scenario is on screen and one answer is expected.
    Active(u32),

    /// Every round has been answered; only export and reset remain.
    Finished,
}

impl Phase {
    /// Derive the phase for `round` in a questionnaire of `rounds` rounds.
    pub fn of(round: u32, rounds: u32) -> Self {
        match round {
            0 => Self::Intro,
            r if r <= rounds => Self::Active(r),
            _ => Self::Finished,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intro => f.write_str("intro"),
            Self::Active(round) => write!(f, "round {round}"),
            Self::Finished => f.write_str("finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_round_counter_to_phase() {
        assert_eq!(Phase::of(0, 5), Phase::Intro);
        assert_eq!(Phase::of(1, 5), Phase::Active(1));
        assert_eq!(Phase::of(5, 5), Phase::Active(5));
        assert_eq!(Phase::of(6, 5), Phase::Finished);
    }

    #[test]
    fn displays_human_label() {
        assert_eq!(Phase::Active(3).to_string(), "round 3");
        assert_eq!(Phase::Finished.to_string(), "finished");
    }
}
