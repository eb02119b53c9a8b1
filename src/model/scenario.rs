//! Scenario types: the static content shown for each round.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Read-only descriptor for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Scenario {
    /// Round number, contiguous from 1 within a book.
    pub round: u32,

    pub title: String,

    /// Short decorative marker shown before the title.
    pub icon: Option<String>,

    /// One-line system status.
    pub status: String,

    #[serde(default)]
    pub metrics: Vec<Metric>,

    /// The advisory message addressed to the participant.
    pub message: String,

    /// Illustrative sample code. Never executed.
    pub sample: Option<String>,

    /// Variables that become available in this round.
    #[serde(default)]
    pub variables: Vec<Variable>,

    /// Text the input starts from when drafts don't carry over.
    pub draft: Option<String>,
}

/// A labelled status indicator, e.g. `Revenue: rising`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// A named value the participant may reference in their answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub description: String,
}
