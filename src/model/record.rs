//! Response records: what a participant submitted for a round.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// An immutable record of one submitted answer.
///
/// Created exactly once per completed round, in round order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    /// The round this answer belongs to (1-based).
    pub round: u32,

    /// The submitted free text: a prompt or a code-edit instruction.
    pub content: String,

    /// Snapshot of the sample code on screen at submission time, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// When the answer was submitted.
    pub submitted_at: Timestamp,
}
