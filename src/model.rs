//! Core data model for the simulator.
//!
//! These types carry the questionnaire's shape: static scenarios keyed by
//! round, the response records collected from a participant, and the phase
//! a session is in.

mod phase;
mod record;
mod scenario;

pub use phase::Phase;
pub use record::ResponseRecord;
pub use scenario::Scenario;
