//! Participant identifier resolution.
//!
//! A session's participant identifier is assigned once, when the session is
//! created. It is resolved through a chain:
//!
//! 1. `--as <id>` — explicit per-run label (e.g. a pre-assigned study code)
//! 2. `DISPATCH_SIM_PARTICIPANT` env var — set once by the researcher's shell
//! 3. a fresh random UUID
//!
//! The identifier is opaque: it is only ever copied into the exported row.

use std::env;

use uuid::Uuid;

/// Environment variable consulted when no explicit identifier is given.
pub const PARTICIPANT_ENV: &str = "DISPATCH_SIM_PARTICIPANT";

/// Resolve the participant identifier from the resolution chain.
pub fn resolve_participant(explicit: Option<&str>) -> String {
    resolve_with(explicit, env::var(PARTICIPANT_ENV).ok())
}

fn resolve_with(explicit: Option<&str>, from_env: Option<String>) -> String {
    // 1. Explicit --as flag.
    if let Some(id) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return id.to_string();
    }

    // 2. DISPATCH_SIM_PARTICIPANT.
    if let Some(id) = from_env.filter(|s| !s.trim().is_empty()) {
        return id.trim().to_string();
    }

    // 3. Generated.
    Uuid::new_v4().to_string()
}
