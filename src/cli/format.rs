//! Output formatting for CLI display.

use crate::model::Scenario;
use crate::scenarios::ScenarioBook;

/// One-line summary of a book: round count and whether answers start blank.
pub(super) fn format_book_header(book: &ScenarioBook) -> String {
    let draft = if book.default_draft().is_empty() {
        "blank default draft".to_string()
    } else {
        let first = book.default_draft().lines().next().unwrap_or_default();
        format!("default draft starts \"{first}\"")
    };
    format!("{} rounds, {draft}", book.rounds())
}

/// One line per round: number, title, and what the round carries.
pub(super) fn format_round_summary(scenario: &Scenario) -> String {
    let mut extras = Vec::new();
    if !scenario.metrics.is_empty() {
        extras.push(format!("{} metrics", scenario.metrics.len()));
    }
    if scenario.sample.is_some() {
        extras.push("sample code".to_string());
    }
    if !scenario.variables.is_empty() {
        let names: Vec<&str> = scenario.variables.iter().map(|v| v.name.as_str()).collect();
        extras.push(format!("vars: {}", names.join(", ")));
    }

    let title = match &scenario.icon {
        Some(icon) => format!("{icon} {}", scenario.title),
        None => scenario.title.clone(),
    };

    if extras.is_empty() {
        format!("{:>2}. {title}", scenario.round)
    } else {
        format!("{:>2}. {title}  [{}]", scenario.round, extras.join("; "))
    }
}
