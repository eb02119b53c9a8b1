//! Plain-text screens for each phase.

use crate::export::ExportReport;
use crate::model::Scenario;
use crate::session::Session;

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Orientation shown before round 1.
pub fn intro(rounds: u32) -> String {
    format!(
        "{RULE}\n\
         Dispatch simulator\n\
         {RULE}\n\
         You will work through {rounds} rounds. Each round describes a situation\n\
         in a delivery dispatch service. Write or revise your answer to fit it.\n\
         Nothing you write is executed; your answers are recorded for research.\n\n\
         Press Enter to begin, or type 'quit' to leave.\n"
    )
}

/// One active round: status, metrics, advisory message, sample, and draft.
pub fn round(scenario: &Scenario, rounds: u32, draft: &str) -> String {
    let heading = match &scenario.icon {
        Some(icon) => format!("{icon} {}", scenario.title),
        None => scenario.title.clone(),
    };
    let mut out = format!("{RULE}\n{heading}\nRound {}/{rounds}\n{RULE}\n", scenario.round);

    if !scenario.metrics.is_empty() {
        let metrics: Vec<String> = scenario.metrics.iter().map(ToString::to_string).collect();
        out.push_str(&metrics.join("  |  "));
        out.push('\n');
    }
    out.push_str(&format!(
        "[System status] {}\n\nAdvisor: {}\n",
        scenario.status, scenario.message
    ));

    if let Some(sample) = &scenario.sample {
        out.push_str(&format!("\nCurrent code:\n{}\n", indent(sample.trim_end())));
    }
    if !scenario.variables.is_empty() {
        out.push_str("\nNewly available:\n");
        for v in &scenario.variables {
            out.push_str(&format!("  {}  {}\n", v.name, v.description));
        }
    }

    out.push_str("\nYour draft:\n");
    if draft.trim().is_empty() {
        out.push_str("  (empty)\n");
    } else {
        out.push_str(&indent(draft.trim_end()));
        out.push('\n');
    }
    out.push_str(
        "\nType a new answer and finish with a line containing only '.'.\n\
         A lone '.' submits the draft as shown. Commands: :clear  :reset  :quit\n",
    );
    out
}

/// The terminal screen: a recap of every answer and the remaining actions.
pub fn finished(session: &Session) -> String {
    let mut out = format!("{RULE}\nAll rounds complete. Thank you!\n{RULE}\n");
    for record in session.records() {
        let first_line = record.content.lines().next().unwrap_or_default();
        out.push_str(&format!("  {}. {first_line}\n", record.round));
    }
    out.push_str("\n[e]xport  [l]og  [r]eset  [q]uit\n");
    out
}

/// The full response log as pretty JSON, for the researcher running the session.
pub fn log(session: &Session) -> serde_json::Result<String> {
    let json = serde_json::to_string_pretty(session.records())?;
    Ok(format!("{RULE}\nResponse log\n{RULE}\n{json}\n"))
}

pub fn report(report: &ExportReport) -> String {
    if report.success {
        format!("Saved: {}\n", report.diagnostic)
    } else {
        format!(
            "Export failed: {}\nYour answers are still here; try again any time.\n",
            report.diagnostic
        )
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("  {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}
