//! Line-oriented terminal front-end.
//!
//! Reads participant input, turns it into controller [`Action`]s, and prints
//! the screen for the resulting phase. Holds no session state of its own.

mod render;

use std::{
    io::{self, BufRead, Write},
    thread,
    time::Duration,
};

use crate::controller::{Action, Controller, ControllerError, Outcome, ValidationError};
use crate::model::Phase;

/// What one read from the input amounts to.
enum Input {
    /// A finished answer: `None` keeps the draft as it is.
    Answer(Option<String>),
    Clear,
    Reset,
    Quit,
}

/// Runs the questionnaire until the participant quits or input ends.
pub fn run<R: BufRead, W: Write>(
    controller: &mut Controller<'_>,
    mut input: R,
    mut out: W,
    pacing: Duration,
) -> io::Result<()> {
    loop {
        match controller.phase() {
            Phase::Intro => {
                write!(out, "{}", render::intro(controller.session().rounds()))?;
                out.flush()?;
                let Some(line) = read_line(&mut input)? else {
                    return Ok(());
                };
                match line.trim() {
                    "q" | "quit" | ":quit" => return Ok(()),
                    _ => {
                        apply(controller, Action::ConfirmStart, &mut out)?;
                    }
                }
            }
            Phase::Active(_) => {
                let scenario = match controller.current_scenario() {
                    Ok(s) => s,
                    Err(e) => {
                        // Only reachable with an inconsistent book.
                        writeln!(out, "! {e}")?;
                        apply(controller, Action::Reset, &mut out)?;
                        continue;
                    }
                };
                write!(
                    out,
                    "{}",
                    render::round(
                        scenario,
                        controller.session().rounds(),
                        controller.session().draft()
                    )
                )?;
                out.flush()?;

                match read_answer(&mut input)? {
                    None | Some(Input::Quit) => return Ok(()),
                    Some(Input::Reset) => {
                        apply(controller, Action::Reset, &mut out)?;
                    }
                    Some(Input::Clear) => {
                        apply(controller, Action::Edit(String::new()), &mut out)?;
                    }
                    Some(Input::Answer(text)) => {
                        if let Some(text) = text {
                            apply(controller, Action::Edit(text), &mut out)?;
                        }
                        let recorded = apply(controller, Action::Submit, &mut out)?;
                        if recorded && !pacing.is_zero() {
                            writeln!(out, "Running the simulation...")?;
                            out.flush()?;
                            thread::sleep(pacing);
                        }
                    }
                }
            }
            Phase::Finished => {
                write!(out, "{}", render::finished(controller.session()))?;
                out.flush()?;
                let Some(line) = read_line(&mut input)? else {
                    return Ok(());
                };
                let action = match line.trim() {
                    "e" | "export" => Action::Export,
                    "r" | "reset" => Action::Reset,
                    "l" | "log" => {
                        write!(out, "{}", render::log(controller.session())?)?;
                        continue;
                    }
                    "q" | "quit" => return Ok(()),
                    other => {
                        writeln!(out, "Unknown choice '{other}'.")?;
                        continue;
                    }
                };
                apply(controller, action, &mut out)?;
            }
        }
    }
}

/// Apply an action and print its outcome. Returns whether it was accepted.
///
/// Controller errors are shown to the participant and never end the session.
fn apply<W: Write>(
    controller: &mut Controller<'_>,
    action: Action,
    out: &mut W,
) -> io::Result<bool> {
    match controller.handle(action) {
        Ok(Outcome::Exported(report)) => {
            write!(out, "{}", render::report(&report))?;
            Ok(true)
        }
        Ok(Outcome::Recorded { round, next }) => {
            writeln!(out, "Round {round} recorded. Next: {next}.")?;
            Ok(true)
        }
        Ok(Outcome::Reset) => {
            writeln!(out, "Starting over.")?;
            Ok(true)
        }
        Ok(Outcome::Started | Outcome::DraftUpdated) => Ok(true),
        Err(ControllerError::Validation(ValidationError::EmptyResponse)) => {
            writeln!(out, "! empty response: write something before submitting.")?;
            Ok(false)
        }
        Err(e) => {
            writeln!(out, "! {e}")?;
            Ok(false)
        }
    }
}

/// Read one line without its terminator. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Collect answer lines up to a lone `.`, or a command on a line of its own.
fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<Input>> {
    let mut lines: Vec<String> = Vec::new();
    while let Some(line) = read_line(input)? {
        match line.trim() {
            "." if lines.is_empty() => return Ok(Some(Input::Answer(None))),
            "." => return Ok(Some(Input::Answer(Some(lines.join("\n"))))),
            ":clear" => return Ok(Some(Input::Clear)),
            ":reset" => return Ok(Some(Input::Reset)),
            ":quit" => return Ok(Some(Input::Quit)),
            _ => lines.push(line),
        }
    }
    Ok(None)
}
