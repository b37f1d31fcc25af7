//! Interactive review loop.
//!
//! The terminal is the input channel for the active session: raw mode is
//! entered when the loop starts and released by a guard on every exit
//! path, so no handler outlives the session. Keys are mapped to the two
//! logical inputs plus quit; everything else is dropped before it can
//! reach the engine.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal;
use tracing::info;

use termcull_core::{
    open_session, write_terms, Candidate, Decision, ExportStyle, Progress, ReviewProfile,
    ReviewSession,
};

/// Logical inputs during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReviewInput {
    Decide(Decision),
    Quit,
}

/// Map a key event to a review input. Unrecognized keys map to `None`
/// and are ignored by the loop.
fn map_key(key: KeyEvent) -> Option<ReviewInput> {
    // Only key presses count; release/repeat events would double-apply
    // a single keystroke on some platforms.
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(ReviewInput::Decide(Decision::Accept)),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(ReviewInput::Decide(Decision::Reject)),
        KeyCode::Char('q') | KeyCode::Esc => Some(ReviewInput::Quit),
        _ => None,
    }
}

/// Holds the terminal in raw mode; releases it on drop, unconditionally.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

pub fn cmd_review(
    report_path: &Path,
    profile: ReviewProfile,
    out: Option<PathBuf>,
    plain: bool,
) -> Result<ExitCode> {
    let thresholds = profile.thresholds;
    if thresholds.min_spend <= 0.0 || thresholds.min_cost_per_conversion <= 0.0 {
        bail!("review needs positive thresholds; pass --min-spend and --min-cpc, or a profile that sets them");
    }

    let text = fs::read_to_string(report_path)
        .with_context(|| format!("failed to read report {}", report_path.display()))?;
    let mut setup = open_session(&text, &profile)?;

    let style = if plain {
        ExportStyle::Plain
    } else {
        profile.export.style
    };
    let out_path = out.unwrap_or_else(|| profile.export.path.clone());

    println!(
        "{} terms to review ({} rows filtered out)",
        setup.session.candidates().len(),
        setup.skipped.len()
    );
    if setup.session.is_complete() {
        println!("No terms cleared the thresholds; nothing to review.");
        return Ok(ExitCode::SUCCESS);
    }

    let original = setup.session.candidates().to_vec();
    loop {
        let aborted = drive(&mut setup.session)?;
        if aborted {
            println!("Review aborted; nothing written.");
            return Ok(ExitCode::SUCCESS);
        }

        print_completion(&setup.session);
        write_terms(&out_path, setup.session.accepted(), style)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        println!(
            "Wrote {} negative keywords to {}",
            setup.session.accepted().len(),
            out_path.display()
        );
        info!(
            accepted = setup.session.accepted().len(),
            out = %out_path.display(),
            "export written"
        );

        if !offer_restart()? {
            return Ok(ExitCode::SUCCESS);
        }
        setup.session.reset(original.clone());
    }
}

/// Run the session until complete or aborted. Returns true on abort.
fn drive(session: &mut ReviewSession) -> Result<bool> {
    let mut stdout = io::stdout();
    let _guard = RawModeGuard::enter()?;

    while let Some(candidate) = session.current().cloned() {
        render_card(&mut stdout, &candidate, session.progress())?;
        match next_input()? {
            ReviewInput::Decide(decision) => {
                session.decide(decision);
            }
            ReviewInput::Quit => return Ok(true),
        }
    }

    Ok(false)
}

/// Block until a key maps to a review input.
fn next_input() -> Result<ReviewInput> {
    loop {
        if let Event::Key(key) = event::read().context("failed to read terminal event")? {
            if let Some(input) = map_key(key) {
                return Ok(input);
            }
        }
    }
}

// Raw mode needs explicit carriage returns.
fn render_card(out: &mut impl Write, candidate: &Candidate, progress: Progress) -> Result<()> {
    write!(
        out,
        "\r\n[{}/{}  {:.0}%]  {}\r\n",
        progress.reviewed + 1,
        progress.total,
        progress.percent(),
        candidate.term
    )?;
    write!(
        out,
        "  spend ${:.2}   impressions {}   clicks {}   cost/conv {}\r\n",
        candidate.spend, candidate.impressions, candidate.clicks, candidate.cost_per_conversion
    )?;
    write!(out, "  [y] add as negative   [n] skip   [q] quit\r\n")?;
    out.flush()?;
    Ok(())
}

fn print_completion(session: &ReviewSession) {
    let summary = session.summary();
    println!();
    println!(
        "Review complete: {} of {} terms marked negative.",
        summary.accepted, summary.total
    );
    for candidate in session.accepted() {
        println!("  {}", candidate.term);
    }
}

/// After an export, offer one more pass over the same terms.
fn offer_restart() -> Result<bool> {
    println!("Press r to review the same terms again, any other key to exit.");
    let _guard = RawModeGuard::enter()?;
    loop {
        if let Event::Key(key) = event::read().context("failed to read terminal event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            return Ok(matches!(
                key.code,
                KeyCode::Char('r') | KeyCode::Char('R')
            ));
        }
    }
}
