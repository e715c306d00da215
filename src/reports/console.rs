//! Human-readable report for a terminal.

use crate::engine::Evaluation;
use crate::scoring::{ContributionStatus, MomentumLabel, Polarity, StatusColor};
use chrono::{DateTime, Utc};
use owo_colors::{AnsiColors, OwoColorize};
use std::io::{Result, Write};

const HISTOGRAM_GLYPHS: &[char] = &[' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Write `evaluation` as a multi-section text report.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn generate<W: Write>(evaluation: &Evaluation, writer: &mut W, use_colors: bool) -> Result<()> {
    let paint = |text: &str, color: AnsiColors| -> String {
        if use_colors {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    };

    let status = evaluation.status;
    writeln!(writer, "{}", paint(&evaluation.issue.to_string(), AnsiColors::Cyan))?;
    if let Some(title) = &evaluation.title {
        writeln!(writer, "  {title}")?;
    }
    writeln!(writer)?;
    writeln!(
        writer,
        "Status:      {}  {}",
        paint(&status.to_string(), status_color(status)),
        status.headline()
    )?;

    if let Some(claim) = evaluation.active_claim() {
        writeln!(
            writer,
            "             claimed by @{} {} ago (\"{}\")",
            claim.claimer,
            hours(claim.age_hours),
            claim.keyword
        )?;
    }

    if let Some(difficulty) = &evaluation.difficulty {
        let beginner = if difficulty.can_beginner { ", beginner friendly" } else { "" };
        writeln!(writer, "Difficulty:  {} ({}/100{beginner})", difficulty.label, difficulty.score)?;
        for signal in &difficulty.signals {
            let marker = match signal.polarity {
                Polarity::Easier => paint("-", AnsiColors::Green),
                Polarity::Harder => paint("+", AnsiColors::Red),
                Polarity::Neutral => paint("~", AnsiColors::White),
            };
            writeln!(writer, "             {marker} {} ({:+})", signal.text, signal.delta)?;
        }
    }

    if let Some(momentum) = &evaluation.momentum {
        let color = match momentum.label {
            MomentumLabel::Active => AnsiColors::Green,
            MomentumLabel::Slow => AnsiColors::Yellow,
            MomentumLabel::Stalled => AnsiColors::Red,
        };
        writeln!(
            writer,
            "Momentum:    {} ({}/100), updated {:.1} days ago, {} comments",
            paint(&momentum.label.to_string(), color),
            momentum.score,
            momentum.days_since_update,
            momentum.comment_count
        )?;
        match momentum.maintainer_response_days {
            Some(days) => writeln!(writer, "             first maintainer response after {days:.1} days")?,
            None => writeln!(writer, "             no maintainer response yet")?,
        }
    }

    section(writer, "Pull requests", evaluation.pull_requests.len())?;
    for pr in &evaluation.pull_requests {
        let draft = if pr.draft { " [draft]" } else { "" };
        writeln!(writer, "  #{} {}{draft} ({})", pr.number, pr.title, pr.provenance)?;
    }

    section(writer, "Claims", evaluation.claims.len())?;
    for claim in &evaluation.claims {
        let stale = if claim.is_stale { paint(" stale", AnsiColors::Yellow) } else { String::new() };
        writeln!(writer, "  @{} {} ago{stale}: \"{}\"", claim.claimer, hours(claim.age_hours), claim.keyword)?;
    }

    section(writer, "Fork activity", evaluation.forks.len())?;
    for fork in &evaluation.forks {
        writeln!(writer, "  @{} branch '{}' pushed {}", fork.owner_login, fork.branch, date(fork.pushed_at))?;
    }

    if !evaluation.workload.is_empty() {
        section(writer, "Assignees", evaluation.workload.len())?;
        for assignee in &evaluation.workload {
            let overloaded = if assignee.is_overloaded { paint(" overloaded", AnsiColors::Red) } else { String::new() };
            writeln!(writer, "  @{} has {} open assignments{overloaded}", assignee.login, assignee.open_assignments)?;
        }
    }

    if let Some(stats) = &evaluation.stats {
        let axes = &stats.axes;
        writeln!(writer)?;
        writeln!(writer, "Stats:")?;
        writeln!(writer, "  activity {:>3}   discussion    {:>3}   maintainer {:>3}", axes.activity, axes.discussion, axes.maintainer_response)?;
        writeln!(writer, "  progress {:>3}   simplicity    {:>3}   docs       {:>3}", axes.pr_progress, axes.simplicity, axes.documentation)?;

        let peak = stats.comment_histogram.iter().map(|b| b.count).max().unwrap_or(0);
        let line: String = stats.comment_histogram.iter().map(|b| glyph(b.count, peak)).collect();
        writeln!(writer, "  comments, last 30 days: [{line}]")?;
    }

    Ok(())
}

const fn status_color(status: ContributionStatus) -> AnsiColors {
    match status.color() {
        StatusColor::Green => AnsiColors::Green,
        StatusColor::Yellow => AnsiColors::Yellow,
        StatusColor::Red => AnsiColors::Red,
    }
}

fn section<W: Write>(writer: &mut W, name: &str, count: usize) -> Result<()> {
    writeln!(writer)?;
    if count == 0 {
        writeln!(writer, "{name}: none")
    } else {
        writeln!(writer, "{name}: {count}")
    }
}

fn glyph(count: u32, peak: u32) -> char {
    if count == 0 || peak == 0 {
        return HISTOGRAM_GLYPHS[0];
    }
    let steps = HISTOGRAM_GLYPHS.len() - 1;
    let index = (count as usize * steps).div_ceil(peak as usize).min(steps);
    HISTOGRAM_GLYPHS[index]
}

fn hours(age_hours: f64) -> String {
    if age_hours < 48.0 {
        format!("{age_hours:.0}h")
    } else {
        format!("{:.0}d", age_hours / 24.0)
    }
}

fn date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}
