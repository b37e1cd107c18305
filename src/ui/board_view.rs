//! Terminal rendering of the board.
//!
//! Columns are printed top to bottom in registry order, each with its count
//! badge and its cards in collection order. Rendering is a pure function of
//! the `BoardView`; callers decide where the string goes.

use console::style;

use crate::board::models::{BoardView, ColumnView, JobApplication, Stage};
use crate::ui::icons::{CALENDAR, LOCATION, NOTE, SALARY};

const MIN_WIDTH: usize = 40;
const DEFAULT_WIDTH: usize = 80;

/// Width of the attached terminal, or a sane default when not a tty.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
        .max(MIN_WIDTH)
}

/// Truncate a string to a maximum length.
pub(crate) fn truncate_str(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn stage_style(stage: Stage, text: &str) -> String {
    let styled = style(text).bold();
    match stage {
        Stage::Applied => styled.white(),
        Stage::Screening => styled.blue(),
        Stage::Interview => styled.yellow(),
        Stage::Offer => styled.green(),
        Stage::Rejected => styled.red(),
    }
    .to_string()
}

/// One card: company and id, then position and the optional detail lines.
pub fn render_card(job: &JobApplication, width: usize) -> Vec<String> {
    let inner = width.saturating_sub(6);
    let mut lines = vec![
        format!(
            "  ┌ {} {}",
            style(truncate_str(&job.company_name, inner)).bold(),
            style(format!("[{}]", job.id)).dim()
        ),
        format!("  │ {}", truncate_str(&job.position_title, inner)),
    ];
    if !job.location.is_empty() {
        lines.push(format!(
            "  │ {}{}",
            LOCATION,
            style(truncate_str(&job.location, inner)).dim()
        ));
    }
    if !job.salary_range.is_empty() {
        lines.push(format!(
            "  │ {}{}",
            SALARY,
            style(truncate_str(&job.salary_range, inner)).dim()
        ));
    }
    lines.push(format!(
        "  │ {}{}",
        CALENDAR,
        style(job.application_date.format("%Y-%m-%d")).dim()
    ));
    if !job.notes.is_empty() {
        // Notes are clamped to their first line.
        let first_line = job.notes.lines().next().unwrap_or_default();
        lines.push(format!(
            "  └ {}{}",
            NOTE,
            style(truncate_str(first_line, inner)).italic()
        ));
    } else {
        lines.push("  └".to_string());
    }
    lines
}

pub fn render_column(column: &ColumnView, width: usize) -> String {
    let mut out = Vec::new();
    let header = format!("{} ({})", column.title, column.count);
    out.push(stage_style(column.stage, &header));
    out.push(style("─".repeat(width.min(header.chars().count() + 8))).dim().to_string());

    if column.jobs.is_empty() {
        out.push(format!("  {}", style("No applications").dim()));
    } else {
        for job in &column.jobs {
            out.extend(render_card(job, width));
        }
    }
    out.join("\n")
}

pub fn render_board(view: &BoardView, width: usize) -> String {
    let mut sections = vec![format!(
        "{} {}",
        style("Job Application Tracker").bold().underlined(),
        style(format!("({} total)", view.total)).dim()
    )];
    sections.extend(view.columns.iter().map(|c| render_column(c, width)));
    sections.join("\n\n")
}
