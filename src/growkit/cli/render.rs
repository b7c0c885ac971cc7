//! # Rendering
//!
//! Turns `CmdResult` payloads into terminal text. Layout (widths, truncation,
//! padding) is computed here with Unicode-aware widths; colors come from
//! `colored`, which honors `NO_COLOR` and non-terminal output.

use chrono::{DateTime, Utc};
use colored::*;
use growkit::commands::{CmdMessage, MessageLevel};
use growkit::config::GrowkitConfig;
use growkit::model::{Bed, Garden, Task, TaskStatus};
use growkit::validate::{IssueKind, ValidationIssue};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 8;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_issues(issues: &[ValidationIssue]) {
    for line in issue_lines(issues) {
        println!("{}", line);
    }
}

fn issue_lines(issues: &[ValidationIssue]) -> Vec<String> {
    issues
        .iter()
        .map(|issue| {
            let tag = format!("[{}]", issue.kind);
            let tag = match issue.kind {
                IssueKind::SpacingConflict => tag.yellow(),
                IssueKind::BedBoundary => tag.red(),
                IssueKind::TaskDate => tag.magenta(),
            };
            format!("  {} {}", tag, issue.message)
        })
        .collect()
}

pub fn print_garden(garden: &Garden) {
    print!("{}", render_garden(garden));
}

pub fn render_garden(garden: &Garden) -> String {
    let mut out = String::new();
    let created = format_time_ago(garden.created_at);
    let title = garden.name.bold().to_string();
    let padding = LINE_WIDTH.saturating_sub(garden.name.width() + TIME_WIDTH);
    out.push_str(&format!("{}{}{}\n", title, " ".repeat(padding), created.dimmed()));

    if let Some(location) = &garden.location {
        out.push_str(&format!(
            "  location {:.4}, {:.4}\n",
            location.latitude, location.longitude
        ));
    }
    match (garden.average_last_frost, garden.average_first_frost) {
        (None, None) => {}
        (last, first) => out.push_str(&format!(
            "  frost    last {} / first {}\n",
            last.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            first.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
        )),
    }

    out.push_str(&format!(
        "  {}\n\n",
        format!(
            "{} bed(s), {} planting(s), {} task(s)",
            garden.beds.len(),
            garden.planting_count(),
            garden.tasks.len()
        )
        .dimmed()
    ));
    if garden.beds.is_empty() {
        out.push_str(&format!("{}\n", "No beds yet.".dimmed()));
    }
    for bed in &garden.beds {
        out.push_str(&render_bed(bed));
    }

    if !garden.tasks.is_empty() {
        out.push_str(&format!("\n{}\n", "Tasks".bold()));
        for task in &garden.tasks {
            out.push_str(&render_task(task));
        }
    }

    if !garden.agent_comments.is_empty() {
        out.push_str(&format!("\n{}\n", "Comments".bold()));
        for comment in &garden.agent_comments {
            let line = truncate_to_width(&comment.comment, LINE_WIDTH - TIME_WIDTH - 4);
            let padding = (LINE_WIDTH - TIME_WIDTH - 4).saturating_sub(line.width());
            out.push_str(&format!(
                "  - {}{}{}\n",
                line,
                " ".repeat(padding),
                format_time_ago(comment.created_at).dimmed()
            ));
        }
    }
    out
}

fn render_bed(bed: &Bed) -> String {
    let dims = &bed.dimensions;
    let mut header = format!(
        "{} {} x {} {}",
        bed.name, dims.width, dims.length, dims.unit
    );
    if let Some(depth) = dims.depth {
        header.push_str(&format!(" x {}", depth));
    }
    if let Some(position) = bed.position {
        header.push_str(&format!(" at {}", position));
    }
    if let Some(soil) = &bed.soil_type {
        header.push_str(&format!(", {}", soil));
    }

    let mut out = format!("{}\n", header.cyan());
    for (index, planting) in bed.plantings.iter().enumerate() {
        let mut label = planting.species.clone();
        if let Some(variety) = &planting.variety {
            label.push_str(&format!(" ({})", variety));
        }
        let detail = match planting.spacing {
            Some(spacing) => format!("{} r{}", planting.position, spacing),
            None => planting.position.to_string(),
        };
        let index_str = format!("  {:>3}. ", index);
        let available = LINE_WIDTH.saturating_sub(index_str.width() + detail.width() + 1);
        let label = truncate_to_width(&label, available);
        let padding = available.saturating_sub(label.width());
        out.push_str(&format!(
            "{}{}{} {}\n",
            index_str.dimmed(),
            label,
            " ".repeat(padding),
            detail.dimmed()
        ));
    }
    out
}

fn render_task(task: &Task) -> String {
    let marker = match task.status {
        TaskStatus::Pending => "[ ]".normal(),
        TaskStatus::Completed => "[x]".green(),
        TaskStatus::Skipped => "[-]".dimmed(),
    };
    let full_id = task.id.to_string();
    let id = short_id(&full_id);
    let date = task.target_date.to_string();
    let available = LINE_WIDTH.saturating_sub(4 + ID_WIDTH + 1 + date.width() + 1);
    let title = truncate_to_width(&task.title, available);
    let padding = available.saturating_sub(title.width());
    format!(
        "  {} {} {}{} {}\n",
        marker,
        id.yellow(),
        title,
        " ".repeat(padding),
        date.dimmed()
    )
}

pub fn print_config(config: &GrowkitConfig) {
    for key in GrowkitConfig::KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn short_id(id: &str) -> &str {
    &id[..ID_WIDTH.min(id.len())]
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
