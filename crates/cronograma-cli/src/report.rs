//! Text rendering for the CLI reports.
//!
//! Plain, pipe-friendly output: fixed section headers, one record per line,
//! dates in ISO form. JSON output bypasses this module entirely and
//! serializes the analytics structs as-is.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use cronograma_analytics::{DashboardMetrics, ExecutiveSummary, LoadLevel, RiskSeverity};
use cronograma_core::{Snapshot, Task, TaskId};

const BAR_WIDTH: usize = 30;

/// ASCII progress bar, `width` characters wide
fn progress_bar(percent: u8, width: usize) -> String {
    let filled = usize::from(percent).min(100) * width / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "          ".to_string(), |d| d.to_string())
}

pub fn render_dashboard(metrics: &DashboardMetrics, today: NaiveDate) -> String {
    let mut out = String::new();

    out.push_str(&format!("Cronograma Dashboard — {today}\n"));
    out.push_str("==============================\n\n");

    out.push_str(&format!(
        "Progress: {} {}%  ({}/{} done)\n",
        progress_bar(metrics.percent_complete, BAR_WIDTH),
        metrics.percent_complete,
        metrics.done,
        metrics.total_tasks
    ));
    out.push_str(&format!(
        "Health:   {}\n\n",
        metrics.health.as_str().to_uppercase()
    ));

    out.push_str(&format!(
        "Tasks: {} total | {} pending | {} in progress | {} done | {} late\n",
        metrics.total_tasks, metrics.pending, metrics.in_progress, metrics.done, metrics.late
    ));

    if !metrics.projects.is_empty() {
        out.push_str("\nProjects:\n");
        for p in &metrics.projects {
            out.push_str(&format!(
                "  {:3}% ({}/{})  {} → {}  {} late  {}\n",
                p.percent_complete,
                p.done,
                p.total,
                fmt_date(p.start),
                fmt_date(p.finish),
                p.late,
                p.name
            ));
        }
    }

    if !metrics.critical.is_empty() {
        out.push_str("\nCritical tasks:\n");
        for c in &metrics.critical {
            out.push_str(&format!(
                "  {}  [{}]  {} ({})\n",
                c.end, c.status, c.name, c.project
            ));
        }
    }

    out
}

pub fn render_summary(summary: &ExecutiveSummary, today: NaiveDate) -> String {
    let mut out = String::new();

    out.push_str(&format!("Executive Summary — {today}\n"));
    out.push_str("==============================\n\n");

    out.push_str(&summary.headline);
    out.push_str("\n\n");
    out.push_str(&summary.narrative);
    out.push('\n');

    if !summary.late.is_empty() {
        out.push_str("\nLate tasks:\n");
        for t in &summary.late {
            out.push_str(&format!(
                "  {}  {} ({}) — {} days late\n",
                t.end, t.name, t.project, t.days_late
            ));
        }
    }

    if !summary.in_progress.is_empty() {
        out.push_str("\nIn progress:\n");
        for t in &summary.in_progress {
            out.push_str(&format!(
                "  {}  {} ({})\n",
                fmt_date(t.end),
                t.name,
                t.project
            ));
        }
    }

    if !summary.critical_path.is_empty() {
        out.push_str("\nCritical path (heuristic):\n");
        for t in &summary.critical_path {
            out.push_str(&format!(
                "  {}  {} ({})\n",
                fmt_date(t.end),
                t.name,
                t.project
            ));
        }
    }

    out.push_str("\nCompletion:\n");
    out.push_str(&format!("  {}\n", summary.projection.narrative));

    out.push_str("\nCompleted per week:\n");
    for w in &summary.weekly_done {
        out.push_str(&format!(
            "  {}  {} {}\n",
            w.week_start,
            progress_bar(w.percent, 10),
            w.count
        ));
    }

    out.push_str("\nUpcoming load:\n");
    for w in &summary.upcoming_load {
        out.push_str(&format!(
            "  {}  {:2} deadlines  [{}]\n",
            w.week_start,
            w.load,
            match w.level {
                LoadLevel::Ok => "ok",
                LoadLevel::Attention => "attention",
                LoadLevel::Critical => "critical",
            }
        ));
    }

    out.push_str("\nRisks:\n");
    for r in &summary.risks {
        let severity = match r.severity {
            RiskSeverity::Medium => "medium",
            RiskSeverity::High => "HIGH",
        };
        out.push_str(&format!("  [{severity:6}] {} — {}\n", r.category.label(), r.note));
    }

    if !summary.alerts.is_empty() {
        out.push_str("\nAlerts:\n");
        for alert in &summary.alerts {
            out.push_str(&format!("  - {alert}\n"));
        }
    }

    out
}

pub fn render_calendar(
    days: &BTreeMap<NaiveDate, Vec<TaskId>>,
    tasks: &[Task],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> String {
    fn name_of<'a>(tasks: &'a [Task], id: &'a str) -> &'a str {
        tasks
            .iter()
            .find(|t| t.id == id)
            .map_or(id, |t| t.name.as_str())
    }

    let mut out = String::new();
    for (day, ids) in days {
        if from.is_some_and(|f| *day < f) || to.is_some_and(|t| *day > t) {
            continue;
        }
        out.push_str(&format!("{day}\n"));
        for id in ids {
            out.push_str(&format!("  {}\n", name_of(tasks, id)));
        }
    }

    if out.is_empty() {
        out.push_str("No scheduled days.\n");
    }
    out
}

pub fn render_check(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Snapshot: {} projects, {} tasks\n",
        snapshot.projects.len(),
        snapshot.tasks.len()
    ));

    if snapshot.warnings.is_empty() {
        out.push_str("OK: no data-quality warnings\n");
    } else {
        out.push_str(&format!("{} warnings:\n", snapshot.warnings.len()));
        for warning in &snapshot.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    out
}

// ============================================================================
// Tests
// ============================================================================
