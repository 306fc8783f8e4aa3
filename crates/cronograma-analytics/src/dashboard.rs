//! Dashboard metrics.
//!
//! Aggregates a normalized snapshot into the numbers the dashboard view
//! shows: global counts per effective status, completion percentage,
//! per-project rollups, the short list of critical tasks, and a coarse
//! health classification.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use cronograma_core::{project_name, EffectiveStatus, Project, ProjectId, Task, TaskId};

/// How many days ahead a due date still counts as critical
const CRITICAL_WINDOW_DAYS: i64 = 3;

/// Maximum entries in the critical list
const CRITICAL_LIST_CAP: usize = 8;

/// Late fraction at or above which the schedule is classified critical
const CRITICAL_LATE_FRACTION: f64 = 0.30;

/// Completion percentage at or above which the schedule is classified positive
const POSITIVE_PERCENT: u8 = 80;

// ============================================================================
// Types
// ============================================================================

/// Qualitative schedule-risk classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Health {
    /// Late fraction >= 30% of all tasks
    Critical,
    /// Some late tasks, below the critical fraction
    Attention,
    /// No late tasks and completion >= 80%
    Positive,
    /// On track, nothing remarkable
    Neutral,
}

impl Health {
    /// Classify by fixed thresholds, first match wins
    pub fn classify(total: usize, late: usize, percent_complete: u8) -> Self {
        if total > 0 && late as f64 / total as f64 >= CRITICAL_LATE_FRACTION {
            Health::Critical
        } else if late > 0 {
            Health::Attention
        } else if percent_complete >= POSITIVE_PERCENT {
            Health::Positive
        } else {
            Health::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Health::Critical => "critical",
            Health::Attention => "attention",
            Health::Positive => "positive",
            Health::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-project aggregate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectRollup {
    pub project_id: ProjectId,
    pub name: String,
    pub total: usize,
    pub done: usize,
    pub late: usize,
    pub pending: usize,
    pub in_progress: usize,
    /// done / total, rounded; 0 for an empty project
    pub percent_complete: u8,
    /// Earliest start over the project's valid-range tasks
    pub start: Option<NaiveDate>,
    /// Latest end over the project's valid-range tasks
    pub finish: Option<NaiveDate>,
}

/// A task needing attention right now: already late, or due within the
/// critical window
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CriticalTask {
    pub task_id: TaskId,
    pub name: String,
    pub project: String,
    pub end: NaiveDate,
    pub status: EffectiveStatus,
}

/// Everything the dashboard view needs, derived in one pass
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_tasks: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,
    pub late: usize,
    pub archived: usize,
    /// done / total, rounded; 0 when there are no tasks
    pub percent_complete: u8,
    pub projects: Vec<ProjectRollup>,
    /// Late or imminently-due tasks, ascending by end date, at most 8
    pub critical: Vec<CriticalTask>,
    pub health: Health,
}

// ============================================================================
// Computation
// ============================================================================

/// Rounded completion percentage, safe on empty input
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        (done as f64 / total as f64 * 100.0).round() as u8
    }
}

/// Compute dashboard metrics for a snapshot.
///
/// Deterministic for identical `(projects, tasks, today)`; inputs are never
/// mutated, and empty input yields zeroed structures.
pub fn compute_dashboard(projects: &[Project], tasks: &[Task], today: NaiveDate) -> DashboardMetrics {
    let mut pending = 0usize;
    let mut in_progress = 0usize;
    let mut done = 0usize;
    let mut late = 0usize;
    let mut archived = 0usize;

    for task in tasks {
        match task.effective_status(today) {
            EffectiveStatus::Pending => pending += 1,
            EffectiveStatus::InProgress => in_progress += 1,
            EffectiveStatus::Done => done += 1,
            EffectiveStatus::Late => late += 1,
            EffectiveStatus::Archived => archived += 1,
        }
    }

    let total_tasks = tasks.len();
    let percent_complete = percent(done, total_tasks);

    let rollups = projects
        .iter()
        .map(|project| project_rollup(project, tasks, today))
        .collect();

    DashboardMetrics {
        total_tasks,
        pending,
        in_progress,
        done,
        late,
        archived,
        percent_complete,
        projects: rollups,
        critical: critical_tasks(projects, tasks, today),
        health: Health::classify(total_tasks, late, percent_complete),
    }
}

fn project_rollup(project: &Project, tasks: &[Task], today: NaiveDate) -> ProjectRollup {
    let mut rollup = ProjectRollup {
        project_id: project.id.clone(),
        name: project.name.clone(),
        total: 0,
        done: 0,
        late: 0,
        pending: 0,
        in_progress: 0,
        percent_complete: 0,
        start: None,
        finish: None,
    };

    for task in tasks {
        if task.project_id.as_deref() != Some(project.id.as_str()) {
            continue;
        }
        rollup.total += 1;
        match task.effective_status(today) {
            EffectiveStatus::Pending => rollup.pending += 1,
            EffectiveStatus::InProgress => rollup.in_progress += 1,
            EffectiveStatus::Done | EffectiveStatus::Archived => rollup.done += 1,
            EffectiveStatus::Late => rollup.late += 1,
        }
        if let Some((start, end)) = task.valid_range() {
            rollup.start = Some(rollup.start.map_or(start, |s| s.min(start)));
            rollup.finish = Some(rollup.finish.map_or(end, |f| f.max(end)));
        }
    }

    rollup.percent_complete = percent(rollup.done, rollup.total);
    rollup
}

/// Tasks that are late, or open with an end date inside
/// `[today, today + 3 days]`, ascending by end date, capped to 8
fn critical_tasks(projects: &[Project], tasks: &[Task], today: NaiveDate) -> Vec<CriticalTask> {
    let horizon = today + Duration::days(CRITICAL_WINDOW_DAYS);

    let mut critical: Vec<CriticalTask> = tasks
        .iter()
        .filter_map(|task| {
            let status = task.effective_status(today);
            let end = task.end?;
            let include = match status {
                EffectiveStatus::Late => true,
                EffectiveStatus::Pending | EffectiveStatus::InProgress => {
                    end >= today && end <= horizon
                }
                EffectiveStatus::Done | EffectiveStatus::Archived => false,
            };
            include.then(|| CriticalTask {
                task_id: task.id.clone(),
                name: task.name.clone(),
                project: project_name(projects, task.project_id.as_deref()).to_string(),
                end,
                status,
            })
        })
        .collect();

    critical.sort_by_key(|c| c.end);
    critical.truncate(CRITICAL_LIST_CAP);
    critical
}

// ============================================================================
// Tests
// ============================================================================
