//! Executive summary synthesis.
//!
//! Turns a normalized snapshot into the narrative view a coordinator reads
//! on Monday morning: who is late, what is running, which tasks threaten
//! the completion date, how the coming weeks look, and a headline sentence
//! with a supporting paragraph.
//!
//! The critical-path list is a heuristic (keywords + deadlines + long
//! durations), not a dependency-graph critical path: snapshot tasks carry
//! no dependency edges.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use cronograma_core::{project_name, EffectiveStatus, Project, Task, TaskId};

use crate::week::{in_week, week_start};

// ============================================================================
// Tuning Constants
// ============================================================================

const LATE_LIST_CAP: usize = 5;
const ONGOING_LIST_CAP: usize = 6;
const CRITICAL_PATH_CAP: usize = 5;
const ALERT_TOP_TASKS: usize = 3;

/// Weeks shown by the done-per-week sparkline (ending with the current week)
const SPARKLINE_WEEKS: i64 = 8;

/// Weeks shown by the upcoming-load heatmap (starting with the current week)
const HEATMAP_WEEKS: i64 = 8;

/// End date within this many days marks a task as critical-path material
const DUE_SOON_DAYS: i64 = 10;

/// Duration at or above this many calendar days marks a task as
/// critical-path material
const LONG_DURATION_DAYS: i64 = 7;

/// Weekly end-count thresholds for the heatmap classification
const HEAT_ATTENTION_LOAD: usize = 4;
const HEAT_CRITICAL_LOAD: usize = 8;

/// Matching final-report tasks at or above this count escalates the
/// report-overload risk
const REPORT_OVERLOAD_COUNT: usize = 3;

/// Late fraction above which the narrative calls the schedule at risk
const AT_RISK_FRACTION: f64 = 0.20;

/// Completion percentage at or above which a zero-late schedule is healthy
const HEALTHY_PERCENT: u8 = 60;

// Keyword sets are matched as case-insensitive substrings over the
// concatenated task name + description. The vocabulary mirrors what the
// consultancy's snapshots actually contain, Portuguese first.

const DELIVERY_KEYWORDS: &[&str] = &[
    "entrega", "entregar", "relatório", "relatorio", "report", "laudo", "parecer", "protocolo",
];

const FIELD_KEYWORDS: &[&str] = &["campo", "coleta", "amostragem", "field", "sampling"];

const ANALYSIS_KEYWORDS: &[&str] = &[
    "análise", "analise", "laboratório", "laboratorio", "ensaio", "analysis",
];

const EXTERNAL_KEYWORDS: &[&str] = &[
    "órgão", "orgao", "licença", "licenca", "anuência", "anuencia", "aprovação", "aprovacao",
    "cliente", "fornecedor",
];

const FINAL_REPORT_KEYWORDS: &[&str] = &["relatório final", "relatorio final", "final report"];

// ============================================================================
// Types
// ============================================================================

/// A late task with its delay
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LateTask {
    pub task_id: TaskId,
    pub name: String,
    pub project: String,
    pub end: NaiveDate,
    pub days_late: i64,
}

/// An in-progress task
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OngoingTask {
    pub task_id: TaskId,
    pub name: String,
    pub project: String,
    pub end: Option<NaiveDate>,
}

/// Why a task landed on the critical-path list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriticalTrigger {
    /// Name/description mentions a delivery-related keyword
    DeliveryKeyword,
    /// End date within the next 10 days
    DueSoon,
    /// Duration of 7 calendar days or more
    LongDuration,
}

/// A task the completion date most likely hinges on (heuristic)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CriticalPathTask {
    pub task_id: TaskId,
    pub name: String,
    pub project: String,
    pub end: Option<NaiveDate>,
    pub trigger: CriticalTrigger,
}

/// Planned vs. projected completion under the simple slippage assumption
/// (max observed delay carries to the end of the plan)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionProjection {
    pub planned: Option<NaiveDate>,
    pub projected: Option<NaiveDate>,
    pub slippage_days: i64,
    pub narrative: String,
}

/// One sparkline bucket: completed task-ends in a past week
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekLoad {
    pub week_start: NaiveDate,
    pub count: usize,
    /// Count normalized 0-100 against the busiest week
    pub percent: u8,
}

/// Upcoming-load classification for one week
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadLevel {
    /// Fewer than 4 task ends
    Ok,
    /// 4 to 7 task ends
    Attention,
    /// 8 or more task ends
    Critical,
}

impl LoadLevel {
    pub fn classify(load: usize) -> Self {
        if load >= HEAT_CRITICAL_LOAD {
            LoadLevel::Critical
        } else if load >= HEAT_ATTENTION_LOAD {
            LoadLevel::Attention
        } else {
            LoadLevel::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadLevel::Ok => "ok",
            LoadLevel::Attention => "attention",
            LoadLevel::Critical => "critical",
        }
    }
}

/// One heatmap bucket: task-ends due in an upcoming week
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapWeek {
    pub week_start: NaiveDate,
    pub load: usize,
    pub level: LoadLevel,
}

/// Fixed risk categories tracked for every snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    /// Weather/logistics risk on field work
    FieldLogistics,
    /// Laboratory/analysis queue risk
    AnalysisBottleneck,
    /// Waiting on agencies, clients, or suppliers
    ExternalDependency,
    /// Intermediate deliveries already slipping
    DeliverySlippage,
    /// Too many final reports converging
    ReportOverload,
}

impl RiskCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::FieldLogistics => "field work logistics",
            RiskCategory::AnalysisBottleneck => "analysis bottleneck",
            RiskCategory::ExternalDependency => "external dependency",
            RiskCategory::DeliverySlippage => "delivery slippage",
            RiskCategory::ReportOverload => "final report overload",
        }
    }
}

/// Risk severity: every category starts at medium and may be escalated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskSeverity {
    Medium,
    High,
}

/// A risk category with its evaluated severity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskFlag {
    pub category: RiskCategory,
    pub severity: RiskSeverity,
    pub note: String,
}

/// The assembled executive summary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub headline: String,
    pub narrative: String,
    /// Top 5 late tasks, most overdue (earliest end) first
    pub late: Vec<LateTask>,
    /// Up to 6 in-progress tasks, nearest end first
    pub in_progress: Vec<OngoingTask>,
    /// Heuristic critical-path list, at most 5
    pub critical_path: Vec<CriticalPathTask>,
    pub projection: CompletionProjection,
    /// 8 past weeks of completed work, oldest first
    pub weekly_done: Vec<WeekLoad>,
    /// 8 upcoming weeks of due-date load, current week first
    pub upcoming_load: Vec<HeatmapWeek>,
    pub risks: Vec<RiskFlag>,
    /// Short advisory strings, highest urgency first
    pub alerts: Vec<String>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Lowercased name + description for keyword matching
fn search_text(task: &Task) -> String {
    format!("{} {}", task.name, task.description).to_lowercase()
}

fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Sort key placing endless tasks after every dated one
fn end_or_max(end: Option<NaiveDate>) -> NaiveDate {
    end.unwrap_or(NaiveDate::MAX)
}

// ============================================================================
// Computation
// ============================================================================

/// Build the executive summary for a snapshot.
///
/// Pure and deterministic: same `(projects, tasks, today)`, same output.
pub fn build_executive_summary(
    projects: &[Project],
    tasks: &[Task],
    today: NaiveDate,
) -> ExecutiveSummary {
    let late = late_tasks(projects, tasks, today);
    let late_total = tasks
        .iter()
        .filter(|t| t.effective_status(today) == EffectiveStatus::Late)
        .count();
    let done_total = tasks
        .iter()
        .filter(|t| t.effective_status(today) == EffectiveStatus::Done)
        .count();
    let percent_complete = if tasks.is_empty() {
        0
    } else {
        (done_total as f64 / tasks.len() as f64 * 100.0).round() as u8
    };

    let critical_path = critical_path_tasks(projects, tasks, today);
    let upcoming_load = upcoming_load(tasks, today);

    let alerts = alerts(tasks, late_total, &upcoming_load, &critical_path);
    let headline = headline(tasks.len(), late_total, percent_complete);
    let narrative = narrative(
        tasks.len(),
        late_total,
        done_total,
        percent_complete,
        today,
    );

    ExecutiveSummary {
        headline,
        narrative,
        late,
        in_progress: ongoing_tasks(projects, tasks, today),
        critical_path,
        projection: completion_projection(tasks, today),
        weekly_done: weekly_done(tasks, today),
        upcoming_load,
        risks: risk_flags(tasks, today),
        alerts,
    }
}

/// Top late tasks, ascending by original end date
fn late_tasks(projects: &[Project], tasks: &[Task], today: NaiveDate) -> Vec<LateTask> {
    let mut late: Vec<LateTask> = tasks
        .iter()
        .filter(|t| t.effective_status(today) == EffectiveStatus::Late)
        .filter_map(|t| {
            let end = t.end?;
            Some(LateTask {
                task_id: t.id.clone(),
                name: t.name.clone(),
                project: project_name(projects, t.project_id.as_deref()).to_string(),
                end,
                days_late: (today - end).num_days(),
            })
        })
        .collect();

    late.sort_by_key(|t| t.end);
    late.truncate(LATE_LIST_CAP);
    late
}

/// In-progress tasks, nearest end date first
fn ongoing_tasks(projects: &[Project], tasks: &[Task], today: NaiveDate) -> Vec<OngoingTask> {
    let mut ongoing: Vec<OngoingTask> = tasks
        .iter()
        .filter(|t| t.effective_status(today) == EffectiveStatus::InProgress)
        .map(|t| OngoingTask {
            task_id: t.id.clone(),
            name: t.name.clone(),
            project: project_name(projects, t.project_id.as_deref()).to_string(),
            end: t.end,
        })
        .collect();

    ongoing.sort_by_key(|t| end_or_max(t.end));
    ongoing.truncate(ONGOING_LIST_CAP);
    ongoing
}

/// Which trigger, if any, puts an open task on the critical-path list
fn critical_trigger(task: &Task, today: NaiveDate) -> Option<CriticalTrigger> {
    if matches_any(&search_text(task), DELIVERY_KEYWORDS) {
        return Some(CriticalTrigger::DeliveryKeyword);
    }
    if task
        .end
        .is_some_and(|end| end >= today && end <= today + Duration::days(DUE_SOON_DAYS))
    {
        return Some(CriticalTrigger::DueSoon);
    }
    if task
        .duration_days()
        .is_some_and(|d| d >= LONG_DURATION_DAYS)
    {
        return Some(CriticalTrigger::LongDuration);
    }
    None
}

fn critical_path_tasks(
    projects: &[Project],
    tasks: &[Task],
    today: NaiveDate,
) -> Vec<CriticalPathTask> {
    let mut candidates: Vec<CriticalPathTask> = tasks
        .iter()
        .filter(|t| t.status.is_open())
        .filter_map(|t| {
            critical_trigger(t, today).map(|trigger| CriticalPathTask {
                task_id: t.id.clone(),
                name: t.name.clone(),
                project: project_name(projects, t.project_id.as_deref()).to_string(),
                end: t.end,
                trigger,
            })
        })
        .collect();

    candidates.sort_by_key(|t| end_or_max(t.end));
    candidates.truncate(CRITICAL_PATH_CAP);
    candidates
}

/// Projected completion: the latest planned end, pushed out by the worst
/// observed delay
fn completion_projection(tasks: &[Task], today: NaiveDate) -> CompletionProjection {
    let planned = tasks.iter().filter_map(|t| t.end).max();

    let slippage_days = tasks
        .iter()
        .filter(|t| t.effective_status(today) == EffectiveStatus::Late)
        .filter_map(|t| t.days_past_end(today))
        .max()
        .unwrap_or(0);

    let projected = planned.map(|p| p + Duration::days(slippage_days));

    let narrative = match (planned, slippage_days) {
        (None, _) => "No dated tasks to project a completion date from.".to_string(),
        (Some(planned), 0) => {
            format!("On current data the plan completes on schedule, on {planned}.")
        }
        (Some(planned), days) => format!(
            "Planned completion was {planned}; carrying the current {days}-day slippage, \
             projected completion moves to {}.",
            planned + Duration::days(days)
        ),
    };

    CompletionProjection {
        planned,
        projected,
        slippage_days,
        narrative,
    }
}

/// Completed task-ends per week for the 8 weeks ending with the current
/// one, normalized against the busiest week.
///
/// Counts only tasks whose effective status is done. The legacy dashboard
/// this replaces had a negation-precedence slip here that made the
/// completion filter a no-op; the filter is intentional now.
fn weekly_done(tasks: &[Task], today: NaiveDate) -> Vec<WeekLoad> {
    let current = week_start(today);

    let counts: Vec<(NaiveDate, usize)> = (0..SPARKLINE_WEEKS)
        .rev()
        .map(|weeks_ago| {
            let start = current - Duration::weeks(weeks_ago);
            let count = tasks
                .iter()
                .filter(|t| t.effective_status(today) == EffectiveStatus::Done)
                .filter(|t| t.end.is_some_and(|end| in_week(end, start)))
                .count();
            (start, count)
        })
        .collect();

    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);

    counts
        .into_iter()
        .map(|(start, count)| WeekLoad {
            week_start: start,
            count,
            percent: (count * 100 / max) as u8,
        })
        .collect()
}

/// Due-date load for the 8 weeks starting with the current one
fn upcoming_load(tasks: &[Task], today: NaiveDate) -> Vec<HeatmapWeek> {
    let current = week_start(today);

    (0..HEATMAP_WEEKS)
        .map(|weeks_ahead| {
            let start = current + Duration::weeks(weeks_ahead);
            let load = tasks
                .iter()
                .filter(|t| t.end.is_some_and(|end| in_week(end, start)))
                .count();
            HeatmapWeek {
                week_start: start,
                load,
                level: LoadLevel::classify(load),
            }
        })
        .collect()
}

/// Evaluate the five fixed risk categories against the task corpus
fn risk_flags(tasks: &[Task], today: NaiveDate) -> Vec<RiskFlag> {
    let open: Vec<&Task> = tasks.iter().filter(|t| t.status.is_open()).collect();

    let field_hits = open
        .iter()
        .filter(|t| matches_any(&search_text(t), FIELD_KEYWORDS))
        .count();
    let analysis_hits = open
        .iter()
        .filter(|t| matches_any(&search_text(t), ANALYSIS_KEYWORDS))
        .count();
    let external_hits = open
        .iter()
        .filter(|t| matches_any(&search_text(t), EXTERNAL_KEYWORDS))
        .count();
    let slipping_deliveries = tasks
        .iter()
        .filter(|t| t.effective_status(today) == EffectiveStatus::Late)
        .filter(|t| matches_any(&search_text(t), DELIVERY_KEYWORDS))
        .count();
    let final_reports = tasks
        .iter()
        .filter(|t| matches_any(&search_text(t), FINAL_REPORT_KEYWORDS))
        .count();

    let flag = |category: RiskCategory, high: bool, note: String| RiskFlag {
        category,
        severity: if high {
            RiskSeverity::High
        } else {
            RiskSeverity::Medium
        },
        note,
    };

    vec![
        flag(
            RiskCategory::FieldLogistics,
            field_hits > 0,
            format!("{field_hits} open field-work tasks exposed to weather and logistics"),
        ),
        flag(
            RiskCategory::AnalysisBottleneck,
            analysis_hits >= 2,
            format!("{analysis_hits} open analysis/laboratory tasks competing for the same queue"),
        ),
        flag(
            RiskCategory::ExternalDependency,
            external_hits > 0,
            format!("{external_hits} open tasks waiting on agencies, clients or suppliers"),
        ),
        flag(
            RiskCategory::DeliverySlippage,
            slipping_deliveries > 0,
            format!("{slipping_deliveries} delivery tasks already past their dates"),
        ),
        flag(
            RiskCategory::ReportOverload,
            final_reports >= REPORT_OVERLOAD_COUNT,
            format!("{final_reports} final-report tasks in the pipeline"),
        ),
    ]
}

/// Ordered advisory strings: late count, first critical week, top
/// critical-path names, or a single all-clear
fn alerts(
    tasks: &[Task],
    late_total: usize,
    upcoming: &[HeatmapWeek],
    critical_path: &[CriticalPathTask],
) -> Vec<String> {
    let mut alerts = Vec::new();

    if late_total > 0 {
        let plural = if late_total == 1 { "task is" } else { "tasks are" };
        alerts.push(format!(
            "{late_total} {plural} past due and need rescheduling or closure."
        ));
    }

    if let Some(week) = upcoming.iter().find(|w| w.level == LoadLevel::Critical) {
        alerts.push(format!(
            "Week of {} concentrates {} deadlines; consider spreading deliveries.",
            week.week_start, week.load
        ));
    }

    if !critical_path.is_empty() {
        let names: Vec<&str> = critical_path
            .iter()
            .take(ALERT_TOP_TASKS)
            .map(|t| t.name.as_str())
            .collect();
        alerts.push(format!("Watch closely: {}.", names.join(", ")));
    }

    if alerts.is_empty() && !tasks.is_empty() {
        alerts.push("No schedule alerts; keep the current pace.".to_string());
    }

    alerts
}

/// One-sentence summary, selected by fixed precedence
fn headline(total: usize, late_total: usize, percent_complete: u8) -> String {
    if total == 0 {
        return "No tasks scheduled yet — start by planning the first deliveries.".to_string();
    }
    let late_fraction = late_total as f64 / total as f64;
    if late_total == 0 && percent_complete >= HEALTHY_PERCENT {
        format!("Schedule is healthy: {percent_complete}% complete with nothing late.")
    } else if late_total > 0 && late_fraction <= AT_RISK_FRACTION {
        format!("Schedule is recoverable: {late_total} late of {total} tasks.")
    } else if late_fraction > AT_RISK_FRACTION {
        format!("Schedule at risk: {late_total} of {total} tasks are past due.")
    } else {
        format!("Work in progress: {percent_complete}% complete, nothing late.")
    }
}

/// Multi-sentence narrative paragraph, same precedence as the headline
fn narrative(
    total: usize,
    late_total: usize,
    done_total: usize,
    percent_complete: u8,
    today: NaiveDate,
) -> String {
    if total == 0 {
        return format!(
            "As of {today} there are no tasks on the schedule. Import a proposal or add \
             tasks to the projects to start tracking progress."
        );
    }

    let open_total = total - done_total;
    let late_fraction = late_total as f64 / total as f64;

    if late_total == 0 && percent_complete >= HEALTHY_PERCENT {
        format!(
            "As of {today}, {done_total} of {total} tasks are complete ({percent_complete}%) \
             and none are past due. The remaining {open_total} tasks are tracking to their dates."
        )
    } else if late_total > 0 && late_fraction <= AT_RISK_FRACTION {
        format!(
            "As of {today}, {late_total} of {total} tasks are past due, within a recoverable \
             margin. Completion stands at {percent_complete}%. Reschedule or close the late \
             items before the backlog compounds."
        )
    } else if late_fraction > AT_RISK_FRACTION {
        format!(
            "As of {today}, {late_total} of {total} tasks are past due — more than a fifth of \
             the schedule. Completion stands at {percent_complete}%. Prioritize the late list \
             and renegotiate dates with the affected clients."
        )
    } else {
        format!(
            "As of {today}, the schedule is in progress: {done_total} of {total} tasks complete \
             ({percent_complete}%), {open_total} still open and none past due."
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
