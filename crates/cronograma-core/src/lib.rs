//! # cronograma-core
//!
//! Core domain model and snapshot ingestion for the cronograma analytics
//! engine.
//!
//! This crate provides:
//! - Domain types: `Project`, `Task`, `Subtask`, `Recurrence`
//! - Canonical status/priority enums and the effective-status derivation
//! - Permissive normalization of legacy records at the ingestion boundary
//! - JSON snapshot loading
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use cronograma_core::{EffectiveStatus, Task, TaskStatus};
//!
//! let task = Task::new("t1")
//!     .name("Soil sampling report")
//!     .dates(
//!         NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
//!     )
//!     .status(TaskStatus::InProgress);
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! assert_eq!(task.effective_status(today), EffectiveStatus::Late);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod normalize;
pub mod snapshot;

pub use normalize::{IngestWarning, RawProject, RawSnapshot, RawSubtask, RawTask};
pub use snapshot::{Snapshot, SnapshotError};

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a project (assigned by the external store)
pub type ProjectId = String;

/// Unique identifier for a task (assigned by the external store)
pub type TaskId = String;

/// Display name used when a task has no project or references a missing one
pub const NO_PROJECT_PLACEHOLDER: &str = "(no project)";

// ============================================================================
// Status and Priority
// ============================================================================

/// Lifecycle status of a project
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Active => "active",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored status of a task, as recorded by the external store.
///
/// This is the canonical form of whatever legacy string the store holds; it
/// is never mutated by analytics. Lateness is a derived property, see
/// [`EffectiveStatus`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Archived,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Done => "done",
            TaskStatus::Archived => "archived",
        }
    }

    /// Whether this status counts as open work (not done, not archived)
    pub fn is_open(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status used for display and analytics, derived from the stored status
/// plus the evaluation date.
///
/// A stored `Pending`/`InProgress` task whose end date has passed becomes
/// `Late` here; the stored record is untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectiveStatus {
    Pending,
    InProgress,
    Done,
    Archived,
    Late,
}

impl EffectiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveStatus::Pending => "pending",
            EffectiveStatus::InProgress => "in progress",
            EffectiveStatus::Done => "done",
            EffectiveStatus::Archived => "archived",
            EffectiveStatus::Late => "late",
        }
    }
}

impl std::fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Recurrence
// ============================================================================

/// Recurrence descriptor for a task.
///
/// Weekly recurrence may carry a day of week (0 = Monday .. 6 = Sunday),
/// monthly recurrence a day of month (1..=31). Out-of-domain values are
/// dropped to `None` for the field during ingestion, never rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly {
        weekday: Option<u8>,
    },
    Monthly {
        day: Option<u8>,
    },
}

// ============================================================================
// Project
// ============================================================================

/// A top-level unit of work, owned by the external store.
///
/// Analytics only ever reads projects; there is no mutation path here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    /// Opaque identifier, externally assigned
    pub id: ProjectId,
    /// Display name
    pub name: String,
    /// Client the project belongs to
    pub client: String,
    /// UI grouping color (opaque string, e.g. "#2d6a4f")
    pub color: String,
    /// Lifecycle status
    pub status: ProjectStatus,
    /// Creation timestamp (day granularity), if recorded
    pub created_at: Option<NaiveDate>,
    /// Last-update timestamp (day granularity), if recorded
    pub updated_at: Option<NaiveDate>,
}

impl Project {
    /// Create a project with the given id (test/demo convenience)
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            client: String::new(),
            color: String::new(),
            status: ProjectStatus::Planning,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the client
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// Set the lifecycle status
    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }
}

/// Look up a project's display name, degrading to a placeholder when the
/// reference is missing or points at a deleted project.
pub fn project_name<'a>(projects: &'a [Project], id: Option<&str>) -> &'a str {
    id.and_then(|id| projects.iter().find(|p| p.id == id))
        .map_or(NO_PROJECT_PLACEHOLDER, |p| p.name.as_str())
}

// ============================================================================
// Task
// ============================================================================

/// A subtask line item
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subtask {
    pub text: String,
    pub done: bool,
    pub order: u32,
}

/// A schedulable unit of work
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    /// Opaque identifier, externally assigned
    pub id: TaskId,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Owning project; `None` for orphaned tasks (a valid state)
    pub project_id: Option<ProjectId>,
    /// Start date; `None` when missing or unparseable
    pub start: Option<NaiveDate>,
    /// End date; `None` when missing or unparseable
    pub end: Option<NaiveDate>,
    /// Stored status (never mutated by analytics)
    pub status: TaskStatus,
    /// Priority
    pub priority: Priority,
    /// Responsible party (free text)
    pub responsible: String,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Subtasks
    pub subtasks: Vec<Subtask>,
    /// Recurrence descriptor
    pub recurrence: Recurrence,
}

impl Task {
    /// Create a task with the given id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            project_id: None,
            start: None,
            end: None,
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            responsible: String::new(),
            tags: Vec::new(),
            subtasks: Vec::new(),
            recurrence: Recurrence::None,
        }
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the owning project
    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set both date bounds
    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set only the end date
    pub fn ends(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the stored status
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the priority
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// The inclusive date range of this task, when it has one.
    ///
    /// Returns `Some((start, end))` only when both bounds are present and
    /// `start <= end`. Inverted ranges are treated as "no valid range"
    /// uniformly across every consumer (day expansion, duration math,
    /// rollup min/max).
    pub fn valid_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    /// Duration in calendar days (`end - start`), when the range is valid
    pub fn duration_days(&self) -> Option<i64> {
        self.valid_range().map(|(start, end)| (end - start).num_days())
    }

    /// Derive the status used for display and analytics.
    ///
    /// Dates compare at day granularity: a task is late only when its end
    /// date is strictly before `today`. Done/archived tasks never become
    /// late.
    pub fn effective_status(&self, today: NaiveDate) -> EffectiveStatus {
        match self.status {
            TaskStatus::Done => EffectiveStatus::Done,
            TaskStatus::Archived => EffectiveStatus::Archived,
            TaskStatus::Pending | TaskStatus::InProgress => {
                if self.end.is_some_and(|end| end < today) {
                    EffectiveStatus::Late
                } else if self.status == TaskStatus::Pending {
                    EffectiveStatus::Pending
                } else {
                    EffectiveStatus::InProgress
                }
            }
        }
    }

    /// Days elapsed since the end date (positive when past due)
    pub fn days_past_end(&self, today: NaiveDate) -> Option<i64> {
        self.end.map(|end| (today - end).num_days())
    }
}

/// Default listing filter: done/archived tasks are hidden unless the caller
/// explicitly asks for them.
pub fn list_tasks(tasks: &[Task], include_closed: bool) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| include_closed || t.status.is_open())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn overdue_pending_task_is_late() {
        let task = Task::new("t").ends(date(2024, 1, 5));
        assert_eq!(task.effective_status(date(2024, 1, 10)), EffectiveStatus::Late);
    }

    #[test]
    fn overdue_in_progress_task_is_late() {
        let task = Task::new("t")
            .ends(date(2024, 1, 5))
            .status(TaskStatus::InProgress);
        assert_eq!(task.effective_status(date(2024, 1, 10)), EffectiveStatus::Late);
    }

    #[test]
    fn done_task_never_late() {
        let task = Task::new("t")
            .ends(date(2024, 1, 5))
            .status(TaskStatus::Done);
        assert_eq!(task.effective_status(date(2024, 1, 10)), EffectiveStatus::Done);
    }

    #[test]
    fn archived_task_never_late() {
        let task = Task::new("t")
            .ends(date(2024, 1, 5))
            .status(TaskStatus::Archived);
        assert_eq!(
            task.effective_status(date(2024, 1, 10)),
            EffectiveStatus::Archived
        );
    }

    #[test]
    fn end_equal_to_today_is_not_late() {
        // Strictly-before comparison: due today is still on time
        let task = Task::new("t").ends(date(2024, 1, 10));
        assert_eq!(
            task.effective_status(date(2024, 1, 10)),
            EffectiveStatus::Pending
        );
    }

    #[test]
    fn task_without_end_keeps_stored_status() {
        let task = Task::new("t").status(TaskStatus::InProgress);
        assert_eq!(
            task.effective_status(date(2024, 1, 10)),
            EffectiveStatus::InProgress
        );
    }

    #[test]
    fn valid_range_requires_both_bounds() {
        let task = Task::new("t").ends(date(2024, 1, 5));
        assert_eq!(task.valid_range(), None);

        let task = Task::new("t").dates(date(2024, 1, 2), date(2024, 1, 5));
        assert_eq!(task.valid_range(), Some((date(2024, 1, 2), date(2024, 1, 5))));
    }

    #[test]
    fn inverted_range_is_no_range() {
        let task = Task::new("t").dates(date(2024, 1, 5), date(2024, 1, 2));
        assert_eq!(task.valid_range(), None);
        assert_eq!(task.duration_days(), None);
    }

    #[test]
    fn duration_in_calendar_days() {
        let task = Task::new("t").dates(date(2024, 1, 2), date(2024, 1, 9));
        assert_eq!(task.duration_days(), Some(7));
    }

    #[test]
    fn project_name_degrades_to_placeholder() {
        let projects = vec![Project::new("p1").name("Licenciamento Fazenda Norte")];

        assert_eq!(
            project_name(&projects, Some("p1")),
            "Licenciamento Fazenda Norte"
        );
        assert_eq!(project_name(&projects, Some("deleted")), NO_PROJECT_PLACEHOLDER);
        assert_eq!(project_name(&projects, None), NO_PROJECT_PLACEHOLDER);
    }

    #[test]
    fn default_listing_hides_closed_tasks() {
        let tasks = vec![
            Task::new("a"),
            Task::new("b").status(TaskStatus::Done),
            Task::new("c").status(TaskStatus::Archived),
            Task::new("d").status(TaskStatus::InProgress),
        ];

        let open: Vec<_> = list_tasks(&tasks, false).iter().map(|t| t.id.clone()).collect();
        assert_eq!(open, vec!["a", "d"]);

        assert_eq!(list_tasks(&tasks, true).len(), 4);
    }

    #[test]
    fn task_status_display() {
        assert_eq!(format!("{}", TaskStatus::InProgress), "in progress");
        assert_eq!(format!("{}", EffectiveStatus::Late), "late");
        assert_eq!(format!("{}", Priority::Urgent), "urgent");
    }

    #[test]
    fn priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Urgent);
    }
}
