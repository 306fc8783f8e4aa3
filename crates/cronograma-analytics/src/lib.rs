//! # cronograma-analytics
//!
//! Derived schedule analytics over a normalized snapshot.
//!
//! This crate provides:
//! - Calendar day-expansion for month/week/day views
//! - Dashboard metrics: counts, per-project rollups, critical list, health
//! - Executive summary: late/ongoing/critical-path lists, completion
//!   projection, weekly load sparkline, upcoming-load heatmap, risk flags,
//!   and narrative text
//!
//! Every computation is a pure function of `(projects, tasks, today)`:
//! no clock reads, no mutation of the input collections, and identical
//! inputs always produce identical output. Callers rerun the whole pipeline
//! whenever the snapshot changes; derived structures are rebuilt, never
//! patched.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use cronograma_core::{Task, TaskStatus};
//! use cronograma_analytics::{compute_dashboard, Health};
//!
//! let tasks = vec![
//!     Task::new("t1").status(TaskStatus::Done),
//!     Task::new("t2").ends(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
//! ];
//! let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! let dashboard = compute_dashboard(&[], &tasks, today);
//! assert_eq!(dashboard.late, 1);
//! assert_eq!(dashboard.health, Health::Critical);
//! ```

pub mod calendar;
pub mod dashboard;
pub mod summary;
mod week;

pub use calendar::expand_by_day;
pub use dashboard::{compute_dashboard, CriticalTask, DashboardMetrics, Health, ProjectRollup};
pub use summary::{
    build_executive_summary, CompletionProjection, CriticalPathTask, CriticalTrigger,
    ExecutiveSummary, HeatmapWeek, LateTask, LoadLevel, OngoingTask, RiskCategory, RiskFlag,
    RiskSeverity, WeekLoad,
};
pub use week::week_start;
