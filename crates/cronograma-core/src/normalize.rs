//! Ingestion-boundary normalization.
//!
//! The external document store holds loosely-typed records: statuses and
//! priorities are free strings accumulated across schema versions (Portuguese
//! labels, English labels, snake_case keys), dates are strings in several
//! formats, and foreign keys may dangle. This module converts those raw
//! records into the canonical domain types exactly once, at the boundary.
//!
//! Normalization is deliberately permissive (see the error-handling design):
//! - unrecognized status/priority strings fall back to safe defaults,
//! - unparseable dates become `None`,
//! - orphaned project references are kept as-is.
//!
//! Every fallback is reported as an [`IngestWarning`] so callers (e.g. the
//! `check` command) can surface data-quality issues without failing.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    Priority, Project, ProjectId, ProjectStatus, Recurrence, Subtask, Task, TaskId, TaskStatus,
};

// ============================================================================
// Raw Records
// ============================================================================

/// A project as stored: loose strings everywhere
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawProject {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "nome")]
    pub name: String,
    #[serde(default, alias = "cliente")]
    pub client: String,
    #[serde(default, alias = "cor")]
    pub color: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "createdAt", alias = "criado_em")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt", alias = "atualizado_em")]
    pub updated_at: Option<String>,
}

/// A subtask as stored
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawSubtask {
    #[serde(default, alias = "texto")]
    pub text: String,
    #[serde(default, alias = "concluida")]
    pub done: bool,
    #[serde(default, alias = "ordem")]
    pub order: u32,
}

/// Recurrence descriptor as stored
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawRecurrence {
    #[serde(default, alias = "tipo")]
    pub kind: Option<String>,
    #[serde(default, alias = "diaSemana", alias = "dia_semana")]
    pub weekday: Option<i64>,
    #[serde(default, alias = "diaMes", alias = "dia_mes")]
    pub day: Option<i64>,
}

/// A task as stored
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawTask {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "nome", alias = "title", alias = "titulo")]
    pub name: String,
    #[serde(default, alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "projectId", alias = "projeto_id")]
    pub project_id: Option<String>,
    #[serde(default, alias = "inicio", alias = "data_inicio")]
    pub start: Option<String>,
    #[serde(default, alias = "fim", alias = "data_fim")]
    pub end: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "prioridade")]
    pub priority: Option<String>,
    #[serde(default, alias = "responsavel")]
    pub responsible: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "subtarefas")]
    pub subtasks: Vec<RawSubtask>,
    #[serde(default, alias = "recorrencia")]
    pub recurrence: Option<RawRecurrence>,
}

/// The whole snapshot as stored
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawSnapshot {
    #[serde(default, alias = "projetos")]
    pub projects: Vec<RawProject>,
    #[serde(default, alias = "tarefas")]
    pub tasks: Vec<RawTask>,
}

// ============================================================================
// Warnings
// ============================================================================

/// A data-quality issue observed during normalization.
///
/// Warnings never abort ingestion; the record is normalized with a default
/// and the warning is collected alongside the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestWarning {
    /// Task status string not in the alias table; defaulted to pending
    UnknownTaskStatus { task: TaskId, value: String },
    /// Priority string not in the alias table; defaulted to medium
    UnknownPriority { task: TaskId, value: String },
    /// Project status string not in the alias table; defaulted to planning
    UnknownProjectStatus { project: ProjectId, value: String },
    /// A date string that could not be parsed; treated as absent
    UnparseableDate {
        task: TaskId,
        field: &'static str,
        value: String,
    },
    /// End date before start date; the range is ignored everywhere
    InvertedRange {
        task: TaskId,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Task references a project id not present in the snapshot
    OrphanedProject { task: TaskId, project: ProjectId },
}

impl std::fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestWarning::UnknownTaskStatus { task, value } => {
                write!(f, "task '{task}': unknown status '{value}', using pending")
            }
            IngestWarning::UnknownPriority { task, value } => {
                write!(f, "task '{task}': unknown priority '{value}', using medium")
            }
            IngestWarning::UnknownProjectStatus { project, value } => {
                write!(
                    f,
                    "project '{project}': unknown status '{value}', using planning"
                )
            }
            IngestWarning::UnparseableDate { task, field, value } => {
                write!(f, "task '{task}': unparseable {field} date '{value}'")
            }
            IngestWarning::InvertedRange { task, start, end } => {
                write!(
                    f,
                    "task '{task}': end {end} is before start {start}, range ignored"
                )
            }
            IngestWarning::OrphanedProject { task, project } => {
                write!(f, "task '{task}': references missing project '{project}'")
            }
        }
    }
}

// ============================================================================
// Alias Tables
// ============================================================================

/// Map a stored task-status string into the canonical enum.
///
/// Returns `None` for unrecognized values; the caller decides the default
/// and records the warning.
pub fn parse_task_status(raw: &str) -> Option<TaskStatus> {
    match raw.trim().to_lowercase().as_str() {
        "pendente" | "a fazer" | "a_fazer" | "afazer" | "todo" | "to do" | "backlog"
        | "pending" | "nao iniciada" | "não iniciada" => Some(TaskStatus::Pending),
        "em andamento" | "em_andamento" | "andamento" | "fazendo" | "doing" | "in progress"
        | "in_progress" | "iniciada" => Some(TaskStatus::InProgress),
        "concluida" | "concluída" | "concluido" | "concluído" | "finalizada" | "finalizado"
        | "feito" | "done" | "completed" | "complete" => Some(TaskStatus::Done),
        "arquivada" | "arquivado" | "archived" => Some(TaskStatus::Archived),
        _ => None,
    }
}

/// Map a stored priority string into the canonical enum
pub fn parse_priority(raw: &str) -> Option<Priority> {
    match raw.trim().to_lowercase().as_str() {
        "baixa" | "baixo" | "low" => Some(Priority::Low),
        "media" | "média" | "medio" | "médio" | "normal" | "medium" => Some(Priority::Medium),
        "alta" | "alto" | "high" => Some(Priority::High),
        "urgente" | "urgent" | "critica" | "crítica" => Some(Priority::Urgent),
        _ => None,
    }
}

/// Map a stored project-status string into the canonical enum
pub fn parse_project_status(raw: &str) -> Option<ProjectStatus> {
    match raw.trim().to_lowercase().as_str() {
        "planejamento" | "planning" | "rascunho" | "draft" => Some(ProjectStatus::Planning),
        "ativo" | "ativa" | "active" | "em andamento" | "em_andamento" | "andamento" => {
            Some(ProjectStatus::Active)
        }
        "arquivado" | "arquivada" | "archived" | "concluido" | "concluído" | "finalizado" => {
            Some(ProjectStatus::Archived)
        }
        _ => None,
    }
}

/// Parse a stored date string at day granularity.
///
/// Accepts plain ISO dates, RFC 3339 timestamps (the date part is kept), and
/// the `dd/mm/yyyy` form older records use. Anything else is `None` — a
/// malformed date is treated as absent, never as an error.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    // Timestamp forms: take the calendar-day prefix
    if let Some(prefix) = raw.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}

/// Normalize a recurrence descriptor, validating day fields against their
/// fixed domains (weekday 0..=6, month day 1..=31)
pub fn parse_recurrence(raw: Option<&RawRecurrence>) -> Recurrence {
    let Some(raw) = raw else {
        return Recurrence::None;
    };
    match raw.kind.as_deref().map(str::to_lowercase).as_deref() {
        Some("daily" | "diaria" | "diária") => Recurrence::Daily,
        Some("weekly" | "semanal") => Recurrence::Weekly {
            weekday: raw
                .weekday
                .filter(|d| (0..=6).contains(d))
                .map(|d| d as u8),
        },
        Some("monthly" | "mensal") => Recurrence::Monthly {
            day: raw.day.filter(|d| (1..=31).contains(d)).map(|d| d as u8),
        },
        _ => Recurrence::None,
    }
}

// ============================================================================
// Record Normalization
// ============================================================================

fn normalize_date(
    raw: Option<&str>,
    task: &str,
    field: &'static str,
    warnings: &mut Vec<IngestWarning>,
) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = parse_date(raw);
    if parsed.is_none() {
        warnings.push(IngestWarning::UnparseableDate {
            task: task.to_string(),
            field,
            value: raw.to_string(),
        });
    }
    parsed
}

/// Normalize a single raw project
pub fn normalize_project(raw: &RawProject, warnings: &mut Vec<IngestWarning>) -> Project {
    let status = match raw.status.as_deref() {
        None => ProjectStatus::Planning,
        Some(value) => parse_project_status(value).unwrap_or_else(|| {
            warnings.push(IngestWarning::UnknownProjectStatus {
                project: raw.id.clone(),
                value: value.to_string(),
            });
            ProjectStatus::Planning
        }),
    };

    Project {
        id: raw.id.clone(),
        name: raw.name.clone(),
        client: raw.client.clone(),
        color: raw.color.clone(),
        status,
        created_at: raw.created_at.as_deref().and_then(parse_date),
        updated_at: raw.updated_at.as_deref().and_then(parse_date),
    }
}

/// Normalize a single raw task
pub fn normalize_task(raw: &RawTask, warnings: &mut Vec<IngestWarning>) -> Task {
    let status = match raw.status.as_deref() {
        None => TaskStatus::Pending,
        Some(value) => parse_task_status(value).unwrap_or_else(|| {
            warnings.push(IngestWarning::UnknownTaskStatus {
                task: raw.id.clone(),
                value: value.to_string(),
            });
            TaskStatus::Pending
        }),
    };

    let priority = match raw.priority.as_deref() {
        None => Priority::Medium,
        Some(value) => parse_priority(value).unwrap_or_else(|| {
            warnings.push(IngestWarning::UnknownPriority {
                task: raw.id.clone(),
                value: value.to_string(),
            });
            Priority::Medium
        }),
    };

    let start = normalize_date(raw.start.as_deref(), &raw.id, "start", warnings);
    let end = normalize_date(raw.end.as_deref(), &raw.id, "end", warnings);
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            warnings.push(IngestWarning::InvertedRange {
                task: raw.id.clone(),
                start,
                end,
            });
        }
    }

    Task {
        id: raw.id.clone(),
        name: raw.name.clone(),
        description: raw.description.clone(),
        project_id: raw.project_id.clone().filter(|id| !id.is_empty()),
        start,
        end,
        status,
        priority,
        responsible: raw.responsible.clone().unwrap_or_default(),
        tags: raw.tags.clone(),
        subtasks: raw
            .subtasks
            .iter()
            .map(|s| Subtask {
                text: s.text.clone(),
                done: s.done,
                order: s.order,
            })
            .collect(),
        recurrence: parse_recurrence(raw.recurrence.as_ref()),
    }
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
    fn legacy_status_aliases() {
        assert_eq!(parse_task_status("A fazer"), Some(TaskStatus::Pending));
        assert_eq!(parse_task_status("Fazendo"), Some(TaskStatus::InProgress));
        assert_eq!(parse_task_status("Concluida"), Some(TaskStatus::Done));
        assert_eq!(parse_task_status("Concluída"), Some(TaskStatus::Done));
        assert_eq!(parse_task_status("  em andamento "), Some(TaskStatus::InProgress));
        assert_eq!(parse_task_status("archived"), Some(TaskStatus::Archived));
        assert_eq!(parse_task_status("???"), None);
    }

    #[test]
    fn legacy_priority_aliases() {
        assert_eq!(parse_priority("Baixa"), Some(Priority::Low));
        assert_eq!(parse_priority("média"), Some(Priority::Medium));
        assert_eq!(parse_priority("ALTA"), Some(Priority::High));
        assert_eq!(parse_priority("urgente"), Some(Priority::Urgent));
        assert_eq!(parse_priority("sei la"), None);
    }

    #[test]
    fn date_formats() {
        assert_eq!(parse_date("2024-01-15"), Some(date(2024, 1, 15)));
        assert_eq!(
            parse_date("2024-01-15T13:45:00Z"),
            Some(date(2024, 1, 15))
        );
        assert_eq!(parse_date("15/01/2024"), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn unknown_status_defaults_to_pending_with_warning() {
        let raw = RawTask {
            id: "t1".into(),
            status: Some("banana".into()),
            ..RawTask::default()
        };
        let mut warnings = Vec::new();
        let task = normalize_task(&raw, &mut warnings);

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(
            warnings,
            vec![IngestWarning::UnknownTaskStatus {
                task: "t1".into(),
                value: "banana".into(),
            }]
        );
    }

    #[test]
    fn missing_status_defaults_silently() {
        let raw = RawTask {
            id: "t1".into(),
            ..RawTask::default()
        };
        let mut warnings = Vec::new();
        let task = normalize_task(&raw, &mut warnings);

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Medium);
        assert!(warnings.is_empty());
    }

    #[test]
    fn malformed_date_becomes_absent() {
        let raw = RawTask {
            id: "t1".into(),
            start: Some("soon".into()),
            end: Some("2024-02-01".into()),
            ..RawTask::default()
        };
        let mut warnings = Vec::new();
        let task = normalize_task(&raw, &mut warnings);

        assert_eq!(task.start, None);
        assert_eq!(task.end, Some(date(2024, 2, 1)));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            IngestWarning::UnparseableDate { field: "start", .. }
        ));
    }

    #[test]
    fn inverted_range_warned_but_kept() {
        let raw = RawTask {
            id: "t1".into(),
            start: Some("2024-02-10".into()),
            end: Some("2024-02-01".into()),
            ..RawTask::default()
        };
        let mut warnings = Vec::new();
        let task = normalize_task(&raw, &mut warnings);

        // Both dates survive on the record; valid_range() is what consumers use
        assert_eq!(task.start, Some(date(2024, 2, 10)));
        assert_eq!(task.end, Some(date(2024, 2, 1)));
        assert_eq!(task.valid_range(), None);
        assert!(matches!(warnings[0], IngestWarning::InvertedRange { .. }));
    }

    #[test]
    fn recurrence_domains_validated() {
        let weekly = RawRecurrence {
            kind: Some("semanal".into()),
            weekday: Some(2),
            day: None,
        };
        assert_eq!(
            parse_recurrence(Some(&weekly)),
            Recurrence::Weekly { weekday: Some(2) }
        );

        let bad_weekday = RawRecurrence {
            kind: Some("weekly".into()),
            weekday: Some(9),
            day: None,
        };
        assert_eq!(
            parse_recurrence(Some(&bad_weekday)),
            Recurrence::Weekly { weekday: None }
        );

        let monthly = RawRecurrence {
            kind: Some("mensal".into()),
            weekday: None,
            day: Some(31),
        };
        assert_eq!(
            parse_recurrence(Some(&monthly)),
            Recurrence::Monthly { day: Some(31) }
        );

        let bad_day = RawRecurrence {
            kind: Some("monthly".into()),
            weekday: None,
            day: Some(0),
        };
        assert_eq!(
            parse_recurrence(Some(&bad_day)),
            Recurrence::Monthly { day: None }
        );

        assert_eq!(parse_recurrence(None), Recurrence::None);
    }

    #[test]
    fn project_status_aliases() {
        assert_eq!(parse_project_status("Planejamento"), Some(ProjectStatus::Planning));
        assert_eq!(parse_project_status("ativo"), Some(ProjectStatus::Active));
        assert_eq!(parse_project_status("Arquivado"), Some(ProjectStatus::Archived));
        assert_eq!(parse_project_status("zzz"), None);
    }

    #[test]
    fn empty_project_id_is_orphan() {
        let raw = RawTask {
            id: "t1".into(),
            project_id: Some(String::new()),
            ..RawTask::default()
        };
        let mut warnings = Vec::new();
        let task = normalize_task(&raw, &mut warnings);
        assert_eq!(task.project_id, None);
    }
}
