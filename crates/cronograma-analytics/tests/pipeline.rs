//! End-to-end pipeline tests: snapshot JSON in, derived views out.
//!
//! These exercise the same path the CLI takes — normalize a raw snapshot,
//! then run every analytics component over it — and pin the cross-component
//! properties: determinism, non-mutation, and consistent handling of
//! legacy/malformed records.

use chrono::NaiveDate;
use cronograma_analytics::{
    build_executive_summary, compute_dashboard, expand_by_day, Health,
};
use cronograma_core::Snapshot;
use pretty_assertions::assert_eq;

const SNAPSHOT: &str = r#"{
    "projects": [
        {"id": "p1", "nome": "Licenciamento Mina Azul", "cliente": "Mineradora Azul", "status": "Ativo"},
        {"id": "p2", "nome": "EIA Porto Sul", "cliente": "Porto Sul SA", "status": "Planejamento"}
    ],
    "tasks": [
        {"id": "t1", "nome": "Coleta de amostras", "projectId": "p1",
         "inicio": "2024-01-02", "fim": "2024-01-05", "status": "Concluída"},
        {"id": "t2", "nome": "Análise de laboratório", "projectId": "p1",
         "inicio": "2024-01-08", "fim": "2024-01-09", "status": "Fazendo"},
        {"id": "t3", "nome": "Entrega do relatório parcial", "projectId": "p1",
         "inicio": "2024-01-03", "fim": "2024-01-06", "status": "A fazer"},
        {"id": "t4", "nome": "Reunião com órgão ambiental", "projectId": "p2",
         "fim": "2024-01-12", "status": "pendente"},
        {"id": "t5", "nome": "Tarefa órfã", "projectId": "p-gone",
         "inicio": "2024-02-01", "fim": "2024-01-20"}
    ]
}"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

#[test]
fn snapshot_feeds_every_view() {
    let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();

    // Ingestion flagged the orphan and the inverted range
    assert_eq!(snapshot.warnings.len(), 2);

    let dashboard = compute_dashboard(&snapshot.projects, &snapshot.tasks, today());
    assert_eq!(dashboard.total_tasks, 5);
    assert_eq!(dashboard.done, 1);
    // t2 ends Jan 9 (late), t3 ends Jan 6 (late); t5 has an end in the
    // future so it stays pending
    assert_eq!(dashboard.late, 2);
    assert_eq!(dashboard.health, Health::Critical);

    // Calendar only sees t1, t2, t3 (valid ranges); t4 lacks a start and
    // t5 is inverted
    let days = expand_by_day(&snapshot.tasks);
    let jan3 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    assert_eq!(days[&jan3], vec!["t1", "t3"]);
    assert!(!days.values().flatten().any(|id| id == "t4" || id == "t5"));

    let summary = build_executive_summary(&snapshot.projects, &snapshot.tasks, today());
    assert_eq!(summary.late.len(), 2);
    assert_eq!(summary.late[0].task_id, "t3");
    assert_eq!(summary.late[0].days_late, 4);
    assert_eq!(summary.late[0].project, "Licenciamento Mina Azul");
    // Orphan t5 keeps a placeholder project wherever it shows up
    assert!(summary.projection.planned.is_some());
}

#[test]
fn rerunning_the_pipeline_is_byte_identical() {
    let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();

    let dash_a = compute_dashboard(&snapshot.projects, &snapshot.tasks, today());
    let dash_b = compute_dashboard(&snapshot.projects, &snapshot.tasks, today());
    assert_eq!(
        serde_json::to_vec(&dash_a).unwrap(),
        serde_json::to_vec(&dash_b).unwrap()
    );

    let sum_a = build_executive_summary(&snapshot.projects, &snapshot.tasks, today());
    let sum_b = build_executive_summary(&snapshot.projects, &snapshot.tasks, today());
    assert_eq!(
        serde_json::to_vec(&sum_a).unwrap(),
        serde_json::to_vec(&sum_b).unwrap()
    );

    assert_eq!(
        expand_by_day(&snapshot.tasks),
        expand_by_day(&snapshot.tasks)
    );
}

#[test]
fn analytics_never_mutate_the_snapshot() {
    let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
    let tasks_before = serde_json::to_string(&snapshot.tasks).unwrap();
    let projects_before = serde_json::to_string(&snapshot.projects).unwrap();

    let _ = compute_dashboard(&snapshot.projects, &snapshot.tasks, today());
    let _ = build_executive_summary(&snapshot.projects, &snapshot.tasks, today());
    let _ = expand_by_day(&snapshot.tasks);

    assert_eq!(serde_json::to_string(&snapshot.tasks).unwrap(), tasks_before);
    assert_eq!(
        serde_json::to_string(&snapshot.projects).unwrap(),
        projects_before
    );
}

#[test]
fn empty_snapshot_runs_clean() {
    let snapshot = Snapshot::from_json("{}").unwrap();

    let dashboard = compute_dashboard(&snapshot.projects, &snapshot.tasks, today());
    assert_eq!(dashboard.total_tasks, 0);
    assert_eq!(dashboard.percent_complete, 0);
    assert_eq!(dashboard.health, Health::Neutral);

    let summary = build_executive_summary(&snapshot.projects, &snapshot.tasks, today());
    assert!(summary.late.is_empty());
    assert!(summary.alerts.is_empty());
    assert!(summary.headline.contains("No tasks scheduled yet"));

    assert!(expand_by_day(&snapshot.tasks).is_empty());
}
