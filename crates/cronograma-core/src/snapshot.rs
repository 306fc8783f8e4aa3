//! Snapshot loading.
//!
//! Analytics never talks to the document store. The calling layer hands over
//! an already-fetched snapshot — here, a JSON file with a `projects` array
//! and a `tasks` array — and this module normalizes it into canonical
//! records plus the warnings the normalizer collected along the way.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::normalize::{normalize_project, normalize_task, IngestWarning, RawSnapshot};
use crate::{Project, Task};

/// Failure to obtain a snapshot. Data-quality issues inside a readable
/// snapshot are warnings, never errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A normalized, read-only view of the store's data at one point in time
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    /// Data-quality issues observed while normalizing
    pub warnings: Vec<IngestWarning>,
}

impl Snapshot {
    /// Normalize raw records into a snapshot
    pub fn from_raw(raw: &RawSnapshot) -> Self {
        let mut warnings = Vec::new();

        let projects: Vec<Project> = raw
            .projects
            .iter()
            .map(|p| normalize_project(p, &mut warnings))
            .collect();
        let tasks: Vec<Task> = raw
            .tasks
            .iter()
            .map(|t| normalize_task(t, &mut warnings))
            .collect();

        // Dangling project references are valid, but worth surfacing
        let known: HashSet<&str> = projects.iter().map(|p| p.id.as_str()).collect();
        for task in &tasks {
            if let Some(project_id) = &task.project_id {
                if !known.contains(project_id.as_str()) {
                    warnings.push(IngestWarning::OrphanedProject {
                        task: task.id.clone(),
                        project: project_id.clone(),
                    });
                }
            }
        }

        Self {
            projects,
            tasks,
            warnings,
        }
    }

    /// Parse and normalize a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_raw(&raw))
    }

    /// Load and normalize a snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

// ============================================================================
// Tests
// ============================================================================
