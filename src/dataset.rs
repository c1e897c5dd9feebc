// 📦 Dataset - already-exported entity collections
//
// The engine never queries storage. Binaries hand it a Dataset loaded from a
// JSON export (all collections) and/or a CSV export of work items.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::entities::{
    Block, ConsolidatedMonth, FinancialEntry, Project, Stage, StageTransition, WorkItem,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub projects: Vec<Project>,
    pub work_items: Vec<WorkItem>,
    pub stages: Vec<Stage>,
    pub transitions: Vec<StageTransition>,
    pub blocks: Vec<Block>,
    pub financial_entries: Vec<FinancialEntry>,
    pub consolidations: Vec<ConsolidatedMonth>,
}

impl Dataset {
    /// Load a dataset from a JSON export
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read dataset file: {:?}", path.as_ref()))?;

        Dataset::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse dataset JSON")
    }

    /// Subset whose work items satisfy `keep`; transitions and blocks follow their items
    pub fn scoped<F>(&self, keep: F) -> Dataset
    where
        F: Fn(&WorkItem) -> bool,
    {
        let work_items: Vec<WorkItem> = self.work_items.iter().filter(|item| keep(*item)).cloned().collect();
        let ids: HashSet<&str> = work_items.iter().map(|item| item.id.as_str()).collect();

        Dataset {
            projects: self.projects.clone(),
            transitions: self
                .transitions
                .iter()
                .filter(|transition| ids.contains(transition.work_item_id.as_str()))
                .cloned()
                .collect(),
            blocks: self
                .blocks
                .iter()
                .filter(|block| ids.contains(block.work_item_id.as_str()))
                .cloned()
                .collect(),
            stages: self.stages.clone(),
            financial_entries: self.financial_entries.clone(),
            consolidations: self.consolidations.clone(),
            work_items,
        }
    }

    pub fn for_project(&self, project_id: &str) -> Dataset {
        let mut scoped = self.scoped(|item| item.belongs_to_project(project_id));
        scoped.projects.retain(|project| project.id == project_id);
        scoped
    }

    pub fn for_team(&self, team_id: &str) -> Dataset {
        self.scoped(|item| item.belongs_to_team(team_id))
    }
}

/// Load work items from a CSV export (header row = field names)
pub fn load_work_items_csv(csv_path: &Path) -> Result<Vec<WorkItem>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut items = Vec::new();

    for result in rdr.deserialize() {
        let mut item: WorkItem = result.context("Failed to deserialize work item")?;

        // Rows exported without an id still need a stable identity
        if item.id.is_empty() {
            item.id = uuid::Uuid::new_v4().to_string();
        }

        items.push(item);
    }

    tracing::info!(count = items.len(), path = ?csv_path, "loaded work items from CSV");

    Ok(items)
}

// ============================================================================
// TESTS
// ============================================================================
