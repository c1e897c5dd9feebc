// 📋 Work Item Entity - a demand flowing through the delivery system
//
// Lifecycle: created → optionally committed → optionally completed.
// A discarded item keeps its history: discarding does NOT remove it from
// past-period aggregates unless a caller filters it explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::default_uuid;

// ============================================================================
// WORK ITEM TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkItemType {
    Feature,
    Bug,
    Chore,
}

impl WorkItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkItemType::Feature => "feature",
            WorkItemType::Bug => "bug",
            WorkItemType::Chore => "chore",
        }
    }

    pub fn all() -> [WorkItemType; 3] {
        [WorkItemType::Feature, WorkItemType::Bug, WorkItemType::Chore]
    }
}

impl Default for WorkItemType {
    fn default() -> Self {
        WorkItemType::Feature
    }
}

// ============================================================================
// CLASS OF SERVICE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassOfService {
    Standard,
    Expedite,
    FixedDate,
    Intangible,
}

impl Default for ClassOfService {
    fn default() -> Self {
        ClassOfService::Standard
    }
}

// ============================================================================
// WORK ITEM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    #[serde(default = "default_uuid")]
    pub id: String,

    /// Owning project (None = unassigned)
    #[serde(default)]
    pub project_id: Option<String>,

    /// Owning team (None = unassigned)
    #[serde(default)]
    pub team_id: Option<String>,

    pub created_at: DateTime<Utc>,

    /// When the item crossed the commitment point
    #[serde(default)]
    pub commitment_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Soft-delete marker
    #[serde(default)]
    pub discarded_at: Option<DateTime<Utc>>,

    /// Hours spent before the commitment point
    #[serde(default)]
    pub effort_upstream: f64,

    /// Hours spent after the commitment point
    #[serde(default)]
    pub effort_downstream: f64,

    #[serde(default)]
    pub class_of_service: ClassOfService,

    #[serde(rename = "type", default)]
    pub item_type: WorkItemType,
}

impl WorkItem {
    /// Create a feature created at `created_at`, not yet committed
    pub fn new(created_at: DateTime<Utc>) -> Self {
        WorkItem {
            id: default_uuid(),
            project_id: None,
            team_id: None,
            created_at,
            commitment_at: None,
            completed_at: None,
            discarded_at: None,
            effort_upstream: 0.0,
            effort_downstream: 0.0,
            class_of_service: ClassOfService::default(),
            item_type: WorkItemType::default(),
        }
    }

    pub fn with_project(mut self, project_id: &str) -> Self {
        self.project_id = Some(project_id.to_string());
        self
    }

    pub fn with_team(mut self, team_id: &str) -> Self {
        self.team_id = Some(team_id.to_string());
        self
    }

    pub fn with_commitment(mut self, commitment_at: DateTime<Utc>) -> Self {
        self.commitment_at = Some(commitment_at);
        self
    }

    pub fn with_completion(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed_at = Some(completed_at);
        self
    }

    pub fn with_discard(mut self, discarded_at: DateTime<Utc>) -> Self {
        self.discarded_at = Some(discarded_at);
        self
    }

    pub fn with_effort(mut self, upstream: f64, downstream: f64) -> Self {
        self.effort_upstream = upstream;
        self.effort_downstream = downstream;
        self
    }

    pub fn with_type(mut self, item_type: WorkItemType) -> Self {
        self.item_type = item_type;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded_at.is_some()
    }

    pub fn total_effort(&self) -> f64 {
        self.effort_upstream + self.effort_downstream
    }

    /// Start of the lead time clock: commitment, or creation for uncommitted items
    pub fn lead_time_start(&self) -> DateTime<Utc> {
        self.commitment_at.unwrap_or(self.created_at)
    }

    pub fn belongs_to_project(&self, project_id: &str) -> bool {
        self.project_id.as_deref() == Some(project_id)
    }

    pub fn belongs_to_team(&self, team_id: &str) -> bool {
        self.team_id.as_deref() == Some(team_id)
    }
}
