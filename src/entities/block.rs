// ⛔ Block Entity - an impediment on a work item

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::IntervalEnd;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub work_item_id: String,
    pub blocked_at: DateTime<Utc>,

    /// Open while the block is still active
    #[serde(default)]
    pub unblocked_at: IntervalEnd,

    /// Inactive blocks were cancelled and are ignored by block metrics
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Block {
    pub fn new(work_item_id: &str, blocked_at: DateTime<Utc>) -> Self {
        Block {
            work_item_id: work_item_id.to_string(),
            blocked_at,
            unblocked_at: IntervalEnd::Open,
            is_active: true,
        }
    }

    pub fn unblocked(mut self, unblocked_at: DateTime<Utc>) -> Self {
        self.unblocked_at = IntervalEnd::Bounded(unblocked_at);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn is_still_blocking(&self) -> bool {
        self.is_active && self.unblocked_at.is_open()
    }
}
