// 📁 Project Entity - scope container for work items

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{default_uuid, WorkItem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "default_uuid")]
    pub id: String,

    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Items promised before any work item was registered
    #[serde(default)]
    pub initial_scope: u32,
}

impl Project {
    pub fn new(id: &str, name: &str, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            start_date,
            end_date,
            initial_scope: 0,
        }
    }

    pub fn with_initial_scope(mut self, initial_scope: u32) -> Self {
        self.initial_scope = initial_scope;
        self
    }

    /// Items of this project, discarded ones included
    pub fn items<'a>(&'a self, items: &'a [WorkItem]) -> impl Iterator<Item = &'a WorkItem> + 'a {
        items.iter().filter(move |item| item.belongs_to_project(&self.id))
    }

    /// Scope = initial scope + every item ever registered in the project
    pub fn total_scope(&self, items: &[WorkItem]) -> f64 {
        self.initial_scope as f64 + self.items(items).count() as f64
    }
}
