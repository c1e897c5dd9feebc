// 💰 Financial Entities - income/expense entries and consolidated months

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One income/expense record for a company period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialEntry {
    #[serde(default)]
    pub company_id: Option<String>,

    /// Any date inside the month the entry belongs to
    pub period_date: NaiveDate,

    #[serde(default)]
    pub income: f64,

    #[serde(default)]
    pub expense: f64,
}

impl FinancialEntry {
    pub fn new(period_date: NaiveDate, income: f64, expense: f64) -> Self {
        FinancialEntry {
            company_id: None,
            period_date,
            income,
            expense,
        }
    }
}

/// Precomputed monthly delivery snapshot written by an external batch job.
///
/// When present for a month it replaces the delivered hours/throughput the
/// engine would otherwise derive from work items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedMonth {
    /// Any date inside the consolidated month
    pub month: NaiveDate,
    pub delivered_hours: f64,

    #[serde(default)]
    pub throughput: Option<f64>,
}
