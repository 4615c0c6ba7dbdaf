//! Compares a month's spending with the month before.

use std::sync::Arc;

use serde::Serialize;

use crate::{
    aggregation::MonthlySummary,
    api::ExpenseApi,
    month::MonthKey,
    notify::Notifier,
    view_model::{LoadState, MonthlySummaryModel, SummaryInputs},
};

/// The percentage change from `previous` to `current`.
///
/// # Returns
/// `None` unless `previous` is strictly positive.
pub fn percentage_change(current: i64, previous: i64) -> Option<f64> {
    (previous > 0).then(|| (current - previous) as f64 / previous as f64 * 100.0)
}

/// The comparison as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView {
    /// The total of the compared month, if loaded.
    pub current_total: Option<i64>,
    /// The total of the month before, if loaded.
    pub previous_total: Option<i64>,
    /// The change in percent, absent when it cannot be computed.
    pub change_percent: Option<f64>,
}

/// Two [MonthlySummaryModel]s: one for a month and one for the month before.
#[derive(Debug)]
pub struct MonthComparison {
    current: MonthlySummaryModel,
    previous: MonthlySummaryModel,
}

impl MonthComparison {
    /// Create a comparison that has not fetched anything yet.
    pub fn new(api: Arc<dyn ExpenseApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            current: MonthlySummaryModel::new(api.clone(), notifier.clone()),
            previous: MonthlySummaryModel::new(api, notifier),
        }
    }

    /// Compare `month` with the month before, fetching both as needed.
    pub async fn sync(&self, month: MonthKey, refresh: u64) {
        tokio::join!(
            self.current.sync(SummaryInputs { month, refresh }),
            self.previous.sync(SummaryInputs {
                month: month.previous(),
                refresh,
            }),
        );
    }

    /// Fetch both months again.
    pub async fn refetch(&self) {
        tokio::join!(self.current.refetch(), self.previous.refetch());
    }

    /// The summary of the compared month.
    pub fn current(&self) -> LoadState<MonthlySummary> {
        self.current.state()
    }

    /// The summary of the month before.
    pub fn previous(&self) -> LoadState<MonthlySummary> {
        self.previous.state()
    }

    /// The percentage change between the two months.
    ///
    /// # Returns
    /// `None` until both summaries are ready, or if the previous month's
    /// total is zero.
    pub fn change_percent(&self) -> Option<f64> {
        match (self.current(), self.previous()) {
            (LoadState::Ready(current), LoadState::Ready(previous)) => {
                percentage_change(current.total, previous.total)
            }
            _ => None,
        }
    }

    /// The comparison for display.
    pub fn view(&self) -> ComparisonView {
        ComparisonView {
            current_total: self.current().ready().map(|summary| summary.total),
            previous_total: self.previous().ready().map(|summary| summary.total),
            change_percent: self.change_percent(),
        }
    }
}
