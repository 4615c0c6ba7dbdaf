//! The summary of a single month's expenses.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    aggregation::{MonthlySummary, aggregate},
    api::{ExpenseApi, ExpenseQuery},
    month::MonthKey,
    notify::{Notifier, notify_failure},
    view_model::{LoadState, Resource},
};

const FETCH_FAILED: &str = "月次集計の取得に失敗しました";

/// The inputs a [MonthlySummaryModel] reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryInputs {
    /// The month to summarise.
    pub month: MonthKey,
    /// Bumped by the caller to force a fresh fetch, e.g. after an import.
    pub refresh: u64,
}

impl SummaryInputs {
    /// Inputs for `month` with a refresh counter of 0.
    pub fn new(month: MonthKey) -> Self {
        Self { month, refresh: 0 }
    }
}

/// Fetches one month of expenses and summarises them.
#[derive(Debug)]
pub struct MonthlySummaryModel {
    api: Arc<dyn ExpenseApi>,
    notifier: Arc<dyn Notifier>,
    resource: Resource<MonthlySummary>,
    inputs: Mutex<Option<SummaryInputs>>,
}

impl MonthlySummaryModel {
    /// Create a model that has not fetched anything yet.
    pub fn new(api: Arc<dyn ExpenseApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            resource: Resource::new(),
            inputs: Mutex::new(None),
        }
    }

    /// The current summary.
    pub fn state(&self) -> LoadState<MonthlySummary> {
        self.resource.state()
    }

    /// The inputs of the most recent [sync](Self::sync).
    pub fn inputs(&self) -> Option<SummaryInputs> {
        *self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch if `inputs` differ from the last call, or if nothing has been
    /// fetched yet. Otherwise do nothing.
    pub async fn sync(&self, inputs: SummaryInputs) {
        let changed = {
            let mut last = self.inputs.lock().unwrap_or_else(PoisonError::into_inner);
            let changed = *last != Some(inputs);
            *last = Some(inputs);
            changed
        };

        if changed {
            self.fetch(inputs.month).await;
        }
    }

    /// Fetch again with the current inputs.
    pub async fn refetch(&self) {
        match self.inputs() {
            Some(inputs) => self.fetch(inputs.month).await,
            None => tracing::debug!("refetch requested before the month was set"),
        }
    }

    async fn fetch(&self, month: MonthKey) {
        let ticket = self.resource.begin();
        let result = self.api.list_expenses(ExpenseQuery::for_month(month)).await;

        let (summary, failure) = match result {
            Ok(expenses) => (aggregate(&expenses, month), None),
            Err(error) => (MonthlySummary::empty(), Some(error)),
        };

        if !self.resource.settle(ticket, || summary) {
            tracing::debug!("discarding stale summary response for {month}");
            return;
        }

        if let Some(error) = failure {
            notify_failure(self.notifier.as_ref(), &error, FETCH_FAILED);
        }
    }
}
