//! Trend series derived from the page's expense list.

use crate::{
    aggregation::distinct_categories,
    month::MonthKey,
    trend::{TrendSeries, build_series},
    view_model::{ExpenseSnapshot, LoadState},
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TrendInputs {
    version: u64,
    window: Vec<MonthKey>,
    categories: Option<Vec<String>>,
}

/// Derives a [TrendSeries] from an expense snapshot, reusing the previous
/// series while the snapshot, window and categories stay the same.
#[derive(Debug, Default)]
pub struct TrendModel {
    memo: Option<(TrendInputs, TrendSeries)>,
    derivations: usize,
}

impl TrendModel {
    /// Create a model with nothing derived yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The series for `snapshot` over `window`.
    ///
    /// Columns are `categories` if given, otherwise every category in the
    /// snapshot in first-seen order.
    pub fn derive(
        &mut self,
        snapshot: &ExpenseSnapshot,
        window: &[MonthKey],
        categories: Option<&[String]>,
    ) -> &TrendSeries {
        let inputs = TrendInputs {
            version: snapshot.version,
            window: window.to_vec(),
            categories: categories.map(<[String]>::to_vec),
        };

        let memo = match self.memo.take() {
            Some((memo_inputs, series)) if memo_inputs == inputs => (memo_inputs, series),
            _ => {
                let columns = match categories {
                    Some(categories) => categories.to_vec(),
                    None => distinct_categories(snapshot.expenses()),
                };
                self.derivations += 1;
                (inputs, build_series(snapshot.expenses(), window, &columns))
            }
        };

        &self.memo.insert(memo).1
    }

    /// The series for the list's current state.
    ///
    /// Follows the list: nothing is derived until the list is ready.
    pub fn derive_from(
        &mut self,
        list: &LoadState<ExpenseSnapshot>,
        window: &[MonthKey],
        categories: Option<&[String]>,
    ) -> LoadState<TrendSeries> {
        match list {
            LoadState::Uninitialized => LoadState::Uninitialized,
            LoadState::Loading => LoadState::Loading,
            LoadState::Ready(snapshot) => {
                LoadState::Ready(self.derive(snapshot, window, categories).clone())
            }
        }
    }
}
