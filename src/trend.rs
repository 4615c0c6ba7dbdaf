//! Month-by-category series for trend charts.

use std::collections::HashMap;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{expense::Expense, month::MonthKey};

/// The row key holding the month label in serialised rows. A category with
/// this name cannot be a column.
pub const MONTH_LABEL_KEY: &str = "month";

/// The amounts spent per category in one month of a [TrendSeries].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendRow {
    /// The month the row describes.
    pub month: MonthKey,
    /// The display label for the month.
    pub label: String,
    /// The amount per category, in the series' category order. Categories
    /// without expenses in the month have an amount of 0.
    pub amounts: Vec<(String, i64)>,
}

impl TrendRow {
    /// The sum of all category amounts in the row, saturating at `i64::MAX`.
    pub fn total(&self) -> i64 {
        self.amounts
            .iter()
            .fold(0i64, |total, (_, amount)| total.saturating_add(*amount))
    }

    /// The amount for `category`, or `None` if the series does not track it.
    pub fn amount(&self, category: &str) -> Option<i64> {
        self.amounts
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, amount)| *amount)
    }
}

/// Serialises as `{"month": <label>, <category>: <amount>, ...}`, the row
/// shape expected by the chart components.
impl Serialize for TrendRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.amounts.len() + 1))?;
        map.serialize_entry(MONTH_LABEL_KEY, &self.label)?;
        for (category, amount) in &self.amounts {
            map.serialize_entry(category, amount)?;
        }
        map.end()
    }
}

/// A dense month × category matrix of expense totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TrendSeries {
    /// The categories tracked by the series, in column order.
    pub categories: Vec<String>,
    /// One row per month of the window, in the window's order.
    pub rows: Vec<TrendRow>,
}

impl TrendSeries {
    /// The month labels, in row order.
    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.label.clone()).collect()
    }

    /// The amounts for `category` across all months, in row order.
    pub fn column(&self, category: &str) -> Vec<i64> {
        self.rows
            .iter()
            .map(|row| row.amount(category).unwrap_or(0))
            .collect()
    }
}

/// Build one row per month of `month_window` with the amount spent in each of
/// `categories`.
///
/// Every month of the window gets a row, in the window's order, even if it has
/// no expenses. Expenses outside the window or in categories not listed in
/// `categories` are ignored.
///
/// `categories` is treated as a set: repeated labels become a single column at
/// the position of their first occurrence. A category named
/// [MONTH_LABEL_KEY] is dropped because it would collide with the month label.
pub fn build_series(
    expenses: &[Expense],
    month_window: &[MonthKey],
    categories: &[String],
) -> TrendSeries {
    let categories = unique_columns(categories);
    let mut totals: HashMap<(MonthKey, &str), i64> = HashMap::new();

    for expense in expenses {
        let total = totals
            .entry((expense.month(), expense.category.as_str()))
            .or_insert(0);
        *total = total.saturating_add(expense.amount);
    }

    let rows = month_window
        .iter()
        .map(|&month| TrendRow {
            month,
            label: month.label(),
            amounts: categories
                .iter()
                .map(|category| {
                    let amount = totals
                        .get(&(month, category.as_str()))
                        .copied()
                        .unwrap_or(0);
                    (category.clone(), amount)
                })
                .collect(),
        })
        .collect();

    TrendSeries { categories, rows }
}

fn unique_columns(categories: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(categories.len());

    for category in categories {
        if category == MONTH_LABEL_KEY {
            tracing::warn!(
                "dropping category \"{category}\" from the trend series, the name is reserved"
            );
        } else if !columns.contains(category) {
            columns.push(category.clone());
        }
    }

    columns
}
