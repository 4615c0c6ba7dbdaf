//! Expense aggregation for monthly summaries.
//!
//! Provides functions to summarise a month of expenses, total expenses per
//! month and list the categories seen in a set of expenses.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::{expense::Expense, month::MonthKey};

/// The amount spent in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAmount {
    /// The category label.
    pub category: String,
    /// The summed amount for the category.
    pub amount: i64,
}

impl CategoryAmount {
    /// Create a new category amount.
    pub fn new(category: impl Into<String>, amount: i64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// Totals for a single month.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MonthlySummary {
    /// The sum of all expense amounts in the month.
    pub total: i64,
    /// The number of expenses in the month.
    pub count: usize,
    /// Per-category totals, largest first.
    pub by_category: Vec<CategoryAmount>,
}

impl MonthlySummary {
    /// The summary of a month with no expenses.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Summarise the expenses that fall in `target_month`.
///
/// Categories are sorted by descending amount. Categories with equal amounts
/// keep the order in which they first appear in `expenses`. Sums saturate at
/// `i64::MAX`.
///
/// # Returns
/// [MonthlySummary::empty] if no expense falls in `target_month`.
pub fn aggregate(expenses: &[Expense], target_month: MonthKey) -> MonthlySummary {
    let mut total: i64 = 0;
    let mut count = 0;
    let mut by_category: Vec<CategoryAmount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for expense in expenses.iter().filter(|e| e.month() == target_month) {
        total = total.saturating_add(expense.amount);
        count += 1;

        match positions.get(expense.category.as_str()) {
            Some(&position) => {
                let entry = &mut by_category[position];
                entry.amount = entry.amount.saturating_add(expense.amount);
            }
            None => {
                positions.insert(expense.category.as_str(), by_category.len());
                by_category.push(CategoryAmount::new(&expense.category, expense.amount));
            }
        }
    }

    // `sort_by` is stable, which keeps first-seen order for ties.
    by_category.sort_by(|a, b| b.amount.cmp(&a.amount));

    MonthlySummary {
        total,
        count,
        by_category,
    }
}

/// Sums expense amounts by month, saturating at `i64::MAX`.
pub fn totals_by_month(expenses: &[Expense]) -> BTreeMap<MonthKey, i64> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        let total: &mut i64 = totals.entry(expense.month()).or_insert(0);
        *total = total.saturating_add(expense.amount);
    }

    totals
}

/// The distinct categories in `expenses`, in the order they first appear.
pub fn distinct_categories(expenses: &[Expense]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();

    for expense in expenses {
        if !categories.contains(&expense.category) {
            categories.push(expense.category.clone());
        }
    }

    categories
}
