//! The expense record and the payload used to create or edit one.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::month::MonthKey;

/// The label used for expenses without a category.
pub const OTHER_CATEGORY: &str = "その他";

/// Identifies an expense on the backend.
///
/// The backend may use numeric or string identifiers, so IDs are kept as
/// opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Create a new expense ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    /// The backend's identifier for the expense.
    pub id: ExpenseId,
    /// The amount spent in whole yen.
    pub amount: i64,
    /// The category label, e.g. "食費".
    pub category: String,
    /// Free text describing the expense.
    pub description: String,
    /// The day the expense happened.
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl Expense {
    /// The month this expense is grouped under.
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// The data sent to the backend to create or replace an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewExpense {
    /// The amount spent in whole yen.
    pub amount: i64,
    /// The category label.
    pub category: String,
    /// Free text describing the expense.
    pub description: String,
    /// The day the expense happened, sent as `YYYY-MM-DD`.
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl NewExpense {
    /// Attach the ID the backend assigned to this expense.
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            amount: self.amount,
            category: self.category,
            description: self.description,
            date: self.date,
        }
    }
}

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::expense::{ExpenseId, NewExpense};

    #[test]
    fn new_expense_serializes_iso_date() {
        let expense = NewExpense {
            amount: 3500,
            category: "食費".to_owned(),
            description: "スーパー".to_owned(),
            date: date!(2024 - 01 - 05),
        };

        let value = serde_json::to_value(&expense).unwrap();

        assert_eq!(
            value,
            json!({
                "amount": 3500,
                "category": "食費",
                "description": "スーパー",
                "date": "2024-01-05",
            })
        );
    }

    #[test]
    fn into_expense_keeps_fields() {
        let expense = NewExpense {
            amount: 1200,
            category: "交通費".to_owned(),
            description: String::new(),
            date: date!(2024 - 02 - 29),
        }
        .into_expense(ExpenseId::new("42"));

        assert_eq!(expense.id.as_str(), "42");
        assert_eq!(expense.amount, 1200);
        assert_eq!(expense.month().to_string(), "2024-02");
    }
}
