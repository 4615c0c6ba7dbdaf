//! Mapping from the backend's loosely typed JSON to [Expense] records.
//!
//! Every field of an expense response is optional on the wire. All of the
//! defaulting rules live in [ExpenseDto::into_expense] so that callers only
//! ever see fully formed records.

use serde::Deserialize;
use serde_json::Value;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::expense::{Expense, ExpenseId, OTHER_CATEGORY};

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// The largest amount accepted for a single expense, one trillion yen.
///
/// Sums of accepted amounts stay far below `i64::MAX`.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// An expense as sent by the backend, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseDto {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    amount: Option<Value>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

/// The reason an expense response could not be turned into an [Expense].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DtoError {
    /// The record has no usable ID.
    #[error("expense is missing an ID")]
    MissingId,

    /// The record has no date or the date is not an ISO calendar date.
    #[error("expense {0} has an invalid date {1:?}")]
    InvalidDate(String, Option<String>),

    /// The record has a negative amount.
    #[error("expense {0} has a negative amount {1}")]
    NegativeAmount(String, i64),

    /// The record's amount is larger than [MAX_AMOUNT].
    #[error("expense {0} has an amount {1} larger than the maximum of {MAX_AMOUNT}")]
    AmountOutOfRange(String, String),
}

impl ExpenseDto {
    /// Apply the defaulting rules and produce an [Expense].
    ///
    /// - A missing ID or date, a negative amount or an amount above
    ///   [MAX_AMOUNT] rejects the record.
    /// - A missing or unparseable amount becomes 0. Numeric strings are
    ///   parsed and fractional amounts are rounded to the nearest yen.
    /// - A missing or blank category becomes [OTHER_CATEGORY].
    /// - A missing description becomes the empty string.
    /// - Datetime strings are truncated to their date part.
    ///
    /// # Errors
    /// Returns a [DtoError] describing why the record was rejected.
    pub fn into_expense(self) -> Result<Expense, DtoError> {
        let id = self.id.as_ref().and_then(id_from_value).ok_or(DtoError::MissingId)?;

        let date = self
            .date
            .as_deref()
            .and_then(parse_date)
            .ok_or_else(|| DtoError::InvalidDate(id.clone(), self.date.clone()))?;

        let amount = self
            .amount
            .as_ref()
            .and_then(amount_from_value)
            .unwrap_or(0.0)
            .round();

        if amount < 0.0 {
            return Err(DtoError::NegativeAmount(id, amount as i64));
        }

        if amount > MAX_AMOUNT as f64 {
            let raw = self.amount.map(|value| value.to_string()).unwrap_or_default();
            return Err(DtoError::AmountOutOfRange(id, raw));
        }

        let amount = amount as i64;

        let category = match self.category {
            Some(category) if !category.trim().is_empty() => category.trim().to_owned(),
            _ => OTHER_CATEGORY.to_owned(),
        };

        Ok(Expense {
            id: ExpenseId::new(id),
            amount,
            category,
            description: self.description.unwrap_or_default(),
            date,
        })
    }
}

/// A list response: either a bare array or a page wrapping the array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ExpenseListDto {
    /// A bare JSON array of expenses.
    List(Vec<ExpenseDto>),
    /// A page of expenses, e.g. `{"items": [...], "total": 10}`.
    Page {
        /// The expenses on this page.
        #[serde(alias = "expenses")]
        items: Vec<ExpenseDto>,
    },
}

impl ExpenseListDto {
    /// Convert every usable record, skipping (and logging) the rest.
    pub fn into_expenses(self) -> Vec<Expense> {
        let items = match self {
            ExpenseListDto::List(items) => items,
            ExpenseListDto::Page { items } => items,
        };

        items
            .into_iter()
            .filter_map(|dto| {
                dto.into_expense()
                    .inspect_err(|error| tracing::warn!("skipping expense from backend: {error}"))
                    .ok()
            })
            .collect()
    }
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// The amount as a float, `None` if it is not a finite number.
fn amount_from_value(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };

    amount.filter(|amount| amount.is_finite())
}

fn parse_date(text: &str) -> Option<Date> {
    let date_part = text.get(..10)?;
    Date::parse(date_part, ISO_DATE).ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        aggregation::aggregate,
        dto::{DtoError, ExpenseDto, ExpenseListDto, MAX_AMOUNT},
        expense::OTHER_CATEGORY,
        month::MonthKey,
    };

    fn dto(value: serde_json::Value) -> ExpenseDto {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn maps_complete_record() {
        let expense = dto(json!({
            "id": 7,
            "amount": 3500,
            "category": "食費",
            "description": "スーパー",
            "date": "2024-01-15",
        }))
        .into_expense()
        .unwrap();

        assert_eq!(expense.id.as_str(), "7");
        assert_eq!(expense.amount, 3500);
        assert_eq!(expense.category, "食費");
        assert_eq!(expense.description, "スーパー");
        assert_eq!(expense.date, date!(2024 - 01 - 15));
    }

    #[test]
    fn applies_defaults_for_missing_fields() {
        let expense = dto(json!({"id": "abc", "date": "2024-01-15"}))
            .into_expense()
            .unwrap();

        assert_eq!(expense.amount, 0);
        assert_eq!(expense.category, OTHER_CATEGORY);
        assert_eq!(expense.description, "");
    }

    #[test]
    fn blank_category_becomes_other() {
        let expense = dto(json!({"id": 1, "category": "  ", "date": "2024-01-15"}))
            .into_expense()
            .unwrap();

        assert_eq!(expense.category, OTHER_CATEGORY);
    }

    #[test]
    fn parses_string_and_fractional_amounts() {
        let from_string = dto(json!({"id": 1, "amount": "1,200", "date": "2024-01-15"}))
            .into_expense()
            .unwrap();
        let fractional = dto(json!({"id": 2, "amount": 99.6, "date": "2024-01-15"}))
            .into_expense()
            .unwrap();
        let garbage = dto(json!({"id": 3, "amount": "abc", "date": "2024-01-15"}))
            .into_expense()
            .unwrap();

        assert_eq!(from_string.amount, 1200);
        assert_eq!(fractional.amount, 100);
        assert_eq!(garbage.amount, 0);
    }

    #[test]
    fn truncates_datetimes() {
        let expense = dto(json!({"id": 1, "date": "2024-03-01T09:30:00Z"}))
            .into_expense()
            .unwrap();

        assert_eq!(expense.date, date!(2024 - 03 - 01));
    }

    #[test]
    fn rejects_records_without_id_or_date() {
        assert_eq!(
            dto(json!({"date": "2024-01-15"})).into_expense(),
            Err(DtoError::MissingId)
        );
        assert_eq!(
            dto(json!({"id": 1})).into_expense(),
            Err(DtoError::InvalidDate("1".to_owned(), None))
        );
        assert_eq!(
            dto(json!({"id": 1, "date": "15/01/2024"})).into_expense(),
            Err(DtoError::InvalidDate(
                "1".to_owned(),
                Some("15/01/2024".to_owned())
            ))
        );
    }

    #[test]
    fn rejects_negative_amounts() {
        assert_eq!(
            dto(json!({"id": 1, "amount": -5, "date": "2024-01-15"})).into_expense(),
            Err(DtoError::NegativeAmount("1".to_owned(), -5))
        );
    }

    #[test]
    fn rejects_amounts_above_maximum() {
        assert!(matches!(
            dto(json!({"id": 1, "amount": 1e19, "date": "2024-01-15"})).into_expense(),
            Err(DtoError::AmountOutOfRange(id, _)) if id == "1"
        ));
        assert!(matches!(
            dto(json!({"id": 2, "amount": "9999999999999999999", "date": "2024-01-15"}))
                .into_expense(),
            Err(DtoError::AmountOutOfRange(id, _)) if id == "2"
        ));

        let largest = dto(json!({"id": 3, "amount": MAX_AMOUNT, "date": "2024-01-15"}))
            .into_expense()
            .unwrap();
        assert_eq!(largest.amount, MAX_AMOUNT);
    }

    #[test]
    fn huge_amounts_are_skipped_before_aggregation() {
        let list: ExpenseListDto = serde_json::from_value(json!([
            {"id": 1, "amount": 1e19, "date": "2024-01-15"},
            {"id": 2, "amount": "9999999999999999999", "date": "2024-01-16"},
            {"id": 3, "amount": 500, "date": "2024-01-17"},
        ]))
        .unwrap();

        let expenses = list.into_expenses();
        let summary = aggregate(&expenses, "2024-01".parse::<MonthKey>().unwrap());

        assert_eq!(expenses.len(), 1);
        assert_eq!(summary.total, 500);
    }

    #[test]
    fn accepts_bare_lists_and_pages() {
        let record = json!({"id": 1, "amount": 100, "date": "2024-01-15"});

        let list: ExpenseListDto = serde_json::from_value(json!([record.clone()])).unwrap();
        let page: ExpenseListDto =
            serde_json::from_value(json!({"items": [record.clone()], "total": 1})).unwrap();
        let aliased: ExpenseListDto =
            serde_json::from_value(json!({"expenses": [record]})).unwrap();

        assert_eq!(list.into_expenses().len(), 1);
        assert_eq!(page.into_expenses().len(), 1);
        assert_eq!(aliased.into_expenses().len(), 1);
    }

    #[test]
    fn skips_unusable_records_in_lists() {
        let list: ExpenseListDto = serde_json::from_value(json!([
            {"id": 1, "amount": 100, "date": "2024-01-15"},
            {"amount": 100, "date": "2024-01-15"},
        ]))
        .unwrap();

        let expenses = list.into_expenses();

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id.as_str(), "1");
    }
}
