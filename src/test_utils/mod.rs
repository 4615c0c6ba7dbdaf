#![allow(missing_docs)]

mod api;
mod html;

use time::Date;

use crate::expense::{Expense, ExpenseId};

pub(crate) use api::{CallbackNotifier, FakeExpenseApi, RecordingNotifier};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};

pub(crate) fn expense(id: &str, amount: i64, category: &str, date: Date) -> Expense {
    Expense {
        id: ExpenseId::new(id),
        amount,
        category: category.to_owned(),
        description: String::new(),
        date,
    }
}
