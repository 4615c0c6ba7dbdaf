//! The backend collaborator that supplies and stores expenses.
//!
//! View models only depend on the [ExpenseApi] trait. [HttpExpenseApi] talks
//! to the REST backend; tests use an in-memory fake.

mod http;

use std::fmt;

use async_trait::async_trait;

pub use http::{HttpExpenseApi, classify_status, decode_expense, decode_expense_list};

use crate::{
    expense::{Expense, ExpenseId, NewExpense},
    month::MonthKey,
};

/// Filters for listing expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseQuery {
    /// Only list expenses in this month. `None` lists every expense.
    pub month: Option<MonthKey>,
}

impl ExpenseQuery {
    /// List every expense.
    pub fn all() -> Self {
        Self::default()
    }

    /// List the expenses in `month`.
    pub fn for_month(month: MonthKey) -> Self {
        Self { month: Some(month) }
    }
}

/// How a failed request should be reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The session is missing or has expired (HTTP 401).
    Unauthenticated,
    /// The requested resource does not exist (HTTP 404).
    NotFound,
    /// Any other failure, including network errors.
    Generic,
}

/// The errors that may occur when calling the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the request's credentials.
    #[error("the request was not authenticated")]
    Unauthenticated,

    /// The backend could not find the requested resource.
    #[error("the requested resource was not found")]
    NotFound,

    /// The backend answered with an unexpected status code.
    #[error("the backend responded with status {0}")]
    Status(u16),

    /// The request could not be sent or the response could not be read.
    #[error("could not reach the backend: {0}")]
    Network(String),

    /// The response body was not in the expected format.
    #[error("could not decode the response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The category of failure used to choose a user-facing message.
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Unauthenticated => FailureKind::Unauthenticated,
            ApiError::NotFound => FailureKind::NotFound,
            ApiError::Status(_) | ApiError::Network(_) | ApiError::Decode(_) => {
                FailureKind::Generic
            }
        }
    }
}

/// Reads and writes expenses on the backend.
#[async_trait]
pub trait ExpenseApi: Send + Sync + fmt::Debug {
    /// List the expenses matching `query`.
    async fn list_expenses(&self, query: ExpenseQuery) -> Result<Vec<Expense>, ApiError>;

    /// Create an expense and return it as stored by the backend.
    async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, ApiError>;

    /// Replace the expense with `id` and return it as stored by the backend.
    async fn update_expense(&self, id: &ExpenseId, expense: &NewExpense)
    -> Result<Expense, ApiError>;

    /// Delete the expense with `id`.
    async fn delete_expense(&self, id: &ExpenseId) -> Result<(), ApiError>;
}
