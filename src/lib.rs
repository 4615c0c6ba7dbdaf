//! Kakeibo is a household expense dashboard.
//!
//! This library turns the expense records served by a REST backend into
//! monthly summaries, month-over-month comparisons and category trends, and
//! renders them as an HTML dashboard.
//!
//! The view models in [view_model] fetch through an [api::ExpenseApi] and
//! report failures as toasts through a [notify::Notifier] instead of returning
//! errors to the presentation layer.

#![warn(missing_docs)]

pub mod aggregation;
pub mod alert;
pub mod api;
pub mod budget;
pub mod category;
pub mod config;
pub mod dashboard;
pub mod dto;
pub mod expense;
pub mod html;
pub mod logging;
pub mod month;
pub mod notify;
pub mod startup;
#[cfg(test)]
mod test_utils;
pub mod timezone;
pub mod trend;
pub mod view_model;

pub use config::AppConfig;
pub use startup::{AppContext, initialize};

/// The errors that may occur while setting up the application.
///
/// Failures talking to the backend are reported as [api::ApiError] and turned
/// into toasts by the view models.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    /// A month was not given as a `YYYY-MM` string.
    #[error("\"{0}\" is not a valid month, expected YYYY-MM")]
    InvalidMonthKey(String),

    /// A timezone name is not a canonical timezone, e.g. "Asia/Tokyo".
    #[error("\"{0}\" is not a valid canonical timezone")]
    InvalidTimezone(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be created.
    #[error("could not create the HTTP client: {0}")]
    HttpClient(String),
}
