//! One-time application setup.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    Error,
    api::{ExpenseApi, HttpExpenseApi},
    config::{ACCESS_TOKEN_ENV_VAR, AppConfig},
    logging,
    month::MonthKey,
    notify::{ChannelNotifier, Notifier, Toast},
    timezone::current_month,
};

/// The shared collaborators the view models are built from.
#[derive(Debug)]
pub struct AppContext {
    /// The expense API client.
    pub api: Arc<dyn ExpenseApi>,
    /// Where view models send toasts.
    pub notifier: Arc<dyn Notifier>,
    /// The month to show, the current month unless one was requested.
    pub month: MonthKey,
    toasts: UnboundedReceiver<Toast>,
}

impl AppContext {
    /// Assemble a context from its parts.
    pub fn new(
        api: Arc<dyn ExpenseApi>,
        notifier: Arc<dyn Notifier>,
        toasts: UnboundedReceiver<Toast>,
        month: MonthKey,
    ) -> Self {
        Self {
            api,
            notifier,
            month,
            toasts,
        }
    }

    /// Take every toast raised so far, oldest first.
    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        let mut toasts = Vec::new();

        while let Ok(toast) = self.toasts.try_recv() {
            toasts.push(toast);
        }

        toasts
    }
}

/// Install logging, build the API client and the toast channel, and resolve
/// the month to show.
///
/// # Errors
/// Returns [Error::HttpClient] if the HTTP client cannot be built and
/// [Error::InvalidTimezone] if the current month cannot be resolved.
pub fn initialize(config: &AppConfig) -> Result<AppContext, Error> {
    logging::init(&config.log_level);

    let month = match config.month {
        Some(month) => month,
        None => current_month(&config.timezone)
            .inspect_err(|error| tracing::error!("could not resolve the current month: {error}"))?,
    };

    let api = HttpExpenseApi::new(&config.api_url, config.access_token.clone())
        .inspect_err(|error| tracing::error!("could not create the API client: {error}"))?;
    let (notifier, toasts) = ChannelNotifier::new();

    if config.access_token.is_none() {
        tracing::warn!("{ACCESS_TOKEN_ENV_VAR} is not set, requests will not be authenticated");
    }

    tracing::info!("Showing {month} using the API at {}", config.api_url);

    Ok(AppContext::new(
        Arc::new(api),
        Arc::new(notifier),
        toasts,
        month,
    ))
}
