//! Command line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::{Error, month::MonthKey, timezone::get_local_offset};

/// The environment variable holding the bearer token for the expense API.
pub const ACCESS_TOKEN_ENV_VAR: &str = "KAKEIBO_ACCESS_TOKEN";

const DEFAULT_TREND_MONTHS: usize = 6;
const MAX_TREND_MONTHS: usize = 60;

/// Render a household expense dashboard from the expense API.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Base URL of the expense API, e.g. "https://example.com".
    #[arg(long)]
    pub api_url: String,

    /// The month to show as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    pub month: Option<String>,

    /// How many months to include in the trend chart.
    #[arg(long, default_value_t = DEFAULT_TREND_MONTHS)]
    pub months: usize,

    /// Monthly budget in yen. The progress ring is hidden when not set.
    #[arg(long)]
    pub budget: Option<i64>,

    /// The canonical timezone used to determine the current month.
    #[arg(long, default_value = "Asia/Tokyo")]
    pub timezone: String,

    /// Where to write the rendered dashboard.
    #[arg(long, default_value = "dashboard.html")]
    pub output_path: PathBuf,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Validated application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the expense API, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with each request, if any.
    pub access_token: Option<String>,
    /// The requested month, `None` for the current month.
    pub month: Option<MonthKey>,
    /// Number of months in the trend window, at least 1.
    pub trend_months: usize,
    /// Monthly budget in yen.
    pub budget: Option<i64>,
    /// The canonical timezone name, e.g. "Asia/Tokyo".
    pub timezone: String,
    /// Where to write the rendered dashboard.
    pub output_path: PathBuf,
    /// Default log level.
    pub log_level: String,
}

impl AppConfig {
    /// Validate `args` and combine them with the access token read from the
    /// environment.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if an argument is out of range,
    /// [Error::InvalidMonthKey] if the month cannot be parsed and
    /// [Error::InvalidTimezone] if the timezone is unknown.
    pub fn from_args(args: Args, access_token: Option<String>) -> Result<Self, Error> {
        let api_url = args.api_url.trim().trim_end_matches('/').to_owned();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "API URL must start with http:// or https://, got \"{}\"",
                args.api_url
            )));
        }

        if !(1..=MAX_TREND_MONTHS).contains(&args.months) {
            return Err(Error::InvalidConfig(format!(
                "months must be between 1 and {MAX_TREND_MONTHS}, got {}",
                args.months
            )));
        }

        if let Some(budget) = args.budget.filter(|budget| *budget < 0) {
            return Err(Error::InvalidConfig(format!(
                "budget cannot be negative, got {budget}"
            )));
        }

        if get_local_offset(&args.timezone).is_none() {
            return Err(Error::InvalidTimezone(args.timezone));
        }

        let month = args.month.as_deref().map(MonthKey::parse).transpose()?;
        let access_token = access_token.filter(|token| !token.trim().is_empty());

        Ok(Self {
            api_url,
            access_token,
            month,
            trend_months: args.months,
            budget: args.budget,
            timezone: args.timezone,
            output_path: args.output_path,
            log_level: args.log_level,
        })
    }

    /// Parse the process arguments and read the access token from
    /// [ACCESS_TOKEN_ENV_VAR].
    ///
    /// # Errors
    /// See [AppConfig::from_args].
    pub fn from_env() -> Result<Self, Error> {
        let args = Args::parse();
        let access_token = std::env::var(ACCESS_TOKEN_ENV_VAR).ok();

        Self::from_args(args, access_token)
    }
}
