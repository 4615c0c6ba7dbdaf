use std::{error::Error, sync::Arc};

use kakeibo::{
    AppConfig,
    api::ExpenseQuery,
    dashboard::{DashboardView, dashboard_page},
    initialize,
    month::MonthKey,
    view_model::{ExpenseListModel, MonthComparison, TrendModel},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    let mut context = initialize(&config)?;
    let month = context.month;

    let expenses = ExpenseListModel::new(
        Arc::clone(&context.api),
        Arc::clone(&context.notifier),
        ExpenseQuery::all(),
    );
    let comparison = MonthComparison::new(Arc::clone(&context.api), Arc::clone(&context.notifier));

    tokio::join!(expenses.fetch(), comparison.sync(month, 0));

    let window = MonthKey::window(month, config.trend_months);
    let mut trend_model = TrendModel::new();
    let trend = trend_model
        .derive_from(&expenses.state(), &window, None)
        .ready()
        .cloned()
        .unwrap_or_default();
    let summary = comparison.current().ready().cloned().unwrap_or_default();

    let view = DashboardView::new(
        month,
        summary,
        comparison.view(),
        trend,
        config.budget,
        context.drain_toasts(),
    );

    tokio::fs::write(&config.output_path, dashboard_page(&view).into_string())
        .await
        .inspect_err(|error| {
            tracing::error!(
                "could not write the dashboard to {}: {error}",
                config.output_path.display()
            )
        })?;

    tracing::info!("Wrote the dashboard for {month} to {}", config.output_path.display());

    Ok(())
}
