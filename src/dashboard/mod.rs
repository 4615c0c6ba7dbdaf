//! Dashboard module
//!
//! Renders an overview page for a month: the monthly total with budget
//! progress, the change from last month, the category breakdown and charts.

mod cards;
mod charts;

pub use charts::{DashboardChart, category_chart, trend_chart};

use maud::{Markup, html};

use crate::{
    aggregation::MonthlySummary,
    alert::toasts_view,
    budget::BudgetProgress,
    category::{CategoryPalette, ColoredCategory, colored_breakdown_with},
    dashboard::{
        cards::{breakdown_view, summary_card},
        charts::{charts_script, charts_view},
    },
    html::{ECHARTS_SCRIPT_URL, HeadElement, PAGE_CONTAINER_STYLE, base},
    month::MonthKey,
    notify::Toast,
    trend::TrendSeries,
    view_model::ComparisonView,
};

/// Everything needed to render the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// The month the dashboard describes.
    pub month: MonthKey,
    /// The month's totals.
    pub summary: MonthlySummary,
    /// The change from the month before.
    pub comparison: ComparisonView,
    /// The month's categories with colours and icons.
    pub breakdown: Vec<ColoredCategory>,
    /// The colours shared by both charts.
    pub palette: CategoryPalette,
    /// Spending per category over the trend window.
    pub trend: TrendSeries,
    /// Progress against the monthly budget, if one is set.
    pub budget: Option<BudgetProgress>,
    /// Toasts raised while loading the data.
    pub toasts: Vec<Toast>,
}

impl DashboardView {
    /// Assemble the view for `month` from its summary and the trend series.
    ///
    /// The breakdown is derived from `summary`. Unknown categories are
    /// coloured by their position in the trend series, then in the breakdown,
    /// so both charts agree. Budget progress is only included when `budget` is
    /// given.
    pub fn new(
        month: MonthKey,
        summary: MonthlySummary,
        comparison: ComparisonView,
        trend: TrendSeries,
        budget: Option<i64>,
        toasts: Vec<Toast>,
    ) -> Self {
        let mut palette = CategoryPalette::new(trend.categories.iter().map(String::as_str));
        palette.extend(
            summary
                .by_category
                .iter()
                .map(|entry| entry.category.as_str()),
        );
        let breakdown = colored_breakdown_with(&summary, &palette);
        let budget = budget.map(|budget| BudgetProgress::new(summary.total, budget));

        Self {
            month,
            summary,
            comparison,
            breakdown,
            palette,
            trend,
            budget,
            toasts,
        }
    }
}

fn build_dashboard_charts(view: &DashboardView) -> Vec<DashboardChart> {
    let mut charts = Vec::with_capacity(2);

    if !view.trend.rows.is_empty() {
        charts.push(DashboardChart {
            id: "trend-chart",
            options: trend_chart(&view.trend, &view.palette).to_string(),
        });
    }

    if !view.breakdown.is_empty() {
        charts.push(DashboardChart {
            id: "category-chart",
            options: category_chart(&view.breakdown).to_string(),
        });
    }

    charts
}

/// Renders the complete dashboard page.
pub fn dashboard_page(view: &DashboardView) -> Markup {
    let charts = build_dashboard_charts(view);

    let content = html!(
        div
            id="dashboard-content"
            class={(PAGE_CONTAINER_STYLE) " max-w-screen-xl"}
        {
            (toasts_view(&view.toasts))

            h2 class="text-2xl font-bold mb-4" { (view.month.label()) }

            div class="grid grid-cols-1 lg:grid-cols-2 gap-4 w-full mb-4"
            {
                (summary_card(view.month, &view.summary, view.budget.as_ref(), &view.comparison))
                (breakdown_view(&view.breakdown))
            }

            (charts_view(&charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&charts),
    ];

    base("ダッシュボード", &scripts, &content)
}
