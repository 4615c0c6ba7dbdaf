//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations for expense data:
//! - **Monthly Trend Chart**: Stacked bar chart of spending per category per month
//! - **Category Chart**: Donut chart of the selected month's category breakdown
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, Emphasis, EmphasisFocus,
        JsFunction, Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    category::{CategoryPalette, ColoredCategory},
    html::HeadElement,
    trend::TrendSeries,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A stacked bar chart with one bar per month and one stack segment per
/// category, coloured with `palette`.
pub fn trend_chart(series: &TrendSeries, palette: &CategoryPalette) -> Chart {
    let colors: Vec<Color> = series
        .categories
        .iter()
        .map(|category| Color::from(palette.color(category)))
        .collect();

    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("月別支出")
                .subtext("カテゴリ別")
                .left(20)
                .top("1%"),
        )
        .color(colors)
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(200).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(series.labels()))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for category in &series.categories {
        let data: Vec<f64> = series
            .column(category)
            .into_iter()
            .map(|amount| amount as f64)
            .collect();

        chart = chart.series(
            bar::Bar::new()
                .name(category.as_str())
                .stack("支出")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    chart
}

/// A donut chart of a month's spending per category.
pub fn category_chart(breakdown: &[ColoredCategory]) -> Chart {
    let colors: Vec<Color> = breakdown
        .iter()
        .map(|entry| Color::from(entry.color))
        .collect();

    let data: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|entry| (entry.amount as f64, entry.category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("カテゴリ別支出").left(20).top("1%"))
        .color(colors)
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("支出")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('ja-JP', {
              style: 'currency',
              currency: 'JPY'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::{
        aggregation::{aggregate, distinct_categories},
        category::{CategoryPalette, colored_breakdown},
        dashboard::charts::{
            DashboardChart, category_chart, charts_script, charts_view, trend_chart,
        },
        html::HeadElement,
        month::MonthKey,
        test_utils::{assert_valid_html, expense, parse_html_fragment},
        trend::build_series,
    };

    #[test]
    fn trend_chart_has_one_series_per_category() {
        let expenses = vec![
            expense("1", 3500, "食費", date!(2024 - 01 - 15)),
            expense("2", 2000, "交通費", date!(2024 - 02 - 20)),
        ];
        let window = MonthKey::window(MonthKey::new(2024, Month::February), 2);
        let series = build_series(&expenses, &window, &distinct_categories(&expenses));

        let options: serde_json::Value =
            serde_json::from_str(&trend_chart(&series, &CategoryPalette::default()).to_string())
                .unwrap();

        let chart_series = options["series"].as_array().unwrap();
        assert_eq!(chart_series.len(), 2);
        assert_eq!(chart_series[0]["name"], "食費");
        assert!(options.to_string().contains("2024年2月"));
    }

    #[test]
    fn trend_colors_follow_palette_order() {
        let expenses = vec![
            expense("1", 3500, "ペット", date!(2024 - 01 - 15)),
            expense("2", 2000, "趣味", date!(2024 - 01 - 20)),
        ];
        let window = MonthKey::window(MonthKey::new(2024, Month::January), 1);
        let series = build_series(&expenses, &window, &distinct_categories(&expenses));
        let palette = CategoryPalette::new(["趣味", "ペット"]);

        let options: serde_json::Value =
            serde_json::from_str(&trend_chart(&series, &palette).to_string()).unwrap();

        assert_eq!(options["color"][0], palette.color("ペット"));
        assert_eq!(options["color"][1], palette.color("趣味"));
    }

    #[test]
    fn category_chart_contains_breakdown() {
        let expenses = vec![
            expense("1", 3500, "食費", date!(2024 - 01 - 15)),
            expense("2", 2000, "交通費", date!(2024 - 01 - 20)),
        ];
        let breakdown = colored_breakdown(&aggregate(&expenses, MonthKey::new(2024, Month::January)));

        let options = category_chart(&breakdown).to_string();

        assert!(options.contains("食費"));
        assert!(options.contains("#f97316"));
    }

    #[test]
    fn charts_view_renders_containers() {
        let charts = [DashboardChart {
            id: "trend-chart",
            options: "{}".to_owned(),
        }];

        let html = parse_html_fragment(charts_view(&charts));

        assert_valid_html(&html);
        let selector = scraper::Selector::parse("#trend-chart").unwrap();
        assert_eq!(html.select(&selector).count(), 1);
    }

    #[test]
    fn charts_script_initialises_each_chart() {
        let charts = [
            DashboardChart {
                id: "trend-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "category-chart",
                options: "{}".to_owned(),
            },
        ];

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("expected an inline script");
        };

        assert!(script.0.contains("document.getElementById(\"trend-chart\")"));
        assert!(script.0.contains("document.getElementById(\"category-chart\")"));
    }
}
