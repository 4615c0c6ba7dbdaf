//! Card components for the dashboard.
//!
//! Provides:
//! - The monthly summary card with the budget progress ring
//! - The month-over-month comparison badge
//! - The category breakdown list

use maud::{Markup, html};

use crate::{
    aggregation::MonthlySummary,
    budget::{BudgetProgress, RingGeometry},
    category::{CategoryIcon, ColoredCategory},
    html::{CARD_STYLE, format_signed_percentage, format_yen},
    month::MonthKey,
    view_model::ComparisonView,
};

const RING_RADIUS: f64 = 52.0;
const RING_STROKE_WIDTH: f64 = 12.0;

/// Shown in place of a change that cannot be computed.
pub(crate) const NO_CHANGE_PLACEHOLDER: &str = "—";

/// The glyph drawn for a category icon.
pub(crate) fn icon_glyph(icon: CategoryIcon) -> &'static str {
    match icon {
        CategoryIcon::Food => "🍙",
        CategoryIcon::Household => "🧻",
        CategoryIcon::Transport => "🚃",
        CategoryIcon::Housing => "🏠",
        CategoryIcon::Utilities => "💡",
        CategoryIcon::Communication => "📱",
        CategoryIcon::Entertainment => "🎮",
        CategoryIcon::Medical => "💊",
        CategoryIcon::Clothing => "👕",
        CategoryIcon::Education => "📚",
        CategoryIcon::Other => "📦",
    }
}

/// Renders the total for `month`, the expense count and, if a budget is set,
/// the progress ring.
pub(super) fn summary_card(
    month: MonthKey,
    summary: &MonthlySummary,
    budget: Option<&BudgetProgress>,
    comparison: &ComparisonView,
) -> Markup {
    html! {
        div id="summary-card" class=(CARD_STYLE) {
            div class="flex items-center justify-between gap-6" {
                div {
                    h3 class="text-sm text-gray-600 dark:text-gray-400" {
                        (month.label()) "の支出"
                    }
                    div class="text-3xl font-bold mb-1" data-testid="total" {
                        (format_yen(summary.total))
                    }
                    div class="text-sm text-gray-600 dark:text-gray-400" {
                        (summary.count) "件"
                    }
                    div class="mt-2" {
                        (comparison_badge(comparison))
                    }
                }

                @if let Some(budget) = budget {
                    (progress_ring(budget))
                }
            }
        }
    }
}

/// Renders the change from last month, or a placeholder when no change can be
/// computed.
pub(super) fn comparison_badge(comparison: &ComparisonView) -> Markup {
    let (text, style) = match comparison.change_percent {
        None => (
            NO_CHANGE_PLACEHOLDER.to_owned(),
            "text-gray-600 dark:text-gray-400",
        ),
        Some(change) if change > 0.0 => (
            format_signed_percentage(change),
            "text-red-600 dark:text-red-400",
        ),
        Some(change) => (
            format_signed_percentage(change),
            "text-green-600 dark:text-green-400",
        ),
    };

    html! {
        span
            id="comparison-badge"
            class={"text-sm font-medium " (style)}
            title="前月比"
        {
            "前月比 " (text)
        }
    }
}

/// Renders an SVG ring filled in proportion to the budget spent.
fn progress_ring(budget: &BudgetProgress) -> Markup {
    let used_percent = budget.used_percent();
    let ring = RingGeometry::new(used_percent, RING_RADIUS);
    let size = (RING_RADIUS + RING_STROKE_WIDTH) * 2.0;
    let center = size / 2.0;
    let stroke = if budget.is_over_budget() {
        "#ef4444"
    } else {
        "#3b82f6"
    };

    html! {
        div id="budget-ring" class="flex flex-col items-center" {
            svg
                width=(size)
                height=(size)
                viewBox=(format!("0 0 {size} {size}"))
                role="img"
                aria-label=(format!("予算の{}%を使用", used_percent.round()))
            {
                circle
                    cx=(center)
                    cy=(center)
                    r=(ring.radius)
                    fill="none"
                    stroke="#e5e7eb"
                    stroke-width=(RING_STROKE_WIDTH) {}
                circle
                    class="progress"
                    cx=(center)
                    cy=(center)
                    r=(ring.radius)
                    fill="none"
                    stroke=(stroke)
                    stroke-width=(RING_STROKE_WIDTH)
                    stroke-linecap="round"
                    stroke-dasharray=(format!("{:.2}", ring.circumference))
                    stroke-dashoffset=(format!("{:.2}", ring.dash_offset))
                    transform=(format!("rotate(-90 {center} {center})")) {}
            }
            div class="text-sm mt-1" {
                @if budget.is_over_budget() {
                    span class="text-red-600 dark:text-red-400" {
                        (format_yen(-budget.remaining())) " 超過"
                    }
                } @else {
                    "残り " (format_yen(budget.remaining()))
                }
            }
        }
    }
}

/// Renders the category breakdown, or an empty state if nothing was spent.
pub(super) fn breakdown_view(breakdown: &[ColoredCategory]) -> Markup {
    if breakdown.is_empty() {
        return empty_state_view();
    }

    html! {
        section id="breakdown" class=(CARD_STYLE) {
            h3 class="text-xl font-semibold mb-4" { "カテゴリ別内訳" }

            ul class="space-y-3" {
                @for entry in breakdown {
                    li class="flex items-center gap-3" data-category=(entry.category) {
                        span class="text-xl" aria-hidden="true" { (icon_glyph(entry.icon)) }
                        div class="flex-1" {
                            div class="flex justify-between text-sm" {
                                span class="font-medium" { (entry.category) }
                                span { (format_yen(entry.amount)) }
                            }
                            (share_bar(entry))
                        }
                    }
                }
            }
        }
    }
}

fn share_bar(entry: &ColoredCategory) -> Markup {
    let width = entry.share_percent.clamp(0.0, 100.0);

    html! {
        div class="w-full bg-gray-200 rounded-full h-2 dark:bg-gray-700 mt-1" {
            div
                class="h-2 rounded-full"
                style=(format!("width: {width:.1}%; background-color: {}", entry.color))
            {}
        }
    }
}

/// Renders the empty state when the month has no expenses.
fn empty_state_view() -> Markup {
    html! {
        section id="breakdown" class={(CARD_STYLE) " text-center"} {
            h3 class="text-xl font-semibold mb-2" { "支出がありません" }
            p class="text-gray-600 dark:text-gray-400" {
                "この月の支出はまだ登録されていません。"
            }
        }
    }
}
