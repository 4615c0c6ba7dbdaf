//! Display colours and icons for expense categories.
//!
//! Categories come from a fixed set, but the backend may send labels this
//! client does not know about. Known categories always get the same colour.
//! Unknown categories are coloured from [PALETTE] by an index the caller
//! supplies, usually through a [CategoryPalette] shared by everything drawn on
//! one page.

use serde::Serialize;

use crate::aggregation::MonthlySummary;

/// Identifies the icon shown next to a category.
///
/// The data layer only deals in these identifiers. The dashboard resolves
/// them to something renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryIcon {
    /// Groceries and eating out.
    Food,
    /// Household consumables.
    Household,
    /// Trains, buses, fuel.
    Transport,
    /// Rent or mortgage.
    Housing,
    /// Water, gas, electricity.
    Utilities,
    /// Phone and internet.
    Communication,
    /// Hobbies and entertainment.
    Entertainment,
    /// Doctors and medicine.
    Medical,
    /// Clothing.
    Clothing,
    /// Education and books.
    Education,
    /// Anything else.
    Other,
}

struct KnownCategory {
    label: &'static str,
    color: &'static str,
    icon: CategoryIcon,
}

const KNOWN_CATEGORIES: [KnownCategory; 11] = [
    KnownCategory {
        label: "食費",
        color: "#f97316",
        icon: CategoryIcon::Food,
    },
    KnownCategory {
        label: "日用品",
        color: "#84cc16",
        icon: CategoryIcon::Household,
    },
    KnownCategory {
        label: "交通費",
        color: "#3b82f6",
        icon: CategoryIcon::Transport,
    },
    KnownCategory {
        label: "住居費",
        color: "#8b5cf6",
        icon: CategoryIcon::Housing,
    },
    KnownCategory {
        label: "水道光熱費",
        color: "#06b6d4",
        icon: CategoryIcon::Utilities,
    },
    KnownCategory {
        label: "通信費",
        color: "#6366f1",
        icon: CategoryIcon::Communication,
    },
    KnownCategory {
        label: "娯楽",
        color: "#ec4899",
        icon: CategoryIcon::Entertainment,
    },
    KnownCategory {
        label: "医療費",
        color: "#ef4444",
        icon: CategoryIcon::Medical,
    },
    KnownCategory {
        label: "衣服",
        color: "#eab308",
        icon: CategoryIcon::Clothing,
    },
    KnownCategory {
        label: "教育",
        color: "#14b8a6",
        icon: CategoryIcon::Education,
    },
    KnownCategory {
        label: "その他",
        color: "#9ca3af",
        icon: CategoryIcon::Other,
    },
];

/// Colours cycled through for categories that are not in the known set.
pub const PALETTE: [&str; 8] = [
    "#0ea5e9", "#a855f7", "#22c55e", "#f43f5e", "#f59e0b", "#10b981", "#64748b", "#d946ef",
];

fn find_known(category: &str) -> Option<&'static KnownCategory> {
    KNOWN_CATEGORIES.iter().find(|known| known.label == category)
}

/// The display colour for `category`.
///
/// Known categories always map to their assigned colour. Unknown categories
/// use `fallback_index` (0 if `None`) modulo the palette size, so callers that
/// need stable colours should pass a consistent index such as the category's
/// position in a sorted list.
pub fn color_for(category: &str, fallback_index: Option<usize>) -> &'static str {
    match find_known(category) {
        Some(known) => known.color,
        None => PALETTE[fallback_index.unwrap_or(0) % PALETTE.len()],
    }
}

/// The icon for `category`, [CategoryIcon::Other] for unknown categories.
pub fn icon_for(category: &str) -> CategoryIcon {
    find_known(category)
        .map(|known| known.icon)
        .unwrap_or(CategoryIcon::Other)
}

/// Fixes the fallback index of every category drawn on a page, so an unknown
/// category has the same colour in every chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPalette {
    order: Vec<String>,
}

impl CategoryPalette {
    /// Index categories in the order they first appear in `categories`.
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        let mut palette = Self::default();
        palette.extend(categories);
        palette
    }

    /// Index any of `categories` not seen yet after the existing ones.
    pub fn extend<'a>(&mut self, categories: impl IntoIterator<Item = &'a str>) {
        for category in categories {
            if !self.order.iter().any(|existing| existing == category) {
                self.order.push(category.to_owned());
            }
        }
    }

    /// The fallback index of `category`. Categories the palette has not seen
    /// come after all the ones it has.
    pub fn index_of(&self, category: &str) -> usize {
        self.order
            .iter()
            .position(|existing| existing == category)
            .unwrap_or(self.order.len())
    }

    /// The display colour for `category`.
    pub fn color(&self, category: &str) -> &'static str {
        color_for(category, Some(self.index_of(category)))
    }
}

/// One line of a colour-coded category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColoredCategory {
    /// The category label.
    pub category: String,
    /// The amount spent in the category.
    pub amount: i64,
    /// The colour used to draw the category.
    pub color: &'static str,
    /// The icon shown next to the category.
    pub icon: CategoryIcon,
    /// The category's share of the month's total, from 0 to 100.
    pub share_percent: f64,
}

/// Decorate a summary's category breakdown with colours, icons and shares.
///
/// The position in the (already sorted) breakdown is used as the fallback
/// colour index for unknown categories.
pub fn colored_breakdown(summary: &MonthlySummary) -> Vec<ColoredCategory> {
    let palette = CategoryPalette::new(
        summary
            .by_category
            .iter()
            .map(|entry| entry.category.as_str()),
    );
    colored_breakdown_with(summary, &palette)
}

/// Like [colored_breakdown], but colours unknown categories with `palette`.
pub fn colored_breakdown_with(
    summary: &MonthlySummary,
    palette: &CategoryPalette,
) -> Vec<ColoredCategory> {
    summary
        .by_category
        .iter()
        .map(|entry| ColoredCategory {
            category: entry.category.clone(),
            amount: entry.amount,
            color: palette.color(&entry.category),
            icon: icon_for(&entry.category),
            share_percent: if summary.total > 0 {
                entry.amount as f64 / summary.total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}
