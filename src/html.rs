//! The page shell and shared formatting helpers.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

/// The ECharts build loaded on pages with charts.
pub const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

// Card styles
pub(crate) const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

// Page container
pub(crate) const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// Extra elements for a page's `<head>`.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
    /// CSS source code.
    Style(PreEscaped<String>),
}

/// Wrap `content` in a complete HTML document.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ja"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - 家計簿" }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                        HeadElement::Style(text) => style { (text) }
                    }
                }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

/// Format a yen amount with a thousands separator, e.g. "¥3,500".
pub fn format_yen(amount: i64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("¥")
            .expect("¥ is a valid currency prefix")
            .precision(Precision::Decimals(0))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-¥")
            .expect("-¥ is a valid currency prefix")
            .precision(Precision::Decimals(0))
    });

    if amount < 0 {
        negative_fmt.fmt_string(amount.unsigned_abs() as f64)
    } else if amount > 0 {
        positive_fmt.fmt_string(amount as f64)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "¥0".to_owned()
    }
}

/// Format a percentage with a sign and no decimals, avoiding "-0%".
pub fn format_signed_percentage(value: f64) -> String {
    let rounded = value.round();

    if rounded.abs() < 0.5 {
        "±0%".to_owned()
    } else if rounded > 0.0 {
        format!("+{rounded:.0}%")
    } else {
        format!("{rounded:.0}%")
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        html::{base, format_signed_percentage, format_yen},
        test_utils::{assert_valid_html, parse_html_document},
    };

    #[test]
    fn formats_yen() {
        assert_eq!(format_yen(0), "¥0");
        assert_eq!(format_yen(980), "¥980");
        assert_eq!(format_yen(3500), "¥3,500");
        assert_eq!(format_yen(-1200), "-¥1,200");
    }

    #[test]
    fn formats_signed_percentages() {
        assert_eq!(format_signed_percentage(50.0), "+50%");
        assert_eq!(format_signed_percentage(-12.4), "-12%");
        assert_eq!(format_signed_percentage(-0.2), "±0%");
    }

    #[test]
    fn base_is_valid_html() {
        let document = parse_html_document(base("ダッシュボード", &[], &maud::html! { p { "x" } }));

        assert_valid_html(&document);
    }
}
