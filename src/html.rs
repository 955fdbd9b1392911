//! Shared page layout, styles, and number formatting.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Table header row style.
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

/// Table body row style.
pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

/// Table cell style.
pub const TABLE_CELL_STYLE: &str = "px-4 py-3";

/// Card container style for metric cards and tables.
pub const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

/// Positive amount text style.
pub const AMOUNT_POSITIVE_STYLE: &str = "text-green-600 dark:text-green-400";

/// Negative amount text style.
pub const AMOUNT_NEGATIVE_STYLE: &str = "text-red-600 dark:text-red-400";

/// An element to insert into the page head.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

/// Renders the shared page shell around `content`.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Pharmalytics" }

                script src="https://cdn.tailwindcss.com" {}

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
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

/// Formats an amount as full-precision currency, e.g. `$1,234.50`.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// Formats a plain amount with thousands separators and two decimals,
/// e.g. `1,234.50`, as used by the report table cells.
pub fn format_number(number: f64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    if number == 0.0 {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "0.00".to_owned()
    } else {
        let mut formatted_string = fmt.fmt_string(number);

        // numfmt omits the last trailing zero, so we must add it ourselves
        if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
            formatted_string = format!("{formatted_string}0");
        }

        formatted_string
    }
}

/// Formats a count with thousands separators, e.g. `12,345`.
pub fn format_count(number: i64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    if number == 0 {
        // Zero is hardcoded as "0" without a separator pass.
        "0".to_owned()
    } else {
        fmt.fmt_string(number as f64)
    }
}

/// Formats an amount in compact currency notation: `$1.2M`, `$3.4K`, `$512`.
///
/// The scale is chosen by the absolute value, so negative amounts keep
/// their sign: `-$1.2M`.
pub fn format_currency_compact(number: f64) -> String {
    let magnitude = number.abs();
    let sign = if number < 0.0 { "-" } else { "" };

    if magnitude >= 1_000_000.0 {
        format!("{sign}${:.1}M", magnitude / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{sign}${:.1}K", magnitude / 1_000.0)
    } else {
        format!("{sign}${magnitude:.0}")
    }
}

/// Formats a count in compact notation: `1.2M`, `3.4K`, `512`.
pub fn format_count_compact(number: i64) -> String {
    let magnitude = (number as f64).abs();
    let sign = if number < 0 { "-" } else { "" };

    if magnitude >= 1_000_000.0 {
        format!("{sign}{:.1}M", magnitude / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{sign}{:.1}K", magnitude / 1_000.0)
    } else {
        format!("{sign}{magnitude:.0}")
    }
}

/// Renders a growth-rate cell: an explicitly signed percentage colored by
/// direction, or an em dash for the first row of a series.
pub fn growth_rate_cell(growth_rate: Option<f64>) -> Markup {
    match growth_rate {
        None => html! { span class="text-gray-400" { "—" } },
        Some(rate) => {
            let class = if rate > 0.0 {
                AMOUNT_POSITIVE_STYLE
            } else if rate < 0.0 {
                AMOUNT_NEGATIVE_STYLE
            } else {
                ""
            };
            let sign = if rate > 0.0 { "+" } else { "" };

            html! { span class=(class) { (sign) (format!("{rate:.2}")) "%" } }
        }
    }
}

/// The CSS class for coloring amounts (green for positive, red for
/// negative).
pub fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        AMOUNT_POSITIVE_STYLE
    } else {
        AMOUNT_NEGATIVE_STYLE
    }
}
