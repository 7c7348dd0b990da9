//! Page shell, shared Tailwind class lists and small markup helpers.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::endpoints;

pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 rounded text-white \
    bg-blue-600 hover:enabled:bg-blue-700 disabled:bg-blue-800";

pub const BUTTON_SECONDARY_STYLE: &str = "w-full px-4 py-2 rounded text-sm \
    text-gray-900 dark:text-gray-200 bg-white dark:bg-gray-800 border \
    border-gray-300 dark:border-gray-600 hover:bg-gray-100 dark:hover:bg-gray-700";

pub const LINK_STYLE: &str = "underline text-blue-600 dark:text-blue-400 hover:text-blue-500";

pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center w-full max-w-md mx-auto \
    px-6 py-8 text-gray-900 dark:text-white";

pub const FORM_LABEL_STYLE: &str = "block mb-1 text-sm font-medium";

pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2 rounded text-sm \
    text-gray-900 dark:text-white bg-gray-50 dark:bg-gray-700 border \
    border-gray-300 dark:border-gray-600 disabled:text-gray-500 \
    focus:border-blue-600 focus:ring-blue-600";

pub const TABLE_HEADER_STYLE: &str = "text-xs uppercase text-gray-700 dark:text-gray-300 \
    bg-gray-100 dark:bg-gray-700";

pub const TABLE_ROW_STYLE: &str = "border-b bg-white dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-4 py-3";

pub const PAGE_CONTAINER_STYLE: &str = "flex flex-col items-center mx-auto px-6 py-8 \
    text-gray-900 dark:text-white";

/// Scripts every page loads: Tailwind, htmx and the htmx extension that
/// routes error responses to `hx-target-error`.
const PAGE_SCRIPTS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4",
    "https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js",
    "https://cdn.jsdelivr.net/npm/htmx-ext-response-targets@2.0.4/response-targets.js",
];

/// Hides request indicators until htmx marks their request as in flight.
const INDICATOR_CSS: &str = ".htmx-indicator { display: none; } \
    .htmx-request .htmx-indicator, .htmx-request.htmx-indicator { display: inline; }";

/// Extra `<head>` content for a single page.
pub enum HeadElement {
    /// A script loaded from a URL.
    ScriptLink(String),
    /// Inline JavaScript.
    ScriptSource(PreEscaped<String>),
}

impl HeadElement {
    fn into_markup(&self) -> Markup {
        match self {
            HeadElement::ScriptLink(url) => html! { script src=(url) {} },
            HeadElement::ScriptSource(source) => html! { script { (source) } },
        }
    }
}

/// Wrap `content` in a full HTML document titled "`title` - Purchase Tracker".
///
/// Every page gets an empty `#alert-container` that endpoints target with
/// error fragments.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Purchase Tracker" }

                @for url in PAGE_SCRIPTS {
                    script src=(url) {}
                }
                style { (PreEscaped(INDICATOR_CSS)) }

                @for element in head_elements {
                    (element.into_markup())
                }
            }

            body hx-ext="response-targets" class="min-h-screen bg-gray-50 dark:bg-gray-900" {
                (content)

                div
                    id="alert-container"
                    class="fixed bottom-4 left-1/2 -translate-x-1/2 z-50 w-full max-w-md px-4"
                {}
            }
        }
    }
}

/// A full page for an HTTP error, e.g. `code` "404".
pub fn error_view(title: &str, code: &str, message: &str, hint: &str) -> Markup {
    let content = html! {
        main class="max-w-screen-sm mx-auto px-4 py-16 text-center text-gray-900 dark:text-white" {
            h1 class="mb-4 text-7xl font-extrabold text-blue-600 dark:text-blue-400" { (code) }
            p class="mb-4 text-3xl font-bold" { (message) }
            p class="mb-8 text-xl" { (hint) }
            (link(endpoints::PURCHASES_VIEW, "Back to purchases"))
        }
    };

    base(title, &[], &content)
}

/// A titled card centred on the page.
pub fn card(heading: &str, body: &Markup) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto" {
            p class="mb-6 text-2xl font-semibold text-gray-900 dark:text-white" { "Purchase Tracker" }

            div class="w-full sm:max-w-md p-6 space-y-4 rounded-lg shadow bg-white dark:bg-gray-800" {
                h1 class="text-xl font-bold text-gray-900 dark:text-white" { (heading) }
                (body)
            }
        }
    }
}

pub fn password_input(password: &str, error_message: Option<&str>) -> Markup {
    html! {
        div {
            label for="password" class=(FORM_LABEL_STYLE) { "Password" }
            input
                type="password"
                name="password"
                id="password"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus
                value=(password);

            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

/// A spinning ring shown inside a button while its request is in flight.
pub fn loading_spinner() -> Markup {
    html! {
        span
            role="status"
            aria-label="Loading"
            class="inline-block w-4 h-4 me-2 align-middle rounded-full border-2 \
                border-white border-t-transparent animate-spin"
        {}
    }
}

/// A number input with a "$" shown in front of the value.
pub fn dollar_input(name: &str, value: &str) -> Markup {
    html! {
        div class="flex w-full" {
            span class="px-3 py-2 rounded-l text-sm text-gray-700 dark:text-gray-300 \
                bg-gray-200 dark:bg-gray-600 border border-r-0 border-gray-300 dark:border-gray-600"
            { "$" }
            input
                name=(name)
                id=(name)
                type="number"
                step="0.01"
                min="0"
                required
                value=(value)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// Round `price` to cents, halves away from zero.
fn to_cents(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format `price` with exactly two decimal places and no symbol, e.g. "12.30".
pub fn format_price(price: Decimal) -> String {
    format!("{:.2}", to_cents(price))
}

/// Format `amount` as dollars with thousands separators, e.g. "$1,234.50".
pub fn format_currency(amount: Decimal) -> String {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    let cents = to_cents(amount);
    let formatter = FORMATTER.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let (Some(formatter), Some(number)) = (formatter, cents.abs().to_f64()) else {
        return format!("${cents:.2}");
    };

    // numfmt writes zero as "0" and drops trailing zeros of the cents.
    let mut formatted = if cents.is_zero() {
        "$0".to_owned()
    } else {
        formatter.fmt_string(number)
    };
    match formatted.find('.') {
        None => formatted.push_str(".00"),
        Some(point) if formatted.len() - point == 2 => formatted.push('0'),
        Some(_) => {}
    }

    if cents < Decimal::ZERO {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// A link styled for use inside running text.
pub fn link(url: &str, text: &str) -> Markup {
    html! {
        a href=(url) class=(LINK_STYLE) { (text) }
    }
}
