//! Summary page handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    auth::Session,
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, format_currency, link},
    navigation::NavBar,
    purchase::RecordStore,
    summary::{
        aggregation::{Summary, purchases_over_time, summarize},
        charts::{ECHARTS_URL, SummaryChart, chart_script, chart_view, purchases_over_time_chart},
    },
};

const NO_DATA_MESSAGE: &str = "No data to display.";

/// The state needed for displaying the summary page.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The store holding every purchase.
    pub record_store: Arc<Mutex<RecordStore>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            record_store: state.record_store.clone(),
        }
    }
}

/// Display the summary figures and the purchases over time chart.
///
/// Only reachable through the summary guard, which supplies `session`.
pub async fn get_summary_page(
    State(state): State<SummaryState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    let records = {
        let store = state
            .record_store
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire record store lock: {error}"))
            .map_err(|_| Error::LockError)?;

        store
            .load_all()
            .inspect_err(|error| tracing::error!("Failed to load purchases for summary: {error}"))?
    };
    tracing::debug!(
        "Summarizing {} purchases for session expiring at {}",
        records.len(),
        session.expires_at
    );

    let summary = summarize(&records);
    let chart = SummaryChart {
        id: "purchases-over-time-chart",
        options: purchases_over_time_chart(&purchases_over_time(&records)).to_string(),
    };

    Ok(summary_view(&summary, &chart).into_response())
}

fn summary_view(summary: &Summary, chart: &SummaryChart) -> Markup {
    let nav_bar = NavBar::new(endpoints::SUMMARY_VIEW).into_html();
    let has_data = summary.count > 0;

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Summary Figures" }

            @if has_data {
                (figures_view(summary))
                (chart_view(chart))
            } @else {
                p id="no-data" { (NO_DATA_MESSAGE) }
            }

            p class="mt-4 text-sm" { (link(endpoints::LOG_OUT, "Log out")) }
        }
    );

    let head_elements = if has_data {
        vec![
            HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
            chart_script(chart),
        ]
    } else {
        Vec::new()
    };

    base("Summary Figures", &head_elements, &content)
}

fn figures_view(summary: &Summary) -> Markup {
    let average = summary
        .average_value
        .map(format_currency)
        .unwrap_or_else(|| NO_DATA_MESSAGE.to_owned());

    html! {
        dl class="grid grid-cols-1 md:grid-cols-3 gap-4 w-full max-w-3xl mb-8"
        {
            (figure("total-purchases", "Total Purchases", &summary.count.to_string()))
            (figure("total-value", "Total Purchase Value", &format_currency(summary.total_value)))
            (figure("average-value", "Average Purchase Value", &average))
        }
    }
}

fn figure(id: &str, label: &str, value: &str) -> Markup {
    html! {
        div id=(id) class="p-4 rounded-lg shadow bg-white dark:bg-gray-800"
        {
            dt class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            dd class="text-2xl font-semibold" { (value) }
        }
    }
}
