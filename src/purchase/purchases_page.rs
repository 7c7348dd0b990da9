//! The data input and review page: the entry form, the past purchases table
//! and the edit selector.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_price, link, loading_spinner,
    },
    navigation::NavBar,
    purchase::{
        PurchaseForm, PurchaseRecord, RecordStore,
        form::purchase_form_fields,
        store::{COLUMNS, format_date, unique_ids},
    },
    timezone::local_today,
};

/// Shown after a purchase is created.
pub(super) const CREATED_MESSAGE: &str = "Purchase details saved!";

/// The state needed for the purchases page.
#[derive(Debug, Clone)]
pub struct PurchasesPageState {
    /// The store holding every purchase.
    pub record_store: Arc<Mutex<RecordStore>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for PurchasesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            record_store: state.record_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the purchases page.
#[derive(Debug, Default, Deserialize)]
pub struct PurchasesPageQuery {
    /// Set after a purchase was created to show the success message.
    pub created: Option<bool>,
}

/// Renders the purchase entry form, the table of past purchases and the edit selector.
pub async fn get_purchases_page(
    State(state): State<PurchasesPageState>,
    Query(query): Query<PurchasesPageQuery>,
) -> Result<Response, Error> {
    let records = {
        let store = state
            .record_store
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire record store lock: {error}"))
            .map_err(|_| Error::LockError)?;

        store
            .load_all()
            .inspect_err(|error| tracing::error!("Failed to load purchases for page: {error}"))?
    };
    tracing::debug!("Loaded {} purchases", records.len());

    let today = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let success_message = query.created.unwrap_or(false).then_some(CREATED_MESSAGE);
    let form = purchase_entry_form(&PurchaseForm::empty(today), None, success_message);

    Ok(purchases_view(&form, &records).into_response())
}

fn purchases_view(form: &Markup, records: &[PurchaseRecord]) -> Markup {
    let nav_bar = NavBar::new(endpoints::PURCHASES_VIEW).into_html();
    let table = purchases_table(records);
    let edit_selector = edit_selector(&unique_ids(records));

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md mb-8" { (form) }

            div class="w-full lg:max-w-5xl mb-8"
            {
                h2 class="text-xl font-bold mb-4" { "Past Purchases" }
                (table)
            }

            div class="w-full max-w-md" { (edit_selector) }
        }
    };

    base("Data Input and Review", &[], &content)
}

/// The form for entering a new purchase.
///
/// The whole form is swapped out with the response, so a rejected submission
/// comes back filled in with `values` and `error_message`.
pub(super) fn purchase_entry_form(
    values: &PurchaseForm,
    error_message: Option<&str>,
    success_message: Option<&str>,
) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            id="purchase-form"
            hx-post=(endpoints::PURCHASES_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Enter Purchase Details" }

            div
            {
                label for="purchase_id" class=(FORM_LABEL_STYLE) { "Purchase ID" }

                input
                    name="purchase_id"
                    id="purchase_id"
                    type="text"
                    placeholder="Purchase ID"
                    autofocus
                    value=(values.purchase_id)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (purchase_form_fields(values))

            @if let Some(error_message) = error_message {
                p class="text-red-600 dark:text-red-400" { (error_message) }
            }

            @if let Some(success_message) = success_message {
                p class="text-green-600 dark:text-green-400" { (success_message) }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " Submit"
            }
        }
    }
}

fn purchases_table(records: &[PurchaseRecord]) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for column in COLUMNS {
                            th scope="col" class=(TABLE_CELL_STYLE) { (column) }
                        }
                    }
                }

                tbody
                {
                    @for record in records {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                (link(&endpoints::edit_purchase_url(&record.purchase_id), &record.purchase_id))
                            }
                            td class=(TABLE_CELL_STYLE) { (record.item_name) }
                            td class=(TABLE_CELL_STYLE) { (record.quantity) }
                            td class=(TABLE_CELL_STYLE) { (format_price(record.price)) }
                            td class=(TABLE_CELL_STYLE) { (format_date(record.purchase_date)) }
                            td class=(TABLE_CELL_STYLE) { (record.supplier) }
                            td class=(TABLE_CELL_STYLE) { (record.category) }
                            td class=(TABLE_CELL_STYLE) { (record.payment_method) }
                            td class=(TABLE_CELL_STYLE) { (record.notes.as_deref().unwrap_or_default()) }
                            td class=(TABLE_CELL_STYLE) { (record.other.as_deref().unwrap_or_default()) }
                        }
                    }

                    @if records.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan=(COLUMNS.len()) class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No purchases yet."
                            }
                        }
                    }
                }
            }
        }
    }
}

/// A plain GET form that opens the edit page for the selected purchase ID.
fn edit_selector(purchase_ids: &[String]) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::EDIT_PURCHASE_VIEW)
            class="w-full space-y-4"
        {
            h2 class="text-xl font-bold" { "Edit a Purchase" }

            div
            {
                label for="purchase_id_select" class=(FORM_LABEL_STYLE)
                {
                    "Select Purchase ID to Edit"
                }

                select
                    name="purchase_id"
                    id="purchase_id_select"
                    disabled[purchase_ids.is_empty()]
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for purchase_id in purchase_ids {
                        option value=(purchase_id) { (purchase_id) }
                    }
                }
            }

            button
                type="submit"
                disabled[purchase_ids.is_empty()]
                class=(BUTTON_SECONDARY_STYLE)
            {
                "Edit Purchase"
            }
        }
    }
}
