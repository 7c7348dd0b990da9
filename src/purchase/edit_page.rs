//! The page for editing an existing purchase.

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
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        link, loading_spinner,
    },
    navigation::NavBar,
    purchase::{PurchaseForm, RecordStore, form::purchase_form_fields},
};

/// The state needed for the edit purchase page.
#[derive(Debug, Clone)]
pub struct EditPurchasePageState {
    /// The store holding every purchase.
    pub record_store: Arc<Mutex<RecordStore>>,
}

impl FromRef<AppState> for EditPurchasePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            record_store: state.record_store.clone(),
        }
    }
}

/// Selects the purchase to edit.
#[derive(Debug, Deserialize)]
pub struct EditPurchaseQuery {
    /// The ID of the purchase to edit. The first purchase with this ID is used.
    pub purchase_id: String,
}

/// Renders the edit form prefilled with the current values of the selected purchase.
pub async fn get_edit_purchase_page(
    State(state): State<EditPurchasePageState>,
    Query(query): Query<EditPurchaseQuery>,
) -> Result<Response, Error> {
    let store = state
        .record_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire record store lock: {error}"))
        .map_err(|_| Error::LockError)?;

    let record = store.get_by_id(&query.purchase_id).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve purchase {:?}: {error}", query.purchase_id);
        }
    })?;

    let form = edit_purchase_form(&PurchaseForm::from(&record), None, None);

    Ok(edit_purchase_view(&form).into_response())
}

fn edit_purchase_view(form: &Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_PURCHASE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (form)

            p class="mt-4 text-sm" { (link(endpoints::PURCHASES_VIEW, "Back to purchases")) }
        }
    };

    base("Edit Purchase", &[], &content)
}

/// The form for editing the purchase `values.purchase_id`.
///
/// The purchase ID cannot be changed and is sent with the other fields as a hidden input.
pub(super) fn edit_purchase_form(
    values: &PurchaseForm,
    error_message: Option<&str>,
    success_message: Option<&str>,
) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            id="edit-purchase-form"
            hx-put=(endpoints::EDIT_PURCHASE_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Edit Purchase Details" }

            input type="hidden" name="purchase_id" value=(values.purchase_id);

            div
            {
                label for="purchase_id_display" class=(FORM_LABEL_STYLE) { "Purchase ID" }

                input
                    id="purchase_id_display"
                    type="text"
                    readonly
                    disabled
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
                " Update Purchase"
            }
        }
    }
}
