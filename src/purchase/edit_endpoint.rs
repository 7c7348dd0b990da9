//! Defines the endpoint for updating an existing purchase.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    purchase::{PurchaseForm, RecordStore, edit_page::edit_purchase_form, validate_edit},
};

/// Shown after a purchase is updated.
const UPDATED_MESSAGE: &str = "Purchase details updated!";

/// The state needed to update a purchase.
#[derive(Debug, Clone)]
pub struct EditPurchaseState {
    /// The store holding every purchase.
    pub record_store: Arc<Mutex<RecordStore>>,
}

impl FromRef<AppState> for EditPurchaseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            record_store: state.record_store.clone(),
        }
    }
}

/// A route handler for updating the purchase named by the form's `purchase_id`.
///
/// Responds with the edit form filled in with the saved values, or with the
/// submitted values and an error message if the form is invalid.
pub async fn edit_purchase_endpoint(
    State(state): State<EditPurchaseState>,
    Form(form): Form<PurchaseForm>,
) -> Response {
    let store = match state.record_store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire record store lock: {error}");
            return Error::LockError.into_alert_response();
        }
    };

    match validate_edit(&store, &form.purchase_id, &form) {
        Ok(record) => {
            edit_purchase_form(&PurchaseForm::from(&record), None, Some(UPDATED_MESSAGE))
                .into_response()
        }
        Err(Error::Validation(error)) => {
            edit_purchase_form(&form, Some(&format!("Error: {error}")), None).into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
