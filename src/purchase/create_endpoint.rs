//! Defines the endpoint for creating a new purchase.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error, endpoints,
    purchase::{PurchaseForm, RecordStore, purchases_page::purchase_entry_form, validate_create},
};

/// The state needed to create a purchase.
#[derive(Debug, Clone)]
pub struct CreatePurchaseState {
    /// The store holding every purchase.
    pub record_store: Arc<Mutex<RecordStore>>,
}

impl FromRef<AppState> for CreatePurchaseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            record_store: state.record_store.clone(),
        }
    }
}

/// A route handler for creating a new purchase.
///
/// Redirects to the purchases page on success. Invalid submissions are sent
/// back as the entry form filled in with the submitted values.
pub async fn create_purchase_endpoint(
    State(state): State<CreatePurchaseState>,
    Form(form): Form<PurchaseForm>,
) -> Response {
    let store = match state.record_store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire record store lock: {error}");
            return Error::LockError.into_alert_response();
        }
    };

    match validate_create(&store, &form) {
        Ok(_) => (
            HxRedirect(format!("{}?created=true", endpoints::PURCHASES_VIEW)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::Validation(error)) => {
            purchase_entry_form(&form, Some(&format!("Error: {error}")), None).into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
