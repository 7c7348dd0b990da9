//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::{get_log_in_page, get_log_out, post_log_in, summary_guard},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    purchase::{
        create_purchase_endpoint, edit_purchase_endpoint, get_edit_purchase_page,
        get_purchases_page,
    },
    summary::get_summary_page,
};

/// Return a router with all the app's routes.
///
/// Only the summary page sits behind the password gate, entering and editing
/// purchases is open to everyone.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::PURCHASES_VIEW, get(get_purchases_page))
        .route(endpoints::EDIT_PURCHASE_VIEW, get(get_edit_purchase_page))
        .route(endpoints::PURCHASES_API, post(create_purchase_endpoint))
        .route(endpoints::EDIT_PURCHASE_API, put(edit_purchase_endpoint))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::SUMMARY_VIEW, get(get_summary_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), summary_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the purchases page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::PURCHASES_VIEW)
}
