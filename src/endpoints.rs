//! The API endpoints URIs.
//!
//! Purchase IDs are free text, so they are passed in the query string rather
//! than the path. Use [edit_purchase_url] to build a link to the edit page.

/// The root route which redirects to the purchases page.
pub const ROOT: &str = "/";
/// The page for entering new purchases and reviewing past purchases.
pub const PURCHASES_VIEW: &str = "/purchases";
/// The page for editing an existing purchase, selected with the `purchase_id` query parameter.
pub const EDIT_PURCHASE_VIEW: &str = "/purchases/edit";
/// The page with the summary figures, only available after logging in.
pub const SUMMARY_VIEW: &str = "/summary";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route for logging in.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create a purchase.
pub const PURCHASES_API: &str = "/api/purchases";
/// The route to update a purchase, the purchase ID is sent in the form body.
pub const EDIT_PURCHASE_API: &str = "/api/purchases/edit";

/// Build the URL of the edit page for the purchase with `purchase_id`.
///
/// Returns the plain edit page URL if `purchase_id` cannot be encoded.
pub fn edit_purchase_url(purchase_id: &str) -> String {
    match serde_urlencoded::to_string([("purchase_id", purchase_id)]) {
        Ok(query) => format!("{EDIT_PURCHASE_VIEW}?{query}"),
        Err(error) => {
            tracing::error!("Could not encode purchase ID {purchase_id:?}: {error}");
            EDIT_PURCHASE_VIEW.to_owned()
        }
    }
}
