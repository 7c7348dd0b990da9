//! Purchase records and the pages for entering, reviewing and editing them.
//!
//! This module contains:
//! - The `PurchaseRecord` model and its fixed categories and payment methods
//! - The CSV backed `RecordStore`
//! - Form validation and the create/edit operations built on it
//! - View handlers for the purchase pages and endpoints

mod controller;
mod core;
mod create_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod purchases_page;
mod store;

pub use controller::{validate_create, validate_edit};
pub use core::{Category, PaymentMethod, PurchaseFields, PurchaseRecord};
pub use create_endpoint::create_purchase_endpoint;
pub use edit_endpoint::edit_purchase_endpoint;
pub use edit_page::get_edit_purchase_page;
pub use form::{PurchaseForm, ValidationError};
pub use purchases_page::get_purchases_page;
pub use store::{RecordStore, format_date};
