//! Create and edit purchases from submitted forms.
//!
//! Validation happens before the record store is touched, so a rejected form
//! never causes a read or write of the backing file.

use crate::{
    Error,
    purchase::{core::PurchaseRecord, form::PurchaseForm, store::RecordStore},
};

/// Validate `form` and append it to `store` as a new purchase.
///
/// The purchase ID is taken from the form as entered. It is not checked for
/// uniqueness.
///
/// # Errors
/// Returns [Error::Validation] if a field is invalid, or a storage error if
/// the backing file cannot be read or written.
pub fn validate_create(store: &RecordStore, form: &PurchaseForm) -> Result<PurchaseRecord, Error> {
    let fields = form.validate().inspect_err(|error| {
        tracing::info!("Rejected new purchase {:?}: {error}", form.purchase_id);
    })?;
    let record = PurchaseRecord::new(&form.purchase_id, fields);

    store.append(record.clone())?;
    tracing::info!("Saved purchase {:?}", record.purchase_id);

    Ok(record)
}

/// Validate `form` and replace the fields of the first purchase with the ID
/// `purchase_id`.
///
/// # Errors
/// Returns [Error::Validation] if a field is invalid, [Error::NotFound] if no
/// purchase has the ID `purchase_id`, or a storage error if the backing file
/// cannot be read or written.
pub fn validate_edit(
    store: &RecordStore,
    purchase_id: &str,
    form: &PurchaseForm,
) -> Result<PurchaseRecord, Error> {
    let fields = form.validate().inspect_err(|error| {
        tracing::info!("Rejected edit of purchase {purchase_id:?}: {error}");
    })?;

    let record = store.update_by_id(purchase_id, fields)?;
    tracing::info!("Updated purchase {purchase_id:?}");

    Ok(record)
}
