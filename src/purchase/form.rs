//! The purchase form: raw field values, their validation, and the shared form fields markup.

use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, dollar_input, format_price},
    purchase::{
        core::{Category, PaymentMethod, PurchaseFields, PurchaseRecord},
        store::{format_date, parse_date},
    },
};

/// A field value that breaks one of the purchase invariants.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// The quantity is not a whole number.
    #[error("Quantity must be a whole number, got \"{0}\"")]
    InvalidQuantity(String),

    /// The quantity is below zero.
    #[error("Quantity cannot be negative, got {0}")]
    NegativeQuantity(i64),

    /// The price is not a decimal number.
    #[error("Price must be a number, got \"{0}\"")]
    InvalidPrice(String),

    /// The price is below zero.
    #[error("Price cannot be negative, got {0}")]
    NegativePrice(Decimal),

    /// The purchase date is not an ISO 8601 date, e.g. "2024-01-31".
    #[error("Purchase date must be a date like 2024-01-31, got \"{0}\"")]
    InvalidDate(String),

    /// The category is not one of the fixed categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// The payment method is not one of the fixed payment methods.
    #[error("\"{0}\" is not a valid payment method")]
    InvalidPaymentMethod(String),
}

/// The raw values submitted with the purchase form.
///
/// Also used to fill in the form, so that a rejected submission can be shown
/// again as it was entered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PurchaseForm {
    /// The purchase ID. For edits this selects the purchase to change.
    pub purchase_id: String,
    /// What was bought.
    pub item_name: String,
    /// How many items were bought, a non-negative whole number.
    pub quantity: String,
    /// The price paid, a non-negative number.
    pub price: String,
    /// The day of the purchase as `YYYY-MM-DD`.
    pub purchase_date: String,
    /// Who the purchase was made from.
    pub supplier: String,
    /// One of the category labels.
    pub category: String,
    /// One of the payment method labels.
    pub payment_method: String,
    /// Optional notes, empty means none.
    #[serde(default)]
    pub notes: String,
    /// Optional other details, empty means none.
    #[serde(default)]
    pub other: String,
}

impl PurchaseForm {
    /// The values of a new, empty form dated `today`.
    pub fn empty(today: Date) -> Self {
        Self {
            quantity: "0".to_owned(),
            price: "0.00".to_owned(),
            purchase_date: format_date(today),
            category: Category::Electronics.to_string(),
            payment_method: PaymentMethod::Cash.to_string(),
            ..Default::default()
        }
    }

    /// Check every field and convert the form into purchase fields.
    ///
    /// Text fields are kept as entered, except that empty notes and other
    /// details become `None`.
    ///
    /// # Errors
    /// Returns the [ValidationError] for the first invalid field.
    pub fn validate(&self) -> Result<PurchaseFields, ValidationError> {
        Ok(PurchaseFields {
            item_name: self.item_name.clone(),
            quantity: parse_quantity(&self.quantity)?,
            price: parse_price(&self.price)?,
            purchase_date: parse_date(&self.purchase_date)
                .map_err(|_| ValidationError::InvalidDate(self.purchase_date.clone()))?,
            supplier: self.supplier.clone(),
            category: self.category.parse()?,
            payment_method: self.payment_method.parse()?,
            notes: optional_text(&self.notes),
            other: optional_text(&self.other),
        })
    }
}

impl From<&PurchaseRecord> for PurchaseForm {
    fn from(record: &PurchaseRecord) -> Self {
        Self {
            purchase_id: record.purchase_id.clone(),
            item_name: record.item_name.clone(),
            quantity: record.quantity.to_string(),
            price: format_price(record.price),
            purchase_date: format_date(record.purchase_date),
            supplier: record.supplier.clone(),
            category: record.category.to_string(),
            payment_method: record.payment_method.to_string(),
            notes: record.notes.clone().unwrap_or_default(),
            other: record.other.clone().unwrap_or_default(),
        }
    }
}

fn parse_quantity(text: &str) -> Result<u32, ValidationError> {
    let quantity: i64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidQuantity(text.to_owned()))?;

    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity(quantity));
    }

    u32::try_from(quantity).map_err(|_| ValidationError::InvalidQuantity(text.to_owned()))
}

fn parse_price(text: &str) -> Result<Decimal, ValidationError> {
    let price = Decimal::from_str_exact(text.trim())
        .map_err(|_| ValidationError::InvalidPrice(text.to_owned()))?;

    if price < Decimal::ZERO {
        return Err(ValidationError::NegativePrice(price));
    }

    Ok(price)
}

fn optional_text(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

/// Render the inputs for every purchase field except the purchase ID.
///
/// The inputs are filled in with `values`.
pub fn purchase_form_fields(values: &PurchaseForm) -> Markup {
    html! {
        div
        {
            label for="item_name" class=(FORM_LABEL_STYLE) { "Item Name" }

            input
                name="item_name"
                id="item_name"
                type="text"
                placeholder="Item Name"
                value=(values.item_name)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="quantity" class=(FORM_LABEL_STYLE) { "Quantity" }

                input
                    name="quantity"
                    id="quantity"
                    type="number"
                    step="1"
                    min="0"
                    required
                    value=(values.quantity)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="price" class=(FORM_LABEL_STYLE) { "Price" }

                (dollar_input("price", &values.price))
            }
        }

        div
        {
            label for="purchase_date" class=(FORM_LABEL_STYLE) { "Purchase Date" }

            input
                name="purchase_date"
                id="purchase_date"
                type="date"
                required
                value=(values.purchase_date)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="supplier" class=(FORM_LABEL_STYLE) { "Supplier" }

            input
                name="supplier"
                id="supplier"
                type="text"
                placeholder="Supplier"
                value=(values.supplier)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in Category::ALL {
                    option
                        value=(category)
                        selected[category.as_str() == values.category]
                    {
                        (category)
                    }
                }
            }
        }

        div
        {
            label for="payment_method" class=(FORM_LABEL_STYLE) { "Payment Method" }

            select name="payment_method" id="payment_method" class=(FORM_TEXT_INPUT_STYLE)
            {
                @for method in PaymentMethod::ALL {
                    option
                        value=(method)
                        selected[method.as_str() == values.payment_method]
                    {
                        (method)
                    }
                }
            }
        }

        div
        {
            label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

            textarea
                name="notes"
                id="notes"
                rows="3"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (values.notes)
            }
        }

        div
        {
            label for="other" class=(FORM_LABEL_STYLE) { "Other" }

            input
                name="other"
                id="other"
                type="text"
                value=(values.other)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
