//! Core purchase domain types.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use time::Date;

use crate::purchase::form::ValidationError;

/// The kind of goods bought in a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Devices, parts and accessories.
    Electronics,
    /// Food and household supplies.
    Groceries,
    /// Clothes and shoes.
    Clothing,
    /// Anything else.
    Other,
}

impl Category {
    /// Every category, in the order they are shown in forms.
    pub const ALL: [Category; 4] = [
        Category::Electronics,
        Category::Groceries,
        Category::Clothing,
        Category::Other,
    ];

    /// The label used in forms and in the backing file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Groceries => "Groceries",
            Category::Clothing => "Clothing",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Parse a category from its exact label, e.g. "Groceries".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidCategory(s.to_owned()))
    }
}

/// How a purchase was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Paid with cash.
    Cash,
    /// Paid with a credit card.
    CreditCard,
    /// Paid with a debit card.
    DebitCard,
    /// Any other payment method.
    Other,
}

impl PaymentMethod {
    /// Every payment method, in the order they are shown in forms.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Other,
    ];

    /// The label used in forms and in the backing file.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::Other => "Other",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    /// Parse a payment method from its exact label, e.g. "Credit Card".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidPaymentMethod(s.to_owned()))
    }
}

/// Every field of a purchase except its purchase ID.
///
/// Editing a purchase replaces all of these fields at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseFields {
    /// What was bought.
    pub item_name: String,
    /// How many items were bought.
    pub quantity: u32,
    /// The price paid, never negative.
    pub price: Decimal,
    /// The day of the purchase.
    pub purchase_date: Date,
    /// Who the purchase was made from.
    pub supplier: String,
    /// The kind of goods bought.
    pub category: Category,
    /// How the purchase was paid for.
    pub payment_method: PaymentMethod,
    /// Optional free text notes.
    pub notes: Option<String>,
    /// Optional free text for anything else.
    pub other: Option<String>,
}

/// A single purchase, one row of the backing file.
///
/// The purchase ID is meant to identify a purchase but nothing checks that it
/// is unique or non-empty. Lookups and edits act on the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRecord {
    /// The user supplied identifier of the purchase.
    pub purchase_id: String,
    /// What was bought.
    pub item_name: String,
    /// How many items were bought.
    pub quantity: u32,
    /// The price paid, never negative.
    pub price: Decimal,
    /// The day of the purchase.
    pub purchase_date: Date,
    /// Who the purchase was made from.
    pub supplier: String,
    /// The kind of goods bought.
    pub category: Category,
    /// How the purchase was paid for.
    pub payment_method: PaymentMethod,
    /// Optional free text notes, never `Some("")` when built with [PurchaseRecord::new].
    pub notes: Option<String>,
    /// Optional free text for anything else, never `Some("")` when built with [PurchaseRecord::new].
    pub other: Option<String>,
}

impl PurchaseRecord {
    /// Create a purchase with the ID `purchase_id` from validated fields.
    ///
    /// Empty notes and other details become `None`, since the backing file
    /// cannot tell an empty cell from a missing one.
    pub fn new(purchase_id: &str, fields: PurchaseFields) -> Self {
        Self {
            purchase_id: purchase_id.to_owned(),
            item_name: fields.item_name,
            quantity: fields.quantity,
            price: fields.price,
            purchase_date: fields.purchase_date,
            supplier: fields.supplier,
            category: fields.category,
            payment_method: fields.payment_method,
            notes: fields.notes.filter(|notes| !notes.is_empty()),
            other: fields.other.filter(|other| !other.is_empty()),
        }
    }

    /// Replace every field except the purchase ID with `fields`.
    pub fn apply(&mut self, fields: PurchaseFields) {
        *self = Self::new(&self.purchase_id, fields);
    }

    /// The fields of this purchase, without its purchase ID.
    pub fn fields(&self) -> PurchaseFields {
        PurchaseFields {
            item_name: self.item_name.clone(),
            quantity: self.quantity,
            price: self.price,
            purchase_date: self.purchase_date,
            supplier: self.supplier.clone(),
            category: self.category,
            payment_method: self.payment_method,
            notes: self.notes.clone(),
            other: self.other.clone(),
        }
    }
}
