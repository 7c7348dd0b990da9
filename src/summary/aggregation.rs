//! Summary figures computed over a snapshot of purchase records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use time::Date;

use crate::purchase::PurchaseRecord;

/// Aggregate figures over a set of purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// The number of purchases.
    pub count: usize,
    /// The sum of all purchase prices.
    pub total_value: Decimal,
    /// The mean purchase price, `None` when there are no purchases.
    pub average_value: Option<Decimal>,
}

/// Count, total and average the prices of `records`.
///
/// The price is summed once per purchase, the quantity is not used. A total
/// too large for [Decimal] saturates at [Decimal::MAX].
pub fn summarize(records: &[PurchaseRecord]) -> Summary {
    let count = records.len();
    let total_value = records
        .iter()
        .try_fold(Decimal::ZERO, |total, record| total.checked_add(record.price))
        .unwrap_or_else(|| {
            tracing::warn!("total purchase value overflowed, showing the maximum instead");
            Decimal::MAX
        });
    let average_value = match count {
        0 => None,
        _ => total_value.checked_div(Decimal::from(count)),
    };

    Summary {
        count,
        total_value,
        average_value,
    }
}

/// Count the purchases made on each day.
///
/// # Returns
/// One entry per distinct purchase date, sorted by date.
pub fn purchases_over_time(records: &[PurchaseRecord]) -> Vec<(Date, usize)> {
    let mut counts: BTreeMap<Date, usize> = BTreeMap::new();

    for record in records {
        *counts.entry(record.purchase_date).or_insert(0) += 1;
    }

    counts.into_iter().collect()
}
