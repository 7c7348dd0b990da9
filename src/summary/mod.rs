//! Summary module
//!
//! Provides the password protected page with the total, count and average of
//! all purchases and a chart of purchases over time.

mod aggregation;
mod charts;
mod handlers;

pub use aggregation::{Summary, purchases_over_time, summarize};
pub use handlers::get_summary_page;
