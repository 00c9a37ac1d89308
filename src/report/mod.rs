pub mod handlers;
pub mod models;
mod service;

// Re-export handlers for use in main.rs
pub use handlers::{category_breakdown, combined_report, list_transactions, price_histogram};
pub use service::ReportService;
