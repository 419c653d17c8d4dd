//! Olist e-commerce analytics dashboard
//!
//! Loads the seven Olist CSV files once, joins them into one row per order
//! item and renders a fixed sequence of chart datasets for a date range and
//! a (category, state) drill-down selection.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod filter;
pub mod join;
pub mod loader;
pub mod models;
pub mod report;
pub mod synthetic;
pub mod translate;

pub use dashboard::{render, Dashboard, DashboardState};
pub use loader::Dataset;
