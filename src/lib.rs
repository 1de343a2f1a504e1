//! Core library for the invoice tracker: the SQLite-backed invoice store and
//! the projections that turn its records into display tables.
//!
//! The `bin` target is a thin consumer; anything that renders invoices goes
//! through the same [`Repository`] and [`views`] functions.
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod seed;
pub mod views;

pub use config::Config;
pub use db::{Repository, SEARCH_LIMIT};
pub use error::{Error, Lookup, Result};

/// Domain types passed between the store and its consumers.
pub use models::{Invoice, LineItem, Location, Summary, VendorProfile};

pub use views::{
    all_invoices_table, format_cents, line_items_table, line_items_view, paid_label, parse_amount,
    vendor_invoices_table, Table, TableView,
};
