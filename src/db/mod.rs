//! Persistence module split across logical submodules. Every public
//! operation is a method on [`Repository`].

mod connection;
mod invoices;
mod reports;

pub use connection::Repository;
pub use reports::SEARCH_LIMIT;
