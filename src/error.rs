//! Error taxonomy for the invoice store. Callers need to tell "no such
//! invoice" apart from "the store is broken", so each failure mode gets its
//! own variant instead of a flattened message.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Which single-record lookup came back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(i64),
    NaturalKey { invoice_no: String, vendor: String },
    Vendor(String),
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Id(id) => write!(f, "id {id}"),
            Lookup::NaturalKey { invoice_no, vendor } => {
                write!(f, "invoice no. {invoice_no} from {vendor}")
            }
            Lookup::Vendor(vendor) => write!(f, "vendor {vendor}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The database file could not be opened or configured.
    #[error("failed to connect to invoice store at {}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed after the connection was established.
    #[error("{context}")]
    Query {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("no invoice matches {0}")]
    NotFound(Lookup),

    /// Rejected before reaching the store.
    #[error("invalid invoice: {0}")]
    Validation(String),

    #[error("invoice no. {invoice_no} from {vendor} already exists")]
    DuplicateInvoice { invoice_no: String, vendor: String },

    /// The largest stored id leaves no room for a new one.
    #[error("no invoice id left after {max}")]
    IdsExhausted { max: i64 },

    /// A persisted document no longer matches the record model.
    #[error("malformed invoice document")]
    Document(#[from] serde_json::Error),

    #[error("failed to create data directory {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Attach a static description to a failing SQLite call, in the spirit of
/// `anyhow::Context` but keeping the typed error.
pub(crate) trait QueryContext<T> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T> QueryContext<T> for std::result::Result<T, rusqlite::Error> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|source| Error::Query { context, source })
    }
}
