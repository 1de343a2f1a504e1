use std::fs;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, QueryContext, Result};

/// Handle on the invoice store. It holds no live connection: each operation
/// opens one, runs, and drops it before returning, error paths included.
#[derive(Debug, Clone)]
pub struct Repository {
    config: Config,
}

impl Repository {
    /// Create the data directory and schema if needed, then return a handle.
    /// This is the only path that may create the database file; later
    /// operations fail with [`Error::Connection`] if it disappears.
    pub fn open(config: Config) -> Result<Self> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| Error::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(&config.db_path).map_err(|source| Error::Connection {
            path: config.db_path.clone(),
            source,
        })?;
        apply_busy_timeout(&conn, &config)?;
        ensure_schema(&conn)?;
        debug!(path = %config.db_path.display(), "invoice store ready");

        Ok(Self { config })
    }

    /// Settings this handle opens connections with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one logical operation on a fresh connection.
    pub(crate) fn with_connection<T>(
        &self,
        op: impl FnOnce(&mut Connection) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.connect()?;
        op(&mut conn)
    }

    fn connect(&self) -> Result<Connection> {
        let path = &self.config.db_path;
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(path, flags).map_err(|source| {
            Error::Connection {
                path: path.clone(),
                source,
            }
        })?;
        apply_busy_timeout(&conn, &self.config)?;

        Ok(conn)
    }
}

/// Wait up to the configured timeout on a locked database instead of failing
/// with `SQLITE_BUSY` straight away.
fn apply_busy_timeout(conn: &Connection, config: &Config) -> Result<()> {
    conn.busy_timeout(config.busy_timeout)
        .map_err(|source| Error::Connection {
            path: config.db_path.clone(),
            source,
        })
}

/// Lazily create the single `invoices` table. Each row holds the whole JSON
/// document; the key columns are generated from it so lookups can use indexes
/// without a second copy of the data drifting out of sync.
fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS invoices (
            document TEXT NOT NULL CHECK (json_valid(document)),
            id INTEGER GENERATED ALWAYS AS (json_extract(document, '$.id')) VIRTUAL NOT NULL,
            vendor TEXT GENERATED ALWAYS AS (json_extract(document, '$.vendor')) VIRTUAL NOT NULL,
            invoiceno TEXT GENERATED ALWAYS AS (json_extract(document, '$.invoiceno')) VIRTUAL NOT NULL,
            paid INTEGER GENERATED ALWAYS AS (json_extract(document, '$.paid')) VIRTUAL NOT NULL
        )",
        [],
    )
    .context("failed to create invoices table")?;

    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS invoices_id ON invoices (id)",
        [],
    )
    .context("failed to create invoice id index")?;

    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS invoices_natural_key
         ON invoices (vendor, invoiceno)",
        [],
    )
    .context("failed to create invoice natural key index")?;

    Ok(())
}
