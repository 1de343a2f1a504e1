use rusqlite::{ffi, params, Connection, OptionalExtension, TransactionBehavior};
use tracing::{debug, info, warn};

use super::Repository;
use crate::error::{Error, Lookup, QueryContext, Result};
use crate::models::{Invoice, LineItem};

impl Repository {
    /// Every invoice with all fields, in insertion order.
    pub fn list_all(&self) -> Result<Vec<Invoice>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT document FROM invoices ORDER BY rowid")
                .context("failed to prepare invoice query")?;

            let documents = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .context("failed to load invoices")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .context("failed to collect invoices")?;

            let invoices = parse_documents(&documents)?;
            debug!(count = invoices.len(), "listed invoices");
            Ok(invoices)
        })
    }

    /// Only vendor, invoice number, date, total and paid status are filled
    /// in; everything else is left at its zero value.
    pub fn list_all_projected(&self) -> Result<Vec<Invoice>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT vendor, invoiceno,
                            json_extract(document, '$.date'),
                            json_extract(document, '$.total'),
                            paid
                     FROM invoices
                     ORDER BY rowid",
                )
                .context("failed to prepare invoice table query")?;

            let invoices = stmt
                .query_map([], |row| {
                    Ok(Invoice {
                        vendor: row.get(0)?,
                        invoice_no: row.get(1)?,
                        date: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        total: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
                        paid: row.get(4)?,
                        ..Invoice::default()
                    })
                })
                .context("failed to load invoice table rows")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .context("failed to collect invoice table rows")?;

            Ok(invoices)
        })
    }

    /// Invoices for one vendor (exact match) with invoice number, date,
    /// total and paid status filled in.
    pub fn list_by_vendor(&self, vendor: &str) -> Result<Vec<Invoice>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT invoiceno,
                            json_extract(document, '$.date'),
                            json_extract(document, '$.total'),
                            paid
                     FROM invoices
                     WHERE vendor = ?1
                     ORDER BY rowid",
                )
                .context("failed to prepare vendor invoice query")?;

            let invoices = stmt
                .query_map([vendor], |row| {
                    Ok(Invoice {
                        invoice_no: row.get(0)?,
                        date: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        total: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
                        paid: row.get(3)?,
                        ..Invoice::default()
                    })
                })
                .context("failed to load vendor invoices")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .context("failed to collect vendor invoices")?;

            debug!(vendor, count = invoices.len(), "listed vendor invoices");
            Ok(invoices)
        })
    }

    /// Line items of the invoice identified by its natural key. An unknown
    /// key yields an empty list, not an error.
    pub fn line_items_for(&self, invoice_no: &str, vendor: &str) -> Result<Vec<LineItem>> {
        self.with_connection(|conn| {
            let items = conn
                .query_row(
                    "SELECT json_extract(document, '$.items')
                     FROM invoices
                     WHERE invoiceno = ?1 AND vendor = ?2",
                    params![invoice_no, vendor],
                    |row| row.get::<_, Option<String>>(0),
                )
                .optional()
                .context("failed to load line items")?
                .flatten();

            match items {
                Some(json) => Ok(serde_json::from_str(&json)?),
                None => {
                    debug!(invoice_no, vendor, "no invoice for line item lookup");
                    Ok(Vec::new())
                }
            }
        })
    }

    /// Every assigned id, in insertion order.
    pub fn distinct_ids(&self) -> Result<Vec<i64>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT id FROM invoices ORDER BY rowid")
                .context("failed to prepare id query")?;

            let ids = stmt
                .query_map([], |row| row.get(0))
                .context("failed to load invoice ids")?
                .collect::<rusqlite::Result<Vec<i64>>>()
                .context("failed to collect invoice ids")?;

            Ok(ids)
        })
    }

    /// The full record with this id, or [`Error::NotFound`].
    pub fn find_by_id(&self, id: i64) -> Result<Invoice> {
        self.with_connection(|conn| {
            let document = conn
                .query_row(
                    "SELECT document FROM invoices WHERE id = ?1",
                    [id],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .context("failed to look up invoice by id")?
                .ok_or(Error::NotFound(Lookup::Id(id)))?;

            Ok(serde_json::from_str(&document)?)
        })
    }

    /// The full record for a vendor's invoice number. Both parts must match
    /// exactly.
    pub fn find_by_invoice_no_and_vendor(&self, invoice_no: &str, vendor: &str) -> Result<Invoice> {
        self.with_connection(|conn| {
            let document = conn
                .query_row(
                    "SELECT document FROM invoices WHERE invoiceno = ?1 AND vendor = ?2",
                    params![invoice_no, vendor],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .context("failed to look up invoice by number and vendor")?
                .ok_or_else(|| {
                    Error::NotFound(Lookup::NaturalKey {
                        invoice_no: invoice_no.to_string(),
                        vendor: vendor.to_string(),
                    })
                })?;

            Ok(serde_json::from_str(&document)?)
        })
    }

    /// One past the largest id in the store, or 1 for an empty store. Gaps
    /// left by deletes are never refilled. Fails with
    /// [`Error::IdsExhausted`] once the largest id is `i64::MAX`.
    pub fn next_id(&self) -> Result<i64> {
        self.with_connection(|conn| next_id_in(conn))
    }

    /// Assign the next id and persist the invoice, returning the stored copy.
    ///
    /// The id is computed and the row inserted under one `BEGIN IMMEDIATE`
    /// transaction, so concurrent writers on the same file queue on the lock
    /// instead of both claiming the same id. Writers against separate copies
    /// of the store can still collide.
    pub fn add_invoice(&self, mut invoice: Invoice) -> Result<Invoice> {
        invoice.validate()?;

        self.with_connection(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .context("failed to start insert transaction")?;

            invoice.id = next_id_in(&tx)?;
            let document = serde_json::to_string(&invoice)?;
            tx.execute("INSERT INTO invoices (document) VALUES (?1)", [&document])
                .map_err(|err| map_unique_constraint(err, &invoice, "failed to insert invoice"))?;
            tx.commit().context("failed to commit new invoice")?;

            info!(id = invoice.id, vendor = %invoice.vendor, "added invoice");
            Ok(invoice)
        })
    }

    /// Replace the stored record that has the same id.
    pub fn update_invoice(&self, invoice: &Invoice) -> Result<()> {
        invoice.validate()?;
        let document = serde_json::to_string(invoice)?;

        self.with_connection(|conn| {
            let updated = conn
                .execute(
                    "UPDATE invoices SET document = ?1 WHERE id = ?2",
                    params![document, invoice.id],
                )
                .map_err(|err| map_unique_constraint(err, invoice, "failed to update invoice"))?;

            if updated == 0 {
                return Err(Error::NotFound(Lookup::Id(invoice.id)));
            }

            info!(id = invoice.id, "updated invoice");
            Ok(())
        })
    }

    /// Remove the record with this id. Its number is not handed out again
    /// unless it was the largest one.
    pub fn delete_invoice(&self, id: i64) -> Result<()> {
        self.with_connection(|conn| {
            let deleted = conn
                .execute("DELETE FROM invoices WHERE id = ?1", [id])
                .context("failed to delete invoice")?;

            if deleted == 0 {
                return Err(Error::NotFound(Lookup::Id(id)));
            }

            info!(id, "deleted invoice");
            Ok(())
        })
    }
}

fn next_id_in(conn: &Connection) -> Result<i64> {
    let max: Option<i64> = conn
        .query_row("SELECT MAX(id) FROM invoices", [], |row| row.get(0))
        .context("failed to read highest invoice id")?;

    match max {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(Error::IdsExhausted { max }),
    }
}

pub(super) fn parse_documents(documents: &[String]) -> Result<Vec<Invoice>> {
    documents
        .iter()
        .map(|document| serde_json::from_str(document).map_err(Error::from))
        .collect()
}

/// Turn a unique-index violation into a duplicate natural key error. Inside
/// the insert transaction the id cannot collide, so the vendor/number pair is
/// the only unique constraint left to trip.
fn map_unique_constraint(err: rusqlite::Error, invoice: &Invoice, context: &'static str) -> Error {
    let is_unique_violation = matches!(
        &err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    );

    if is_unique_violation {
        warn!(
            invoice_no = %invoice.invoice_no,
            vendor = %invoice.vendor,
            "rejected duplicate invoice"
        );
        Error::DuplicateInvoice {
            invoice_no: invoice.invoice_no.clone(),
            vendor: invoice.vendor.clone(),
        }
    } else {
        Error::Query {
            context,
            source: err,
        }
    }
}
