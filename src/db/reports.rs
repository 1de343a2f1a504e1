use rusqlite::{Connection, OptionalExtension, Params};
use tracing::debug;

use super::Repository;
use crate::error::{Error, Lookup, QueryContext, Result};
use crate::models::{Invoice, Summary, VendorProfile};

/// Most invoices a vendor search returns.
pub const SEARCH_LIMIT: usize = 5;

impl Repository {
    /// Each vendor name once, in order of first appearance.
    pub fn distinct_vendors(&self) -> Result<Vec<String>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT vendor FROM invoices
                     GROUP BY vendor
                     ORDER BY MIN(rowid)",
                )
                .context("failed to prepare vendor query")?;

            let mut rows = stmt.query([]).context("failed to execute vendor query")?;

            let mut vendors = Vec::new();
            while let Some(row) = rows.next().context("failed to fetch vendor row")? {
                let vendor: String = row.get(0).context("failed to read vendor value")?;
                vendors.push(vendor);
            }

            Ok(vendors)
        })
    }

    /// Number of distinct vendor names.
    pub fn count_vendors(&self) -> Result<usize> {
        Ok(self.distinct_vendors()?.len())
    }

    /// Invoices whose vendor contains every whitespace-separated term of
    /// `query`, ignoring case. Terms are literal text, not patterns. At most
    /// [`SEARCH_LIMIT`] results, in insertion order.
    pub fn search_by_vendor_substring(&self, query: &str) -> Result<Vec<Invoice>> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT vendor, document FROM invoices ORDER BY rowid")
                .context("failed to prepare vendor search")?;

            let mut rows = stmt.query([]).context("failed to execute vendor search")?;

            let mut matches: Vec<Invoice> = Vec::new();
            while let Some(row) = rows.next().context("failed to fetch search row")? {
                let vendor: String = row.get(0).context("failed to read vendor value")?;
                if !vendor_matches(&vendor, &terms) {
                    continue;
                }

                let document: String = row.get(1).context("failed to read invoice document")?;
                matches.push(serde_json::from_str(&document)?);
                if matches.len() == SEARCH_LIMIT {
                    break;
                }
            }

            debug!(query, hits = matches.len(), "searched vendors");
            Ok(matches)
        })
    }

    /// Invoices stored for an exact vendor name; 0 for an unknown vendor.
    pub fn count_by_vendor(&self, vendor: &str) -> Result<usize> {
        self.with_connection(|conn| {
            count(
                conn,
                "SELECT COUNT(*) FROM invoices WHERE vendor = ?1",
                [vendor],
                "failed to count vendor invoices",
            )
        })
    }

    /// Invoices marked as paid.
    pub fn count_paid(&self) -> Result<usize> {
        self.with_connection(|conn| {
            count(
                conn,
                "SELECT COUNT(*) FROM invoices WHERE paid = 1",
                [],
                "failed to count paid invoices",
            )
        })
    }

    /// Invoices still awaiting payment.
    pub fn count_unpaid(&self) -> Result<usize> {
        self.with_connection(|conn| {
            count(
                conn,
                "SELECT COUNT(*) FROM invoices WHERE paid = 0",
                [],
                "failed to count unpaid invoices",
            )
        })
    }

    /// Every stored invoice, paid or not.
    pub fn total_count(&self) -> Result<usize> {
        self.with_connection(|conn| {
            count(
                conn,
                "SELECT COUNT(*) FROM invoices",
                [],
                "failed to count invoices",
            )
        })
    }

    /// All overview counts read over a single connection.
    pub fn summary(&self) -> Result<Summary> {
        self.with_connection(|conn| {
            let summary = Summary {
                vendors: count(
                    conn,
                    "SELECT COUNT(DISTINCT vendor) FROM invoices",
                    [],
                    "failed to count vendors",
                )?,
                invoices: count(
                    conn,
                    "SELECT COUNT(*) FROM invoices",
                    [],
                    "failed to count invoices",
                )?,
                paid: count(
                    conn,
                    "SELECT COUNT(*) FROM invoices WHERE paid = 1",
                    [],
                    "failed to count paid invoices",
                )?,
                unpaid: count(
                    conn,
                    "SELECT COUNT(*) FROM invoices WHERE paid = 0",
                    [],
                    "failed to count unpaid invoices",
                )?,
            };

            debug!(?summary, "computed summary");
            Ok(summary)
        })
    }

    /// Address and invoice count for an exact vendor name. The address comes
    /// from the vendor's earliest stored invoice.
    pub fn vendor_profile(&self, vendor: &str) -> Result<VendorProfile> {
        self.with_connection(|conn| {
            let document = conn
                .query_row(
                    "SELECT document FROM invoices WHERE vendor = ?1 ORDER BY rowid LIMIT 1",
                    [vendor],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .context("failed to look up vendor")?
                .ok_or_else(|| Error::NotFound(Lookup::Vendor(vendor.to_string())))?;

            let invoice: Invoice = serde_json::from_str(&document)?;
            let invoice_count = count(
                conn,
                "SELECT COUNT(*) FROM invoices WHERE vendor = ?1",
                [vendor],
                "failed to count vendor invoices",
            )?;

            Ok(VendorProfile {
                vendor: invoice.vendor,
                address: invoice.address,
                invoice_count,
            })
        })
    }
}

/// Run a single-value `COUNT` query.
fn count(conn: &Connection, sql: &str, params: impl Params, context: &'static str) -> Result<usize> {
    conn.query_row(sql, params, |row| row.get(0)).context(context)
}

fn vendor_matches(vendor: &str, terms: &[String]) -> bool {
    let vendor = vendor.to_lowercase();
    terms.iter().all(|term| vendor.contains(term.as_str()))
}
