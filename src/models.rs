//! Record model for persisted invoices. These types are plain data holders;
//! the serde attributes pin the document field names so existing stores keep
//! loading after refactors.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Currency assigned when the caller does not pick one.
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Root billing record. Amounts are integer minor units (cents), so `7420`
/// means $74.20.
pub struct Invoice {
    /// Primary key. Zero until the repository assigns one on insert.
    pub id: i64,
    /// Exact name used for vendor filtering and grouping.
    pub vendor: String,
    /// Where the vendor bills from.
    pub address: Location,
    /// Kept in entry order.
    #[serde(rename = "items")]
    pub line_items: Vec<LineItem>,
    /// Vendor-supplied number. Unique together with `vendor`.
    #[serde(rename = "invoiceno")]
    pub invoice_no: String,
    /// Free text; no date parsing happens here.
    pub date: String,
    /// Buyer-side reference, free text.
    #[serde(rename = "purchaseorder")]
    pub purchase_order: String,
    /// Invoice total in minor units, stored as given.
    pub total: i64,
    /// ISO-style code such as `"USD"`.
    pub currency: String,
    /// Whether the invoice has been settled.
    pub paid: bool,
}

impl Invoice {
    /// Start a fresh, unpaid invoice in the default currency.
    pub fn new(vendor: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            currency: DEFAULT_CURRENCY.to_string(),
            ..Self::default()
        }
    }

    /// Sum of `quantity * amount` across the line items, saturating at the
    /// `i64` bounds. Callers use this to fill `total`; the store never
    /// recomputes or checks it.
    pub fn line_items_total(&self) -> i64 {
        self.line_items.iter().fold(0i64, |sum, item| {
            sum.saturating_add(i64::from(item.quantity).saturating_mul(item.amount))
        })
    }

    /// Reject records that must never reach the store: a blank vendor or any
    /// negative amount.
    pub fn validate(&self) -> Result<()> {
        if self.vendor.trim().is_empty() {
            return Err(Error::Validation("vendor must not be empty".into()));
        }
        if self.total < 0 {
            return Err(Error::Validation(format!(
                "total must not be negative (got {})",
                self.total
            )));
        }
        if let Some(item) = self.line_items.iter().find(|item| item.amount < 0) {
            return Err(Error::Validation(format!(
                "line item {} has a negative amount ({})",
                item.product_id, item.amount
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Postal address embedded in an invoice. Never stored on its own.
pub struct Location {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// One purchased product on an invoice.
pub struct LineItem {
    /// Vendor's catalogue code.
    #[serde(rename = "productid")]
    pub product_id: String,
    pub description: String,
    /// Units ordered. The field width caps it at 65535.
    pub quantity: u16,
    /// Minor units, stored exactly as supplied.
    pub amount: i64,
}

impl LineItem {
    /// Build a line item from a quantity the caller parsed from user input.
    /// Quantities past `u16::MAX` are rejected rather than truncated.
    pub fn new(
        product_id: impl Into<String>,
        description: impl Into<String>,
        quantity: u32,
        amount: i64,
    ) -> Result<Self> {
        let quantity = u16::try_from(quantity).map_err(|_| {
            Error::Validation(format!(
                "quantity {quantity} exceeds the maximum of {}",
                u16::MAX
            ))
        })?;

        Ok(Self {
            product_id: product_id.into(),
            description: description.into(),
            quantity,
            amount,
        })
    }
}

/// Store-wide counts backing the "all invoices" overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Distinct vendor names.
    pub vendors: usize,
    pub invoices: usize,
    pub paid: usize,
    pub unpaid: usize,
}

/// Contact details and invoice count for one vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorProfile {
    pub vendor: String,
    /// Taken from the vendor's earliest stored invoice.
    pub address: Location,
    /// Invoices stored under this exact vendor name.
    pub invoice_count: usize,
}
