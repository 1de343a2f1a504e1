//! Projection of query results into the tables the display grids consume.
//!
//! Tables are column-major: `columns[column][row]`. Display grids index cells
//! as (column, row), so the layout is kept exactly as they expect, headers
//! included. Every builder is a pure function of its input.

mod format;

pub use format::{format_cents, paid_label, parse_amount};

use crate::models::{Invoice, LineItem};

/// Which grid a table feeds. `SelectInvoice` is the line-item grid before any
/// invoice has been picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableView {
    AllInvoices,
    VendorInvoices,
    LineItems,
    SelectInvoice,
}

const ALL_INVOICES_HEADERS: &[&str] = &["Vendor", "Invoice No.", "Date", "Total", "Status"];
const VENDOR_INVOICES_HEADERS: &[&str] = &["Invoice No.", "Date", "Total", "Status"];
const LINE_ITEMS_HEADERS: &[&str] = &["Product ID", "Description", "Quantity", "Amount"];
const SELECT_INVOICE_HEADERS: &[&str] = &["Select An Invoice"];

impl TableView {
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            TableView::AllInvoices => ALL_INVOICES_HEADERS,
            TableView::VendorInvoices => VENDOR_INVOICES_HEADERS,
            TableView::LineItems => LINE_ITEMS_HEADERS,
            TableView::SelectInvoice => SELECT_INVOICE_HEADERS,
        }
    }

    /// Header label for a column, or `None` past the last column.
    pub fn header(self, column: usize) -> Option<&'static str> {
        self.headers().get(column).copied()
    }

    pub fn column_count(self) -> usize {
        self.headers().len()
    }
}

/// Column-major table of display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    view: TableView,
    columns: Vec<Vec<String>>,
}

impl Table {
    /// Project `records` through one extractor per column.
    fn project<T>(view: TableView, records: &[T], extractors: &[fn(&T) -> String]) -> Self {
        debug_assert_eq!(extractors.len(), view.column_count());
        let columns = extractors
            .iter()
            .map(|extract| records.iter().map(extract).collect::<Vec<String>>())
            .collect();
        Self { view, columns }
    }

    /// The line-item grid with nothing selected: one empty column.
    pub fn select_invoice() -> Self {
        Self {
            view: TableView::SelectInvoice,
            columns: vec![Vec::new()],
        }
    }

    pub fn view(&self) -> TableView {
        self.view
    }

    pub fn columns(&self) -> &[Vec<String>] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&str> {
        self.columns.get(column)?.get(row).map(String::as_str)
    }

    pub fn header(&self, column: usize) -> Option<&'static str> {
        self.view.header(column)
    }

    /// Cells of one row, left to right.
    pub fn row(&self, row: usize) -> Option<Vec<&str>> {
        self.columns
            .iter()
            .map(|column| column.get(row).map(String::as_str))
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.row_count()).filter_map(move |row| self.row(row))
    }
}

/// Vendor, Invoice No., Date, Total, Status.
pub fn all_invoices_table(invoices: &[Invoice]) -> Table {
    Table::project(
        TableView::AllInvoices,
        invoices,
        &[
            |invoice: &Invoice| invoice.vendor.clone(),
            |invoice: &Invoice| invoice.invoice_no.clone(),
            |invoice: &Invoice| invoice.date.clone(),
            |invoice: &Invoice| format_cents(invoice.total),
            |invoice: &Invoice| paid_label(invoice.paid).to_string(),
        ],
    )
}

/// Invoice No., Date, Total, Status for a single vendor's invoices.
pub fn vendor_invoices_table(invoices: &[Invoice]) -> Table {
    Table::project(
        TableView::VendorInvoices,
        invoices,
        &[
            |invoice: &Invoice| invoice.invoice_no.clone(),
            |invoice: &Invoice| invoice.date.clone(),
            |invoice: &Invoice| format_cents(invoice.total),
            |invoice: &Invoice| paid_label(invoice.paid).to_string(),
        ],
    )
}

/// Product ID, Description, Quantity, Amount.
pub fn line_items_table(items: &[LineItem]) -> Table {
    Table::project(
        TableView::LineItems,
        items,
        &[
            |item: &LineItem| item.product_id.clone(),
            |item: &LineItem| item.description.clone(),
            |item: &LineItem| item.quantity.to_string(),
            |item: &LineItem| format_cents(item.amount),
        ],
    )
}

/// Line-item grid for the current selection; `None` gives the
/// "Select An Invoice" placeholder.
pub fn line_items_view(selection: Option<&[LineItem]>) -> Table {
    match selection {
        Some(items) => line_items_table(items),
        None => Table::select_invoice(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(vendor: &str, invoice_no: &str, total: i64, paid: bool) -> Invoice {
        Invoice {
            invoice_no: invoice_no.to_string(),
            date: "02/24/2018".to_string(),
            total,
            paid,
            ..Invoice::new(vendor)
        }
    }

    #[test]
    fn all_invoices_table_is_column_major() {
        let invoices = vec![
            invoice("Right Company", "123456", 3790, true),
            invoice("Ozz", "4552367", 9999, false),
        ];
        let table = all_invoices_table(&invoices);

        assert_eq!(table.column_count(), 5);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns()[0], vec!["Right Company", "Ozz"]);
        assert_eq!(table.cell(3, 0), Some("$37.90"));
        assert_eq!(table.cell(4, 1), Some("Not Paid"));
        assert_eq!(table.cell(5, 0), None);
        assert_eq!(
            table.row(1),
            Some(vec!["Ozz", "4552367", "02/24/2018", "$99.99", "Not Paid"])
        );
    }

    #[test]
    fn vendor_table_drops_vendor_column() {
        let table = vendor_invoices_table(&[invoice("Ozz", "4552367", 9999, true)]);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.cell(0, 0), Some("4552367"));
        assert_eq!(table.header(0), Some("Invoice No."));
        assert_eq!(table.cell(3, 0), Some("Paid"));
    }

    #[test]
    fn line_items_render_quantity_and_amount() {
        let items = vec![LineItem::new("rw-297", "Wrong side out shirts", 7, 1499).unwrap()];
        let table = line_items_table(&items);
        assert_eq!(table.cell(2, 0), Some("7"));
        assert_eq!(table.cell(3, 0), Some("$14.99"));
    }

    #[test]
    fn empty_input_keeps_every_column() {
        let table = all_invoices_table(&[]);
        assert_eq!(table.column_count(), 5);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.rows().count(), 0);
    }

    #[test]
    fn headers_per_view() {
        assert_eq!(TableView::AllInvoices.header(0), Some("Vendor"));
        assert_eq!(TableView::AllInvoices.header(4), Some("Status"));
        assert_eq!(TableView::AllInvoices.header(5), None);
        assert_eq!(TableView::VendorInvoices.header(3), Some("Status"));
        assert_eq!(TableView::LineItems.header(0), Some("Product ID"));
        assert_eq!(TableView::LineItems.header(3), Some("Amount"));
        assert_eq!(TableView::SelectInvoice.header(0), Some("Select An Invoice"));
        assert_eq!(TableView::SelectInvoice.header(1), None);
    }

    #[test]
    fn line_item_header_toggles_on_selection() {
        let placeholder = line_items_view(None);
        assert_eq!(placeholder.view(), TableView::SelectInvoice);
        assert_eq!(placeholder.column_count(), 1);
        assert_eq!(placeholder.row_count(), 0);

        let selected = line_items_view(Some(&[]));
        assert_eq!(selected.view(), TableView::LineItems);
        assert_eq!(selected.column_count(), 4);
    }
}
