//! Property checks for the table projections and money formatting.

use invoice_tracker::{
    all_invoices_table, format_cents, line_items_table, paid_label, vendor_invoices_table,
    Invoice, LineItem, TableView,
};
use proptest::prelude::*;

fn invoice_strategy() -> impl Strategy<Value = Invoice> {
    (
        "[A-Za-z ]{1,16}",
        "[0-9]{1,8}",
        "[0-9/]{0,10}",
        0i64..10_000_000,
        any::<bool>(),
    )
        .prop_map(|(vendor, invoice_no, date, total, paid)| Invoice {
            invoice_no,
            date,
            total,
            paid,
            ..Invoice::new(vendor)
        })
}

fn line_item_strategy() -> impl Strategy<Value = LineItem> {
    ("[a-z0-9-]{1,10}", "[A-Za-z ]{0,20}", any::<u16>(), 0i64..1_000_000).prop_map(
        |(product_id, description, quantity, amount)| LineItem {
            product_id,
            description,
            quantity,
            amount,
        },
    )
}

/// Undo `format_cents` by hand so the property does not reuse its logic.
fn parse_cents(text: &str) -> i128 {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let digits = rest.strip_prefix('$').expect("currency symbol");
    let (whole, fraction) = digits.split_once('.').expect("decimal point");
    assert_eq!(fraction.len(), 2, "two fractional digits in {text}");
    assert!(!whole.is_empty(), "integer digit in {text}");

    let value = whole.parse::<i128>().unwrap() * 100 + fraction.parse::<i128>().unwrap();
    if negative {
        -value
    } else {
        value
    }
}

proptest! {
    #[test]
    fn format_cents_preserves_value(cents in any::<i64>()) {
        prop_assert_eq!(parse_cents(&format_cents(cents)), i128::from(cents));
    }

    #[test]
    fn all_invoices_cells_match_fields(invoices in prop::collection::vec(invoice_strategy(), 0..12)) {
        let table = all_invoices_table(&invoices);

        prop_assert_eq!(table.column_count(), TableView::AllInvoices.column_count());
        prop_assert_eq!(table.row_count(), invoices.len());
        for (row, invoice) in invoices.iter().enumerate() {
            prop_assert_eq!(table.cell(0, row), Some(invoice.vendor.as_str()));
            prop_assert_eq!(table.cell(1, row), Some(invoice.invoice_no.as_str()));
            prop_assert_eq!(table.cell(2, row), Some(invoice.date.as_str()));
            let total = format_cents(invoice.total);
            prop_assert_eq!(table.cell(3, row), Some(total.as_str()));
            prop_assert_eq!(table.cell(4, row), Some(paid_label(invoice.paid)));
        }

        prop_assert_eq!(all_invoices_table(&invoices), table);
    }

    #[test]
    fn vendor_cells_match_fields(invoices in prop::collection::vec(invoice_strategy(), 0..12)) {
        let table = vendor_invoices_table(&invoices);

        prop_assert_eq!(table.column_count(), 4);
        prop_assert_eq!(table.row_count(), invoices.len());
        for (row, invoice) in invoices.iter().enumerate() {
            prop_assert_eq!(table.cell(0, row), Some(invoice.invoice_no.as_str()));
            prop_assert_eq!(table.cell(1, row), Some(invoice.date.as_str()));
            let total = format_cents(invoice.total);
            prop_assert_eq!(table.cell(2, row), Some(total.as_str()));
            prop_assert_eq!(table.cell(3, row), Some(paid_label(invoice.paid)));
        }
        prop_assert_eq!(vendor_invoices_table(&invoices), table);
    }

    #[test]
    fn line_item_cells_match_fields(items in prop::collection::vec(line_item_strategy(), 0..12)) {
        let table = line_items_table(&items);

        prop_assert_eq!(table.column_count(), 4);
        prop_assert_eq!(table.row_count(), items.len());
        for (row, item) in items.iter().enumerate() {
            prop_assert_eq!(table.cell(0, row), Some(item.product_id.as_str()));
            prop_assert_eq!(table.cell(1, row), Some(item.description.as_str()));
            let quantity = item.quantity.to_string();
            prop_assert_eq!(table.cell(2, row), Some(quantity.as_str()));
            let amount = format_cents(item.amount);
            prop_assert_eq!(table.cell(3, row), Some(amount.as_str()));
        }
        prop_assert_eq!(line_items_table(&items), table);
    }
}

#[test]
fn header_labels_line_up_with_columns() {
    let table = all_invoices_table(&[]);
    let headers: Vec<_> = (0..table.column_count())
        .map(|column| table.header(column))
        .collect();
    assert_eq!(
        headers,
        vec![
            Some("Vendor"),
            Some("Invoice No."),
            Some("Date"),
            Some("Total"),
            Some("Status"),
        ]
    );
    assert_eq!(table.header(table.column_count()), None);
}
