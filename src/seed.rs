//! Demo dataset for a fresh store: six invoices across five vendors, one of
//! which (Niche Electronics) has two invoices so the vendor views have
//! something to group.

use tracing::info;

use crate::db::Repository;
use crate::error::Result;
use crate::models::{Invoice, LineItem, Location};

/// Build the demo invoices with ids left unassigned.
pub fn demo_invoices() -> Vec<Invoice> {
    vec![
        demo(
            "Right Company",
            ("123 Right Way Dr.", "Smalltown", "TX", "77336"),
            &[("90d-p", "Right angle pencils", 5, 758)],
            ("123456", "02/24/2018", "1200364"),
            3790,
            true,
        ),
        demo(
            "Wrong Company",
            ("199 Wrong Way Dr.", "Bigtown", "TX", "63377"),
            &[
                ("rw-297", "Wrong side out shirts", 7, 1499),
                ("rw-3041", "Wrong way street signs", 1, 17989),
            ],
            ("15647", "03/08/2018", "1200372"),
            28482,
            true,
        ),
        demo(
            "Niche Electronics",
            ("777 Electric Blvd.", "Teslatown", "IN", "77117"),
            &[("el-459-h", "Electric hammers", 8, 1785)],
            ("143356", "12/19/2017", "1200031"),
            14280,
            false,
        ),
        demo(
            "The Broken Company",
            ("173 Crooked Rd.", "Broken City", "GA", "10035"),
            &[("77256103", "Broken computers", 3, 65211)],
            ("326679", "04/30/2018", "1200499"),
            195633,
            true,
        ),
        demo(
            "Ozz",
            ("987 Yellow Brick Rd.", "Knowhere", "KS", "33665"),
            &[("d-9128", "Red shoes", 1, 9999)],
            ("4552367", "05/01/2018", "1200506"),
            9999,
            false,
        ),
        demo(
            "Niche Electronics",
            ("777 Electric Blvd.", "Teslatown", "IN", "77117"),
            &[("el-376-b", "Power back scratchers", 4, 976)],
            ("143512", "01/27/2018", "1200126"),
            3904,
            true,
        ),
    ]
}

/// Insert the demo invoices through the normal add path, but only into an
/// empty store. Returns how many were inserted.
pub fn seed_if_empty(repo: &Repository) -> Result<usize> {
    if repo.total_count()? > 0 {
        info!("store already has invoices, skipping demo data");
        return Ok(0);
    }

    let invoices = demo_invoices();
    let inserted = invoices.len();
    for invoice in invoices {
        repo.add_invoice(invoice)?;
    }

    info!(inserted, "seeded demo invoices");
    Ok(inserted)
}

fn demo(
    vendor: &str,
    (street, city, state, zipcode): (&str, &str, &str, &str),
    items: &[(&str, &str, u16, i64)],
    (invoice_no, date, purchase_order): (&str, &str, &str),
    total: i64,
    paid: bool,
) -> Invoice {
    Invoice {
        address: Location {
            street: street.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zipcode: zipcode.to_string(),
        },
        line_items: items
            .iter()
            .map(|&(product_id, description, quantity, amount)| LineItem {
                product_id: product_id.to_string(),
                description: description.to_string(),
                quantity,
                amount,
            })
            .collect(),
        invoice_no: invoice_no.to_string(),
        date: date.to_string(),
        purchase_order: purchase_order.to_string(),
        total,
        paid,
        ..Invoice::new(vendor)
    }
}
