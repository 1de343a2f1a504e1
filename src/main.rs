//! Binary entry point: a small command-line consumer of the invoice store.
//! It opens the repository, runs one command, and prints the projected
//! tables as tab-separated text with the header row first.
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use invoice_tracker::models::DEFAULT_CURRENCY;
use invoice_tracker::{
    all_invoices_table, format_cents, line_items_table, line_items_view, paid_label,
    parse_amount, seed, vendor_invoices_table, Config, Invoice, LineItem, Location, Repository,
    Table,
};

#[derive(Parser, Debug)]
#[command(name = "invoice-tracker")]
#[command(about = "Track vendor invoices and their payment status")]
struct Cli {
    /// SQLite database file (defaults to ~/.invoice-tracker/invoices.sqlite).
    #[arg(long, env = "INVOICE_TRACKER_DB")]
    database: Option<PathBuf>,

    /// How long to wait on a locked database, in milliseconds.
    #[arg(long, env = "INVOICE_TRACKER_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    busy_timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and schema if missing.
    Init,
    /// Load the demo invoices into an empty store.
    Seed,
    /// Record a new invoice.
    Add(AddArgs),
    /// Invoice table for every vendor, or for one vendor.
    List {
        #[arg(long)]
        vendor: Option<String>,
    },
    /// Line items of one invoice. Without arguments prints the empty grid.
    Items {
        #[arg(requires = "vendor")]
        invoice_no: Option<String>,
        vendor: Option<String>,
    },
    /// Vendor search; every term must appear in the vendor name.
    Search {
        #[arg(required = true, num_args = 1..)]
        terms: Vec<String>,
    },
    /// Vendors with their address and invoice count.
    Vendors,
    /// Store-wide counts.
    Stats,
    /// Full details of one invoice.
    Show { id: i64 },
    /// Mark an invoice as paid.
    MarkPaid { id: i64 },
    /// Remove an invoice.
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    vendor: String,
    #[arg(long)]
    invoice_no: String,
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long, default_value = "")]
    purchase_order: String,
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    currency: String,
    #[arg(long, default_value = "")]
    street: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value = "")]
    zipcode: String,
    /// Line item as PRODUCT:DESCRIPTION:QUANTITY:PRICE, e.g. `rw-297:Shirts:7:14.99`.
    /// Repeat for more items.
    #[arg(long = "item", value_name = "ITEM")]
    items: Vec<String>,
    /// Invoice total in dollars. Defaults to the sum of the line items.
    #[arg(long)]
    total: Option<String>,
}

impl AddArgs {
    fn into_invoice(self) -> Result<Invoice> {
        let line_items = self
            .items
            .iter()
            .map(|spec| parse_item(spec))
            .collect::<Result<Vec<_>>>()?;

        let mut invoice = Invoice {
            address: Location {
                street: self.street,
                city: self.city,
                state: self.state,
                zipcode: self.zipcode,
            },
            line_items,
            invoice_no: self.invoice_no,
            date: self.date,
            purchase_order: self.purchase_order,
            currency: self.currency,
            ..Invoice::new(self.vendor)
        };
        invoice.total = match self.total {
            Some(total) => parse_amount(&total).context("invalid invoice total")?,
            None => invoice.line_items_total(),
        };

        Ok(invoice)
    }
}

/// Parse `PRODUCT:DESCRIPTION:QUANTITY:PRICE`. The description may itself
/// contain colons.
fn parse_item(spec: &str) -> Result<LineItem> {
    let malformed = || anyhow!("line item {spec:?} is not PRODUCT:DESCRIPTION:QUANTITY:PRICE");

    let (product_id, rest) = spec.split_once(':').ok_or_else(malformed)?;
    let (rest, price) = rest.rsplit_once(':').ok_or_else(malformed)?;
    let (description, quantity) = rest.rsplit_once(':').ok_or_else(malformed)?;

    let quantity: u32 = quantity
        .trim()
        .parse()
        .with_context(|| format!("invalid quantity in line item {spec:?}"))?;
    let amount =
        parse_amount(price).with_context(|| format!("invalid price in line item {spec:?}"))?;

    LineItem::new(product_id, description, quantity, amount)
        .with_context(|| format!("invalid line item {spec:?}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("invoice_tracker=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.database {
        Some(path) => Config::new(path),
        None => Config::default_location().ok_or_else(|| anyhow!("could not locate home directory"))?,
    }
    .with_busy_timeout(Duration::from_millis(cli.busy_timeout_ms));

    let repo = Repository::open(config).context("failed to open invoice store")?;
    run(&repo, cli.command)
}

fn run(repo: &Repository, command: Command) -> Result<()> {
    match command {
        Command::Init => {
            println!("invoice store ready at {}", repo.config().db_path.display());
        }
        Command::Seed => {
            let inserted = seed::seed_if_empty(repo).context("failed to seed demo invoices")?;
            println!("inserted {inserted} demo invoices");
        }
        Command::Add(args) => {
            let invoice = args.into_invoice()?;
            let stored = repo
                .add_invoice(invoice)
                .context("failed to add invoice")?;
            println!(
                "added invoice {} from {} with id {} ({})",
                stored.invoice_no,
                stored.vendor,
                stored.id,
                format_cents(stored.total)
            );
        }
        Command::List { vendor: None } => {
            let invoices = repo.list_all_projected().context("failed to list invoices")?;
            print_table(&all_invoices_table(&invoices));
        }
        Command::List {
            vendor: Some(vendor),
        } => {
            let invoices = repo
                .list_by_vendor(&vendor)
                .context("failed to list vendor invoices")?;
            print_table(&vendor_invoices_table(&invoices));
        }
        Command::Items { invoice_no, vendor } => {
            let items = match (invoice_no, vendor) {
                (Some(invoice_no), Some(vendor)) => Some(
                    repo.line_items_for(&invoice_no, &vendor)
                        .context("failed to load line items")?,
                ),
                _ => None,
            };
            print_table(&line_items_view(items.as_deref()));
        }
        Command::Search { terms } => {
            let invoices = repo
                .search_by_vendor_substring(&terms.join(" "))
                .context("vendor search failed")?;
            print_table(&all_invoices_table(&invoices));
        }
        Command::Vendors => {
            for vendor in repo.distinct_vendors().context("failed to list vendors")? {
                let profile = repo
                    .vendor_profile(&vendor)
                    .with_context(|| format!("failed to load vendor {vendor}"))?;
                let address = &profile.address;
                println!(
                    "{}\t{}, {}, {} {}\t{} invoices",
                    profile.vendor,
                    address.street,
                    address.city,
                    address.state,
                    address.zipcode,
                    profile.invoice_count
                );
            }
        }
        Command::Stats => {
            let summary = repo.summary().context("failed to compute summary")?;
            println!("Vendor Count: {}", summary.vendors);
            println!("Invoice Count: {}", summary.invoices);
            println!("Paid/Not Paid Count: {}/{}", summary.paid, summary.unpaid);
        }
        Command::Show { id } => {
            let invoice = repo.find_by_id(id).context("failed to load invoice")?;
            println!("Vendor:\t{}", invoice.vendor);
            println!(
                "Address:\t{}, {}, {} {}",
                invoice.address.street,
                invoice.address.city,
                invoice.address.state,
                invoice.address.zipcode
            );
            println!("Invoice No.:\t{}", invoice.invoice_no);
            println!("Date:\t{}", invoice.date);
            println!("Purchase Order:\t{}", invoice.purchase_order);
            println!("Total:\t{}", format_cents(invoice.total));
            println!("Status:\t{}", paid_label(invoice.paid));
            println!("Currency:\t{}", invoice.currency);
            println!();
            print_table(&line_items_table(&invoice.line_items));
        }
        Command::MarkPaid { id } => {
            let mut invoice = repo.find_by_id(id).context("failed to load invoice")?;
            invoice.paid = true;
            repo.update_invoice(&invoice)
                .context("failed to update invoice")?;
            println!("invoice {id} marked as paid");
        }
        Command::Delete { id } => {
            repo.delete_invoice(id).context("failed to delete invoice")?;
            println!("deleted invoice {id}");
        }
    }

    Ok(())
}

fn print_table(table: &Table) {
    println!("{}", table.view().headers().join("\t"));
    for row in table.rows() {
        println!("{}", row.join("\t"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_args(extra: &[&str]) -> AddArgs {
        let mut argv = vec![
            "invoice-tracker",
            "add",
            "--vendor",
            "Wrong Company",
            "--invoice-no",
            "15647",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Add(args) => args,
            other => panic!("parsed as {other:?}"),
        }
    }

    #[test]
    fn item_spec_parses_quantity_and_price() {
        let item = parse_item("rw-297:Wrong side out shirts:7:14.99").unwrap();
        assert_eq!(item.product_id, "rw-297");
        assert_eq!(item.description, "Wrong side out shirts");
        assert_eq!(item.quantity, 7);
        assert_eq!(item.amount, 1499);

        let item = parse_item("x1:Cable: 2m:3:$5").unwrap();
        assert_eq!(item.description, "Cable: 2m");
        assert_eq!(item.amount, 500);
    }

    #[test]
    fn item_spec_rejects_bad_input() {
        assert!(parse_item("rw-297:shirts").is_err());
        assert!(parse_item("rw-297:shirts:many:1.00").is_err());
        assert!(parse_item("rw-297:shirts:1:1.999").is_err());

        let err = parse_item("rw-297:shirts:70000:1.00").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<invoice_tracker::Error>(),
            Some(invoice_tracker::Error::Validation(_))
        ));
    }

    #[test]
    fn add_defaults_total_to_line_items_and_currency_to_usd() {
        let invoice = add_args(&[
            "--item",
            "rw-297:Shirts:7:14.99",
            "--item",
            "rw-3041:Parachute pants:1:179.89",
        ])
        .into_invoice()
        .unwrap();

        assert_eq!(invoice.line_items.len(), 2);
        assert_eq!(invoice.total, 7 * 1499 + 17989);
        assert_eq!(invoice.currency, "USD");
        assert!(!invoice.paid);
        assert_eq!(invoice.id, 0);
    }

    #[test]
    fn add_accepts_explicit_total_and_address() {
        let invoice = add_args(&[
            "--total",
            "284.82",
            "--city",
            "Bigtown",
            "--currency",
            "EUR",
        ])
        .into_invoice()
        .unwrap();

        assert_eq!(invoice.total, 28482);
        assert_eq!(invoice.address.city, "Bigtown");
        assert_eq!(invoice.currency, "EUR");
        assert!(invoice.line_items.is_empty());
    }

    #[test]
    fn add_command_reports_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::open(Config::new(dir.path().join("invoices.sqlite"))).unwrap();

        run(&repo, Command::Add(add_args(&["--item", "p1:bolt:2:5.00"]))).unwrap();
        let stored = repo
            .find_by_invoice_no_and_vendor("15647", "Wrong Company")
            .unwrap();
        assert_eq!(stored.total, 1000);

        let err = run(&repo, Command::Add(add_args(&[]))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<invoice_tracker::Error>(),
            Some(invoice_tracker::Error::DuplicateInvoice { .. })
        ));
        assert_eq!(repo.total_count().unwrap(), 1);
    }
}
