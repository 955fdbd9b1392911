//! Loading the upstream sales CSV export into canonical records.
//!
//! The export's header names vary between pharmacy system versions
//! (`PHARMACISTNAME` vs `Pharmacist`, `INVOICEDATE` vs `Date`), so columns
//! are resolved once by case-insensitive alias lookup. Rows with dates or
//! revenue amounts that fail to parse are dropped and counted rather than
//! failing the whole load; the aggregation layer never sees them.

use std::{fs::File, io::Read, path::Path};

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    record::{TransactionRecord, location_key, pharmacist_key},
};

/// Amounts beyond this magnitude are treated as data corruption.
const AMOUNT_LIMIT: f64 = 1_000_000.0;

/// The export's primary date format.
const DAY_FIRST_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

/// Fallback for feeds that already use ISO dates.
const ISO_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Accepted header spellings per column, compared case-insensitively.
const DATE_ALIASES: &[&str] = &["INVOICEDATE", "DATE"];
const AMOUNT_ALIASES: &[&str] = &["NETREVENUEAMOUNT"];
const PHARMACIST_ALIASES: &[&str] = &["PHARMACISTNAME", "PHARMACIST"];
const LOCATION_ALIASES: &[&str] = &["LOCATIONNAME", "LOCATION"];
const CASH_ALIASES: &[&str] = &["CASHREVENUE"];
const CREDIT_ALIASES: &[&str] = &["CREDITREVENUE"];
const INVOICE_ALIASES: &[&str] = &["INVOICENUMBER"];

struct Columns {
    date: usize,
    amount: usize,
    pharmacist: Option<usize>,
    location: Option<usize>,
    cash: Option<usize>,
    credit: Option<usize>,
    invoice: Option<usize>,
}

/// Loads and parses the sales CSV at `path`.
///
/// # Errors
/// Returns [Error::InvalidCsv] if the file cannot be opened or read, and
/// [Error::MissingColumn] if a required column is absent.
pub fn load_records_from_path(path: &Path) -> Result<Vec<TransactionRecord>, Error> {
    let file = File::open(path)
        .map_err(|error| Error::InvalidCsv(format!("could not open {}: {error}", path.display())))?;

    tracing::info!("loading sales data from {}", path.display());
    parse_records(file)
}

/// Parses sales records from CSV text.
///
/// Rows with unparseable dates or amounts, or amounts outside
/// ±1,000,000, are dropped and logged. Pharmacist names are normalized to
/// their two-token grouping key and blank locations become "Unknown".
///
/// # Errors
/// Returns [Error::MissingColumn] when the date or revenue column cannot be
/// found, or [Error::InvalidCsv] when the CSV itself is malformed.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<TransactionRecord>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|error| Error::InvalidCsv(error.to_string()))?;
    let columns = resolve_columns(headers)?;

    let mut records = Vec::new();
    let mut skipped_dates = 0usize;
    let mut skipped_amounts = 0usize;
    let mut out_of_range = 0usize;

    for row in csv_reader.records() {
        let row = row.map_err(|error| Error::InvalidCsv(error.to_string()))?;

        let Some(date) = row.get(columns.date).and_then(parse_date) else {
            skipped_dates += 1;
            continue;
        };

        let Some(net_amount) = row.get(columns.amount).and_then(parse_amount) else {
            skipped_amounts += 1;
            continue;
        };

        if net_amount.abs() > AMOUNT_LIMIT {
            out_of_range += 1;
            continue;
        }

        let field = |index: Option<usize>| index.and_then(|index| row.get(index)).unwrap_or("");

        let invoice_number = {
            let invoice = field(columns.invoice).trim();
            (!invoice.is_empty()).then(|| invoice.to_owned())
        };

        records.push(TransactionRecord {
            date,
            net_amount,
            cash_revenue: parse_amount(field(columns.cash)).unwrap_or(0.0),
            credit_revenue: parse_amount(field(columns.credit)).unwrap_or(0.0),
            location: location_key(field(columns.location)),
            pharmacist: pharmacist_key(field(columns.pharmacist)),
            invoice_number,
        });
    }

    let dropped = skipped_dates + skipped_amounts + out_of_range;
    if dropped > 0 {
        tracing::warn!(
            "dropped {dropped} rows ({skipped_dates} bad dates, {skipped_amounts} bad amounts, \
            {out_of_range} out of range)"
        );
    }
    tracing::info!("loaded {} sales records", records.len());

    Ok(records)
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, Error> {
    let find = |aliases: &[&str]| {
        headers.iter().position(|header| {
            aliases
                .iter()
                .any(|alias| header.trim().eq_ignore_ascii_case(alias))
        })
    };

    Ok(Columns {
        date: find(DATE_ALIASES).ok_or_else(|| Error::MissingColumn("INVOICEDATE".to_owned()))?,
        amount: find(AMOUNT_ALIASES)
            .ok_or_else(|| Error::MissingColumn("NETREVENUEAMOUNT".to_owned()))?,
        pharmacist: find(PHARMACIST_ALIASES),
        location: find(LOCATION_ALIASES),
        cash: find(CASH_ALIASES),
        credit: find(CREDIT_ALIASES),
        invoice: find(INVOICE_ALIASES),
    })
}

fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    Date::parse(text, DAY_FIRST_FORMAT)
        .or_else(|_| Date::parse(text, ISO_FORMAT))
        .ok()
}

fn parse_amount(text: &str) -> Option<f64> {
    let parsed: f64 = text.trim().parse().ok()?;

    parsed.is_finite().then_some(parsed)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::Error;

    use super::parse_records;

    #[test]
    fn parses_the_upstream_export_headers() {
        let csv = "\
INVOICENUMBER,INVOICEDATE,NETREVENUEAMOUNT,PHARMACISTNAME,LOCATIONNAME,CASHREVENUE,CREDITREVENUE
INV-1,15/01/2024,120.50,Jane Mary Doe,Main Branch,100.50,20.00
INV-2,16/01/2024,-20.00,John Smith,North Branch,20.00,0.00
";

        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, date!(2024 - 01 - 15));
        assert_eq!(records[0].net_amount, 120.50);
        assert_eq!(records[0].pharmacist, "Jane Mary");
        assert_eq!(records[0].location, "Main Branch");
        assert_eq!(records[0].cash_revenue, 100.50);
        assert_eq!(records[0].invoice_number.as_deref(), Some("INV-1"));
        assert_eq!(records[1].net_amount, -20.0);
    }

    #[test]
    fn accepts_alias_header_spellings() {
        let csv = "\
Date,NetRevenueAmount,Pharmacist
2024-01-15,50.0,Jane Mary
";

        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, date!(2024 - 01 - 15));
        assert_eq!(records[0].pharmacist, "Jane Mary");
        assert_eq!(records[0].location, "Unknown");
        assert_eq!(records[0].cash_revenue, 0.0);
        assert!(records[0].invoice_number.is_none());
    }

    #[test]
    fn drops_rows_with_bad_dates_or_amounts() {
        let csv = "\
INVOICEDATE,NETREVENUEAMOUNT
15/01/2024,100.0
not-a-date,50.0
16/01/2024,not-a-number
17/01/2024,25.0
";

        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].net_amount, 100.0);
        assert_eq!(records[1].net_amount, 25.0);
    }

    #[test]
    fn rejects_amounts_outside_the_sane_range() {
        let csv = "\
INVOICEDATE,NETREVENUEAMOUNT
15/01/2024,100.0
16/01/2024,2000000.0
17/01/2024,-1500000.0
";

        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn requires_the_revenue_column() {
        let csv = "\
INVOICEDATE,PHARMACISTNAME
15/01/2024,Jane Mary
";

        let error = parse_records(csv.as_bytes()).unwrap_err();

        assert!(matches!(error, Error::MissingColumn(column) if column == "NETREVENUEAMOUNT"));
    }

    #[test]
    fn blank_names_normalize_to_unknown() {
        let csv = "\
INVOICEDATE,NETREVENUEAMOUNT,PHARMACISTNAME,LOCATIONNAME
15/01/2024,100.0,,
";

        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records[0].pharmacist, "Unknown");
        assert_eq!(records[0].location, "Unknown");
    }
}
