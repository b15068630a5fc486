//! Bulk transaction upload and CSV exports.

use std::{
    io::{Read, Write},
    str::FromStr,
};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use halo_domain::{
    new_id, PaymentMethod, Transaction, TransactionKind, TransactionType, DEFAULT_CURRENCY,
};
use rust_decimal::Decimal;

use crate::{aggregate::ProfitAndLoss, period::local_to_utc, CoreError};

pub const TRANSACTION_CSV_HEADERS: [&str; 8] = [
    "date",
    "type",
    "category",
    "method",
    "amount",
    "currency",
    "source_or_vendor",
    "notes",
];

/// Creator recorded on every imported transaction.
pub const CSV_UPLOAD_USER: &str = "csv-upload";

/// Parses an upload into transactions. Any bad row rejects the whole file;
/// rows are reported 1-based counting the header, so the first data row is 2.
///
/// Naive date-times are read in `offset`; bare dates are midnight UTC.
pub fn parse_transactions_csv<R: Read>(
    reader: R,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<Vec<Transaction>, CoreError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = csv
        .records()
        .filter(|record| match record {
            Ok(record) => record.iter().any(|field| !field.is_empty()),
            Err(_) => true,
        });

    let header = records
        .next()
        .transpose()?
        .ok_or_else(|| CoreError::Validation("CSV is empty or has no header.".into()))?;
    let header_matches = header.len() == TRANSACTION_CSV_HEADERS.len()
        && header
            .iter()
            .zip(TRANSACTION_CSV_HEADERS)
            .all(|(actual, expected)| actual == expected);
    if !header_matches {
        let err = CoreError::CsvHeader {
            expected: TRANSACTION_CSV_HEADERS.join(", "),
        };
        tracing::warn!(error = %err, "rejected CSV upload");
        return Err(err);
    }

    let mut transactions = Vec::new();
    for (index, record) in records.enumerate() {
        let row = index + 2;
        let record = record?;
        let field = |position: usize| record.get(position).unwrap_or_default();
        let raw = RawRow {
            date: field(0),
            kind: field(1),
            category: field(2),
            method: field(3),
            amount: field(4),
            source_or_vendor: field(6),
            notes: field(7),
        };
        match raw.parse(row, offset, now) {
            Ok(txn) => transactions.push(txn),
            Err(err) => {
                tracing::warn!(error = %err, "rejected CSV upload");
                return Err(err);
            }
        }
    }
    tracing::info!(rows = transactions.len(), "parsed CSV upload");
    Ok(transactions)
}

/// Trimmed fields of one upload row, in header order. `currency` is ignored.
struct RawRow<'a> {
    date: &'a str,
    kind: &'a str,
    category: &'a str,
    method: &'a str,
    amount: &'a str,
    source_or_vendor: &'a str,
    notes: &'a str,
}

impl RawRow<'_> {
    fn parse(&self, row: usize, offset: FixedOffset, now: DateTime<Utc>) -> Result<Transaction, CoreError> {
        if self.date.is_empty() || self.kind.is_empty() || self.amount.is_empty() {
            return Err(row_error(row, "Missing required data"));
        }
        let amount = Decimal::from_str(self.amount)
            .or_else(|_| Decimal::from_scientific(self.amount))
            .map_err(|_| row_error(row, "Invalid amount"))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(row_error(row, "Invalid amount"));
        }
        let kind = TransactionType::from_str(self.kind).map_err(|_| {
            CoreError::csv_row(
                row,
                format!("Invalid transaction type on row {row}. Must be 'income' or 'expense'."),
            )
        })?;
        let date = parse_csv_date(self.date, offset).ok_or_else(|| row_error(row, "Invalid date"))?;
        let notes = Some(self.notes.to_string()).filter(|notes| !notes.is_empty());

        Ok(Transaction {
            id: new_id("csv"),
            date,
            amount,
            currency: DEFAULT_CURRENCY.into(),
            category: self.category.to_string(),
            method: PaymentMethod::from(self.method),
            kind: TransactionKind::from_type(kind, self.source_or_vendor),
            notes,
            created_by: CSV_UPLOAD_USER.into(),
            created_at: now,
            updated_at: now,
        })
    }
}

fn row_error(row: usize, reason: &str) -> CoreError {
    CoreError::csv_row(row, format!("{reason} on row {row}."))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]`, and `YYYY-MM-DD`.
pub fn parse_csv_date(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    if let Some(local) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(local_to_utc(local, offset));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc))
}

/// Writes `transactions` under the upload header so the file can be re-imported.
pub fn write_transactions_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), CoreError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(TRANSACTION_CSV_HEADERS)?;
    for txn in transactions {
        csv.write_record([
            txn.date.to_rfc3339_opts(SecondsFormat::Millis, true),
            txn.transaction_type().to_string(),
            txn.category.clone(),
            txn.method.to_string(),
            txn.amount.to_string(),
            txn.currency.clone(),
            txn.counterparty().to_string(),
            txn.notes.clone().unwrap_or_default(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_profit_and_loss_csv<W: Write>(writer: W, pnl: &ProfitAndLoss) -> Result<(), CoreError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Category", "Amount"])?;
    csv.write_record(["INCOME", ""])?;
    for item in &pnl.income_items {
        csv.write_record([format!("  {}", item.key), item.amount.to_string()])?;
    }
    csv.write_record(["Total Income".to_string(), pnl.total_income.to_string()])?;
    csv.write_record(["", ""])?;
    csv.write_record(["EXPENSES", ""])?;
    for item in &pnl.expense_items {
        csv.write_record([format!("  {}", item.key), item.amount.to_string()])?;
    }
    csv.write_record(["Total Expenses".to_string(), pnl.total_expenses.to_string()])?;
    csv.write_record(["", ""])?;
    csv.write_record(["NET PROFIT".to_string(), pnl.net_profit.to_string()])?;
    csv.flush()?;
    Ok(())
}
