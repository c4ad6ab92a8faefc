use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::LedgerSummary;
use crate::model::{LineId, LineItem};
use crate::session::FormEdit;

/// Errors that can occur when reading csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("cannot open {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized edit type '{edit_type}'")]
    UnrecognizedType { line: usize, edit_type: String },

    #[error("line {line}: {edit_type} missing {field}")]
    MissingField {
        line: usize,
        edit_type: String,
        field: &'static str,
    },

    #[error("line {line}: {field} '{value}' is not a number")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    r#type: String,
    line: Option<LineId>,
    unit_price: Option<String>,
    quantity: Option<String>,
    discount: Option<String>,
    amount: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    subtotal: String,
    discount_amount: String,
    net_after_discount: String,
    vat: String,
    grand_total: String,
    amount_paid: String,
    balance_due: String,
    payment_status: &'static str,
}

/// Open a csv file of form edits
pub fn open_edits(
    path: &Path,
) -> Result<impl Iterator<Item = Result<FormEdit, CsvError>> + use<>, CsvError> {
    let file = File::open(path).map_err(|source| CsvError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(read_edits(file))
}

/// Read form edits from csv
pub fn read_edits<R: io::Read>(reader: R) -> impl Iterator<Item = Result<FormEdit, CsvError>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_row(line, row)
        })
}

fn parse_row(line: usize, row: InputRow) -> Result<FormEdit, CsvError> {
    let edit_type = row.r#type.as_str();
    let missing = |field| CsvError::MissingField {
        line,
        edit_type: edit_type.to_string(),
        field,
    };

    match edit_type {
        "add" | "update" => {
            let id = row.line.ok_or_else(|| missing("line"))?;
            let unit_price = row.unit_price.as_deref().ok_or_else(|| missing("unit_price"))?;
            let item = LineItem::new(
                decimal(line, "unit_price", unit_price)?,
                optional_decimal(line, "quantity", row.quantity.as_deref(), Decimal::ONE)?,
                optional_decimal(line, "discount", row.discount.as_deref(), Decimal::ZERO)?,
            );
            Ok(if edit_type == "add" {
                FormEdit::AddLine { line: id, item }
            } else {
                FormEdit::UpdateLine { line: id, item }
            })
        }
        "remove" => {
            let id = row.line.ok_or_else(|| missing("line"))?;
            Ok(FormEdit::RemoveLine { line: id })
        }
        "paid" => {
            let amount = row.amount.as_deref().ok_or_else(|| missing("amount"))?;
            Ok(FormEdit::SetAmountPaid {
                amount: decimal(line, "amount", amount)?,
            })
        }
        "vat" => {
            let rate = row.amount.as_deref().ok_or_else(|| missing("amount"))?;
            Ok(FormEdit::SetVatRate {
                rate: decimal(line, "amount", rate)?,
            })
        }
        other => Err(CsvError::UnrecognizedType {
            line,
            edit_type: other.to_string(),
        }),
    }
}

fn decimal(line: usize, field: &'static str, value: &str) -> Result<Decimal, CsvError> {
    Decimal::from_str(value).map_err(|_| CsvError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

fn optional_decimal(
    line: usize,
    field: &'static str,
    value: Option<&str>,
    default: Decimal,
) -> Result<Decimal, CsvError> {
    value.map_or(Ok(default), |value| decimal(line, field, value))
}

/// Write a ledger summary in csv format
pub fn write_summary<W: io::Write>(writer: W, summary: &LedgerSummary) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.serialize(OutputRow {
        subtotal: summary.subtotal.to_string(),
        discount_amount: summary.discount_amount.to_string(),
        net_after_discount: summary.net_after_discount.to_string(),
        vat: summary.vat.to_string(),
        grand_total: summary.grand_total.to_string(),
        amount_paid: summary.amount_paid.to_string(),
        balance_due: summary.balance_due.to_string(),
        payment_status: summary.payment_status.as_str(),
    })?;
    writer.flush()?;
    Ok(())
}
