//! CSV format handling for trip records and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to trip records
//! - Report serialization for each CSV view
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! # Input Format
//!
//! ```text
//! type,id,member,to,amount,name
//! member,a,,,,Alice
//! expense,e1,a,,90.00,Dinner
//! split,e1,b,,30.00,
//! split,e2,b,,,
//! transfer,t1,b,a,30.00,Paid back
//! ```
//!
//! A split row with an empty amount asks for an equal share.

use crate::types::{Member, SettlementError, SplitShare, Transfer, TripRecord, TripReport};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, id, member, to, amount, name.
/// Which columns are required depends on the record type.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub id: Option<String>,
    pub member: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
    pub name: Option<String>,
}

/// Trimmed value of an optional column, `None` when blank
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(
    value: Option<String>,
    record_type: &str,
    field: &str,
) -> Result<String, SettlementError> {
    present(value).ok_or_else(|| SettlementError::missing_field(record_type, field))
}

fn parse_amount(value: &str, record_type: &str) -> Result<Decimal, SettlementError> {
    Decimal::from_str(value).map_err(|_| SettlementError::invalid_amount(value, record_type))
}

/// Convert a CsvRecord to a TripRecord
///
/// This function:
/// - Matches the record type case-insensitively
/// - Checks that the columns the type needs are present
/// - Parses amounts into Decimal
///
/// Domain rules (positive amounts, unique ids, no self transfers) are left
/// to the snapshot builder.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<TripRecord, SettlementError> {
    let record_type = csv_record.record_type.trim().to_lowercase();

    match record_type.as_str() {
        "member" => Ok(TripRecord::Member(Member {
            id: required(csv_record.id, "member", "id")?,
            name: required(csv_record.name, "member", "name")?,
        })),
        "expense" => {
            let id = required(csv_record.id, "expense", "id")?;
            let payer_id = required(csv_record.member, "expense", "member")?;
            let amount = required(csv_record.amount, "expense", "amount")?;
            Ok(TripRecord::Expense {
                id,
                payer_id,
                amount: parse_amount(&amount, "expense")?,
                description: present(csv_record.name),
            })
        }
        "split" => {
            let expense_id = required(csv_record.id, "split", "id")?;
            let member_id = required(csv_record.member, "split", "member")?;
            let share = match present(csv_record.amount) {
                Some(amount) => SplitShare::Fixed(parse_amount(&amount, "split")?),
                None => SplitShare::Equal,
            };
            Ok(TripRecord::Split {
                expense_id,
                member_id,
                share,
            })
        }
        "transfer" => {
            let from_id = required(csv_record.member, "transfer", "member")?;
            let to_id = required(csv_record.to, "transfer", "to")?;
            let amount = required(csv_record.amount, "transfer", "amount")?;
            Ok(TripRecord::Transfer(Transfer {
                id: present(csv_record.id),
                from_id,
                to_id,
                amount: parse_amount(&amount, "transfer")?,
                description: present(csv_record.name),
            }))
        }
        _ => Err(SettlementError::InvalidRecordType {
            record_type: csv_record.record_type,
        }),
    }
}

fn write_failed(context: &str, error: impl Display) -> SettlementError {
    SettlementError::IoError {
        message: format!("Failed to write {}: {}", context, error),
    }
}

/// Write the balances view: trip, member, name, balance
pub fn write_balances_csv(
    reports: &[TripReport],
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["trip", "member", "name", "balance"])
        .map_err(|e| write_failed("CSV header", e))?;

    for trip in reports {
        for balance in &trip.report.balances {
            writer
                .write_record([
                    trip.trip.as_str(),
                    balance.member_id.as_str(),
                    balance.member_name.as_str(),
                    &format!("{:.2}", balance.balance),
                ])
                .map_err(|e| write_failed("balance record", e))?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write the settlements view: trip, from, from_name, to, to_name, amount
pub fn write_settlements_csv(
    reports: &[TripReport],
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["trip", "from", "from_name", "to", "to_name", "amount"])
        .map_err(|e| write_failed("CSV header", e))?;

    for trip in reports {
        for settlement in &trip.report.settlements {
            writer
                .write_record([
                    trip.trip.as_str(),
                    settlement.from.as_str(),
                    settlement.from_name.as_str(),
                    settlement.to.as_str(),
                    settlement.to_name.as_str(),
                    &format!("{:.2}", settlement.amount),
                ])
                .map_err(|e| write_failed("settlement record", e))?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write the matrix view: trip, debtor, creditor, amount for every pair
pub fn write_matrix_csv(
    reports: &[TripReport],
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["trip", "debtor", "creditor", "amount"])
        .map_err(|e| write_failed("CSV header", e))?;

    for trip in reports {
        for (debtor, creditor, amount) in trip.report.matrix.iter() {
            writer
                .write_record([
                    trip.trip.as_str(),
                    debtor.as_str(),
                    creditor.as_str(),
                    &format!("{:.2}", amount),
                ])
                .map_err(|e| write_failed("matrix record", e))?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write the stats view: trip, member, name, paid_count, total_paid, involved_count
pub fn write_stats_csv(
    reports: &[TripReport],
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "trip",
            "member",
            "name",
            "paid_count",
            "total_paid",
            "involved_count",
        ])
        .map_err(|e| write_failed("CSV header", e))?;

    for trip in reports {
        for stats in &trip.report.member_stats {
            writer
                .write_record([
                    trip.trip.as_str(),
                    stats.member_id.as_str(),
                    stats.member_name.as_str(),
                    &stats.paid_count.to_string(),
                    &format!("{:.2}", stats.total_paid),
                    &stats.involved_count.to_string(),
                ])
                .map_err(|e| write_failed("stats record", e))?;
        }
    }

    writer.flush()?;
    Ok(())
}
