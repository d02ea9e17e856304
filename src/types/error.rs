//! Error types for the trip settlement engine
//!
//! The settlement computation itself never fails. Errors come from loading
//! trip snapshots (files, CSV rows, record validation) and from writing
//! reports.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc. (fatal)
//! - **CSV Parsing Errors**: Malformed rows, unknown record types (record skipped)
//! - **Record Errors**: Invalid amounts, self transfers, duplicates (record skipped)
//! - **Expense Errors**: Splits that do not add up (expense rejected)
//! - **Reference Warnings**: Unknown member ids met during aggregation (contribution dropped)

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the settlement engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// I/O error while reading a trip or writing a report
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// CSV row could not be parsed
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError { line: Option<u64>, message: String },

    /// A parsed row was rejected, with the line it came from
    #[error("Line {line}: {source}")]
    InvalidRecord {
        line: u64,
        source: Box<SettlementError>,
    },

    /// Unknown value in the `type` column
    #[error("Invalid record type '{record_type}'")]
    InvalidRecordType { record_type: String },

    /// A column required by the record type is empty
    #[error("{record_type} record requires a '{field}' value")]
    MissingField { record_type: String, field: String },

    /// Amount column is not a decimal number
    #[error("Invalid amount '{amount}' on {record_type} record")]
    InvalidAmount { amount: String, record_type: String },

    /// Expense or transfer amount is zero or negative
    #[error("{record_type} amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal, record_type: String },

    /// Split share is negative
    #[error("Split of expense {expense} for member {member} is negative: {amount}")]
    NegativeSplit {
        expense: String,
        member: String,
        amount: Decimal,
    },

    /// Transfer sender and receiver are the same member
    #[error("Cannot transfer from member {member} to themselves")]
    SelfTransfer { member: String },

    /// Member id declared twice
    #[error("Duplicate member ID {member}")]
    DuplicateMember { member: String },

    /// Expense id declared twice
    #[error("Duplicate expense ID {expense}")]
    DuplicateExpense { expense: String },

    /// Split references an expense that was not declared before it
    #[error("Split references unknown expense {expense}")]
    UnknownExpense { expense: String },

    /// Expense without any split rows
    #[error("Expense {expense} has no splits")]
    EmptySplits { expense: String },

    /// Expense mixes fixed split amounts with equal-share rows
    #[error("Expense {expense} mixes fixed and equal splits")]
    MixedSplits { expense: String },

    /// Split amounts differ from the expense amount by more than 0.01
    #[error("Split amounts of expense {expense} total {actual}, expected {expected}")]
    SplitMismatch {
        expense: String,
        expected: Decimal,
        actual: Decimal,
    },

    /// Member id not present in the trip's member list
    #[error("Unknown member {member} referenced by {context}")]
    UnknownMember { member: String, context: String },

    /// A trip task panicked or was cancelled
    #[error("Trip processing task failed: {message}")]
    TaskFailed { message: String },

    /// Report could not be serialized
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

// Conversion from io::Error to SettlementError
impl From<std::io::Error> for SettlementError {
    fn from(error: std::io::Error) -> Self {
        SettlementError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to SettlementError
impl From<csv::Error> for SettlementError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        SettlementError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for SettlementError {
    fn from(error: serde_json::Error) -> Self {
        SettlementError::SerializationError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SettlementError {
    /// Attach a line number to a record error
    pub fn at_line(self, line: u64) -> Self {
        SettlementError::InvalidRecord {
            line,
            source: Box::new(self),
        }
    }

    pub fn missing_field(record_type: &str, field: &str) -> Self {
        SettlementError::MissingField {
            record_type: record_type.to_string(),
            field: field.to_string(),
        }
    }

    pub fn invalid_amount(amount: &str, record_type: &str) -> Self {
        SettlementError::InvalidAmount {
            amount: amount.to_string(),
            record_type: record_type.to_string(),
        }
    }

    pub fn non_positive_amount(amount: Decimal, record_type: &str) -> Self {
        SettlementError::NonPositiveAmount {
            amount,
            record_type: record_type.to_string(),
        }
    }

    pub fn unknown_member(member: &str, context: &str) -> Self {
        SettlementError::UnknownMember {
            member: member.to_string(),
            context: context.to_string(),
        }
    }

    /// Whether processing must stop rather than skip the offending input
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SettlementError::FileNotFound { .. }
                | SettlementError::IoError { .. }
                | SettlementError::TaskFailed { .. }
                | SettlementError::SerializationError { .. }
        )
    }
}
