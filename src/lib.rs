//! Trip Settlement Engine Library
//! # Overview
//!
//! This library turns the shared expenses of a group trip into net balances,
//! a short list of payments that clears every debt, and a pairwise debt
//! matrix. Trips are loaded from CSV with either a sync or an async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Member, Expense, Settlement, DebtMatrix, etc.)
//! - [`cli`] - CLI arguments parsing and log setup
//! - [`core`] - Business logic components:
//!   - [`core::snapshot`] - Record validation into a trip snapshot
//!   - [`core::balance`] - Net balance aggregation
//!   - [`core::planner`] - Greedy settlement planning
//!   - [`core::matrix`] - Pairwise debt matrix
//!   - [`core::engine`] - The full computation for one trip
//! - [`io`] - CSV input and CSV/JSON report output
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Balances
//!
//! Each member's balance is what they paid for expenses, minus their share
//! of every expense, plus transfers they sent, minus transfers they
//! received. Balances within 0.01 of zero count as settled.
//!
//! # Settlements
//!
//! Debtors (most negative first) are matched against creditors (most
//! positive first); each step pays the smaller of the two outstanding
//! amounts. The plan never has more than `debtors + creditors - 1` payments.

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{compute_settlement, SnapshotBuilder};
pub use io::write_reports;
pub use types::{
    DebtBalance, DebtMatrix, Expense, ExpenseSplit, Member, MemberId, Settlement,
    SettlementError, SettlementReport, Transfer, TripReport, TripSnapshot,
};
