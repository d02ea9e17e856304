//! Types module
//!
//! Contains the data structures shared by the loader, the settlement stages
//! and the report writers:
//! - `trip`: Trip snapshot input types and parsed records
//! - `settlement`: Balances, settlements, debt matrix and reports
//! - `money`: Epsilon, rounding and equal-split helpers
//! - `error`: Error types for the settlement engine

pub mod error;
pub mod money;
pub mod settlement;
pub mod trip;

pub use error::SettlementError;
pub use settlement::{
    BalanceSummary, DebtBalance, DebtMatrix, MemberStats, Settlement, SettlementReport,
    TripReport,
};
pub use trip::{
    Expense, ExpenseId, ExpenseSplit, Member, MemberId, SplitShare, Transfer, TripRecord,
    TripSnapshot,
};
