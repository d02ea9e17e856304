//! Core settlement logic
//!
//! This module contains the settlement stages and the snapshot loader:
//! - `snapshot` - Validated assembly of trip snapshots from parsed records
//! - `balance` - Net balance aggregation per member
//! - `planner` - Greedy debtor/creditor settlement planning
//! - `matrix` - Pairwise potential-debt matrix
//! - `stats` - Per-member activity statistics
//! - `engine` - The full computation over one snapshot

pub mod balance;
pub mod engine;
pub mod matrix;
pub mod planner;
pub mod snapshot;
pub mod stats;

pub use balance::{aggregate_balances, BalanceAggregator};
pub use engine::compute_settlement;
pub use matrix::{build_debt_matrix, MatrixBuilder};
pub use planner::{plan_settlements, SettlementPlanner};
pub use snapshot::SnapshotBuilder;
pub use stats::member_stats;
