//! Settlement computation
//!
//! This module ties the stages together: balances are aggregated once, then
//! handed independently to the planner and the matrix builder. The whole
//! computation is pure; it reads the snapshot and returns a new report, so
//! it can run concurrently for any number of trips without coordination.

use crate::core::balance::aggregate_balances;
use crate::core::matrix::MatrixBuilder;
use crate::core::planner::SettlementPlanner;
use crate::core::stats::member_stats;
use crate::types::{Expense, Member, SettlementReport, Transfer, TripSnapshot};
use rust_decimal::Decimal;

/// Compute balances, settlement plan, debt matrix and totals for one trip
///
/// `total_expenses` and `total_transfers` are summed from the raw inputs,
/// including entries whose member ids are unknown.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use trip_settlement_engine::compute_settlement;
/// use trip_settlement_engine::types::{Expense, ExpenseSplit, Member};
///
/// let members = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
/// let expenses = vec![Expense::new(
///     "e1",
///     "a",
///     Decimal::new(100, 0),
///     vec![
///         ExpenseSplit::new("a", Decimal::new(50, 0)),
///         ExpenseSplit::new("b", Decimal::new(50, 0)),
///     ],
/// )];
///
/// let report = compute_settlement(&members, &expenses, &[]);
/// assert_eq!(report.settlements.len(), 1);
/// assert_eq!(report.settlements[0].from, "b");
/// assert_eq!(report.settlements[0].amount, Decimal::new(50, 0));
/// ```
pub fn compute_settlement(
    members: &[Member],
    expenses: &[Expense],
    transfers: &[Transfer],
) -> SettlementReport {
    let balances = aggregate_balances(members, expenses, transfers);
    let settlements = SettlementPlanner.plan(&balances);
    let matrix = MatrixBuilder.build(&balances);

    let total_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();
    let total_transfers: Decimal = transfers.iter().map(|t| t.amount).sum();

    tracing::debug!(
        members = members.len(),
        expenses = expenses.len(),
        transfers = transfers.len(),
        settlements = settlements.len(),
        "Computed settlement"
    );

    SettlementReport {
        balances,
        settlements,
        matrix,
        total_expenses,
        total_transfers,
        member_stats: member_stats(members, expenses),
    }
}

impl TripSnapshot {
    /// Run the settlement computation over this snapshot
    pub fn settle(&self) -> SettlementReport {
        compute_settlement(&self.members, &self.expenses, &self.transfers)
    }
}
