//! Balance aggregation
//!
//! Reduces a trip's expenses, splits and transfers into one signed net
//! balance per member. Positive balances are owed money by the group,
//! negative balances owe money to it.
//!
//! The aggregator is built fresh for every computation and keeps its
//! accumulators in a local map keyed by member id; nothing survives the call.

use crate::types::money::round_preserving_total;
use crate::types::{DebtBalance, Expense, Member, SettlementError, Transfer};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Accumulates net balances for a fixed member list
///
/// Members keep the order in which they were supplied. Contributions that
/// reference a member outside that list are rejected with
/// [`SettlementError::UnknownMember`] and leave every balance untouched.
pub struct BalanceAggregator<'a> {
    /// Balances in member input order
    balances: Vec<DebtBalance>,
    /// Member id to position in `balances`
    index: HashMap<&'a str, usize>,
}

impl<'a> BalanceAggregator<'a> {
    /// Start every member at a zero balance
    ///
    /// If the same id appears twice, the first occurrence wins.
    pub fn new(members: &'a [Member]) -> Self {
        let mut balances = Vec::with_capacity(members.len());
        let mut index = HashMap::with_capacity(members.len());

        for member in members {
            if index.contains_key(member.id.as_str()) {
                continue;
            }
            index.insert(member.id.as_str(), balances.len());
            balances.push(DebtBalance {
                member_id: member.id.clone(),
                member_name: member.name.clone(),
                balance: Decimal::ZERO,
            });
        }

        BalanceAggregator { balances, index }
    }

    /// Add an amount to a member's balance
    pub fn credit(
        &mut self,
        member: &str,
        amount: Decimal,
        context: &str,
    ) -> Result<(), SettlementError> {
        let slot = self.slot(member, context)?;
        self.balances[slot].balance += amount;
        Ok(())
    }

    /// Subtract an amount from a member's balance
    pub fn debit(
        &mut self,
        member: &str,
        amount: Decimal,
        context: &str,
    ) -> Result<(), SettlementError> {
        let slot = self.slot(member, context)?;
        self.balances[slot].balance -= amount;
        Ok(())
    }

    /// Credit the payer with the full expense amount
    pub fn apply_payment(&mut self, expense: &Expense) -> Result<(), SettlementError> {
        let context = format!("payer of expense {}", expense.id);
        self.credit(&expense.payer_id, expense.amount, &context)
    }

    /// Debit each split member with their share
    ///
    /// Every split is attempted; the unknown members among them are
    /// reported together.
    pub fn apply_splits(&mut self, expense: &Expense) -> Vec<SettlementError> {
        let context = format!("split of expense {}", expense.id);
        expense
            .splits
            .iter()
            .filter_map(|split| self.debit(&split.member_id, split.amount, &context).err())
            .collect()
    }

    /// Credit the sender and debit the receiver of a transfer
    ///
    /// Each side is applied independently, so a transfer with one unknown
    /// side still moves the known member's balance.
    pub fn apply_transfer(&mut self, transfer: &Transfer) -> Vec<SettlementError> {
        let mut errors = Vec::new();
        if let Err(e) = self.credit(&transfer.from_id, transfer.amount, "transfer sender") {
            errors.push(e);
        }
        if let Err(e) = self.debit(&transfer.to_id, transfer.amount, "transfer receiver") {
            errors.push(e);
        }
        errors
    }

    /// Final balances in member order, rounded to cents
    ///
    /// Sub-cent remainders are distributed so the rounded balances still sum
    /// to zero whenever the exact balances do.
    pub fn finish(self) -> Vec<DebtBalance> {
        let exact: Vec<Decimal> = self.balances.iter().map(|b| b.balance).collect();
        let rounded = round_preserving_total(&exact);

        self.balances
            .into_iter()
            .zip(rounded)
            .map(|(mut balance, amount)| {
                balance.balance = amount;
                balance
            })
            .collect()
    }

    fn slot(&self, member: &str, context: &str) -> Result<usize, SettlementError> {
        self.index
            .get(member)
            .copied()
            .ok_or_else(|| SettlementError::unknown_member(member, context))
    }
}

/// Compute one net balance per member
///
/// Payments are applied first, then splits, then transfers. Contributions
/// referencing unknown member ids are dropped and logged as warnings.
pub fn aggregate_balances(
    members: &[Member],
    expenses: &[Expense],
    transfers: &[Transfer],
) -> Vec<DebtBalance> {
    let mut aggregator = BalanceAggregator::new(members);

    for expense in expenses {
        if let Err(e) = aggregator.apply_payment(expense) {
            tracing::warn!("Ignoring contribution: {}", e);
        }
    }

    for expense in expenses {
        for e in aggregator.apply_splits(expense) {
            tracing::warn!("Ignoring contribution: {}", e);
        }
    }

    for transfer in transfers {
        for e in aggregator.apply_transfer(transfer) {
            tracing::warn!("Ignoring contribution: {}", e);
        }
    }

    aggregator.finish()
}
