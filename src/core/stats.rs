//! Per-member activity statistics

use crate::types::{Expense, Member, MemberStats};
use rust_decimal::Decimal;

/// Summarise what each member paid for and took part in
///
/// One entry per member in input order. Expenses whose payer is not a
/// listed member are not attributed to anyone.
pub fn member_stats(members: &[Member], expenses: &[Expense]) -> Vec<MemberStats> {
    members
        .iter()
        .map(|member| {
            let paid: Vec<&Expense> = expenses
                .iter()
                .filter(|expense| expense.payer_id == member.id)
                .collect();
            let involved_count = expenses
                .iter()
                .filter(|expense| {
                    expense
                        .splits
                        .iter()
                        .any(|split| split.member_id == member.id)
                })
                .count();

            MemberStats {
                member_id: member.id.clone(),
                member_name: member.name.clone(),
                paid_count: paid.len(),
                total_paid: paid.iter().map(|expense| expense.amount).sum::<Decimal>(),
                involved_count,
            }
        })
        .collect()
}
