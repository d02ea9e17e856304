//! Greedy settlement planning
//!
//! Pairs the largest remaining debt with the largest remaining credit until
//! one side runs out. The plan needs at most `debtors + creditors - 1`
//! payments but is not guaranteed to use the fewest possible payments.

use crate::types::money::{is_creditor, is_debtor, is_settled, round_amount, EPSILON};
use crate::types::{DebtBalance, Settlement};
use rust_decimal::Decimal;

/// Working copy of one member's remaining balance
struct Position<'a> {
    member: &'a DebtBalance,
    remaining: Decimal,
}

/// Settlement planning service
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Produce the ordered list of payments that clears every balance
    ///
    /// Members within epsilon of zero take no part. Debtors are visited from
    /// the largest debt down, creditors from the largest credit down; equal
    /// balances keep their input order. Each step settles the smaller of the
    /// two open amounts and moves past whichever side is now settled.
    pub fn plan(&self, balances: &[DebtBalance]) -> Vec<Settlement> {
        let mut debtors: Vec<Position> = balances
            .iter()
            .filter(|b| is_debtor(b.balance))
            .map(|member| Position {
                member,
                remaining: member.balance,
            })
            .collect();
        let mut creditors: Vec<Position> = balances
            .iter()
            .filter(|b| is_creditor(b.balance))
            .map(|member| Position {
                member,
                remaining: member.balance,
            })
            .collect();

        // sort_by is stable, so ties keep input order
        debtors.sort_by(|a, b| a.remaining.cmp(&b.remaining));
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut settlements = Vec::new();
        let mut debtor_index = 0;
        let mut creditor_index = 0;

        while debtor_index < debtors.len() && creditor_index < creditors.len() {
            let debtor = &mut debtors[debtor_index];
            let creditor = &mut creditors[creditor_index];

            let amount = debtor.remaining.abs().min(creditor.remaining);

            if amount > EPSILON {
                settlements.push(Settlement {
                    from: debtor.member.member_id.clone(),
                    from_name: debtor.member.member_name.clone(),
                    to: creditor.member.member_id.clone(),
                    to_name: creditor.member.member_name.clone(),
                    amount: round_amount(amount),
                });

                debtor.remaining += amount;
                creditor.remaining -= amount;
            }

            // At least one side is settled here, so the loop always advances
            if is_settled(debtor.remaining) {
                debtor_index += 1;
            }
            if is_settled(creditor.remaining) {
                creditor_index += 1;
            }
        }

        settlements
    }
}

/// Plan settlements with the default greedy planner
pub fn plan_settlements(balances: &[DebtBalance]) -> Vec<Settlement> {
    SettlementPlanner.plan(balances)
}
