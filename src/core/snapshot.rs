//! Trip snapshot assembly
//!
//! This module provides the `SnapshotBuilder`, which turns a stream of parsed
//! trip records into a validated [`TripSnapshot`]. It enforces the rules the
//! settlement stages rely on but never check themselves:
//! - Expense and transfer amounts are positive, split shares are not negative
//! - Nobody transfers money to themselves
//! - Member and expense ids are unique (first occurrence wins)
//! - Splits refer to an expense declared earlier in the stream
//! - An expense's splits add up to its amount within 0.01
//!
//! Member ids referenced by expenses, splits and transfers are not checked
//! here; the balance aggregator drops unknown ids on its own.

use crate::types::money::{split_equally, EPSILON};
use crate::types::{
    Expense, ExpenseId, ExpenseSplit, Member, MemberId, SettlementError, SplitShare, Transfer,
    TripRecord, TripSnapshot,
};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Expense whose splits are still being collected
struct PendingExpense {
    id: ExpenseId,
    payer_id: MemberId,
    amount: Decimal,
    description: Option<String>,
    fixed: Vec<ExpenseSplit>,
    equal: Vec<MemberId>,
}

impl PendingExpense {
    /// Resolve the collected split rows into a final expense
    fn into_expense(self) -> Result<Expense, SettlementError> {
        let splits = match (self.fixed.is_empty(), self.equal.is_empty()) {
            (true, true) => return Err(SettlementError::EmptySplits { expense: self.id }),
            (false, false) => return Err(SettlementError::MixedSplits { expense: self.id }),
            (true, false) => {
                let shares = split_equally(self.amount, self.equal.len());
                self.equal
                    .into_iter()
                    .zip(shares)
                    .map(|(member_id, amount)| ExpenseSplit { member_id, amount })
                    .collect()
            }
            (false, true) => self.fixed,
        };

        let expense = Expense {
            id: self.id,
            description: self.description,
            amount: self.amount,
            payer_id: self.payer_id,
            splits,
        };

        let actual = expense.split_total();
        if (actual - expense.amount).abs() > EPSILON {
            return Err(SettlementError::SplitMismatch {
                expense: expense.id,
                expected: expense.amount,
                actual,
            });
        }

        Ok(expense)
    }
}

/// Builds a trip snapshot record by record
///
/// Rejected records leave the builder unchanged, so a caller can log the
/// error and keep feeding records.
#[derive(Default)]
pub struct SnapshotBuilder {
    members: Vec<Member>,
    member_ids: HashSet<MemberId>,
    expenses: Vec<PendingExpense>,
    expense_index: HashMap<ExpenseId, usize>,
    transfers: Vec<Transfer>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record to the snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A member or expense id is already taken
    /// - An expense or transfer amount is not positive
    /// - A split share is negative or names an undeclared expense
    /// - A transfer's sender and receiver are the same member
    pub fn process(&mut self, record: TripRecord) -> Result<(), SettlementError> {
        match record {
            TripRecord::Member(member) => self.add_member(member),
            TripRecord::Expense {
                id,
                payer_id,
                amount,
                description,
            } => self.add_expense(id, payer_id, amount, description),
            TripRecord::Split {
                expense_id,
                member_id,
                share,
            } => self.add_split(expense_id, member_id, share),
            TripRecord::Transfer(transfer) => self.add_transfer(transfer),
        }
    }

    fn add_member(&mut self, member: Member) -> Result<(), SettlementError> {
        if !self.member_ids.insert(member.id.clone()) {
            return Err(SettlementError::DuplicateMember { member: member.id });
        }
        self.members.push(member);
        Ok(())
    }

    fn add_expense(
        &mut self,
        id: ExpenseId,
        payer_id: MemberId,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<(), SettlementError> {
        if amount <= Decimal::ZERO {
            return Err(SettlementError::non_positive_amount(amount, "expense"));
        }
        if self.expense_index.contains_key(&id) {
            return Err(SettlementError::DuplicateExpense { expense: id });
        }

        self.expense_index.insert(id.clone(), self.expenses.len());
        self.expenses.push(PendingExpense {
            id,
            payer_id,
            amount,
            description,
            fixed: Vec::new(),
            equal: Vec::new(),
        });
        Ok(())
    }

    fn add_split(
        &mut self,
        expense_id: ExpenseId,
        member_id: MemberId,
        share: SplitShare,
    ) -> Result<(), SettlementError> {
        let position = *self
            .expense_index
            .get(&expense_id)
            .ok_or_else(|| SettlementError::UnknownExpense {
                expense: expense_id.clone(),
            })?;
        let expense = &mut self.expenses[position];

        match share {
            SplitShare::Fixed(amount) if amount < Decimal::ZERO => {
                Err(SettlementError::NegativeSplit {
                    expense: expense_id,
                    member: member_id,
                    amount,
                })
            }
            SplitShare::Fixed(amount) => {
                expense.fixed.push(ExpenseSplit { member_id, amount });
                Ok(())
            }
            SplitShare::Equal => {
                expense.equal.push(member_id);
                Ok(())
            }
        }
    }

    fn add_transfer(&mut self, transfer: Transfer) -> Result<(), SettlementError> {
        if transfer.amount <= Decimal::ZERO {
            return Err(SettlementError::non_positive_amount(
                transfer.amount,
                "transfer",
            ));
        }
        if transfer.from_id == transfer.to_id {
            return Err(SettlementError::SelfTransfer {
                member: transfer.from_id,
            });
        }
        self.transfers.push(transfer);
        Ok(())
    }

    /// Finish the snapshot
    ///
    /// Expenses without splits, with mixed fixed and equal splits, or whose
    /// splits do not add up are left out and returned as errors alongside
    /// the snapshot.
    pub fn finish(self) -> (TripSnapshot, Vec<SettlementError>) {
        let mut rejected = Vec::new();
        let mut expenses = Vec::with_capacity(self.expenses.len());

        for pending in self.expenses {
            match pending.into_expense() {
                Ok(expense) => expenses.push(expense),
                Err(e) => rejected.push(e),
            }
        }

        let snapshot = TripSnapshot {
            members: self.members,
            expenses,
            transfers: self.transfers,
        };
        (snapshot, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn member(id: &str) -> TripRecord {
        TripRecord::Member(Member::new(id, id.to_uppercase()))
    }

    fn expense(id: &str, payer: &str, amount: Decimal) -> TripRecord {
        TripRecord::Expense {
            id: id.to_string(),
            payer_id: payer.to_string(),
            amount,
            description: None,
        }
    }

    fn split(expense: &str, member: &str, amount: Decimal) -> TripRecord {
        TripRecord::Split {
            expense_id: expense.to_string(),
            member_id: member.to_string(),
            share: SplitShare::Fixed(amount),
        }
    }

    fn equal_split(expense: &str, member: &str) -> TripRecord {
        TripRecord::Split {
            expense_id: expense.to_string(),
            member_id: member.to_string(),
            share: SplitShare::Equal,
        }
    }

    fn transfer(from: &str, to: &str, amount: Decimal) -> TripRecord {
        TripRecord::Transfer(Transfer::new(from, to, amount))
    }

    fn build(records: Vec<TripRecord>) -> (TripSnapshot, Vec<SettlementError>) {
        let mut builder = SnapshotBuilder::new();
        for record in records {
            builder.process(record).unwrap();
        }
        builder.finish()
    }

    #[test]
    fn test_builds_members_expenses_and_transfers() {
        let (snapshot, rejected) = build(vec![
            member("a"),
            member("b"),
            expense("e1", "a", dec!(100)),
            split("e1", "a", dec!(50)),
            split("e1", "b", dec!(50)),
            transfer("b", "a", dec!(50)),
        ]);

        assert!(rejected.is_empty());
        assert_eq!(snapshot.members.len(), 2);
        assert_eq!(snapshot.expenses.len(), 1);
        assert_eq!(snapshot.expenses[0].splits.len(), 2);
        assert_eq!(snapshot.transfers.len(), 1);
    }

    #[test]
    fn test_equal_splits_are_resolved_to_cents() {
        let (snapshot, rejected) = build(vec![
            expense("e1", "a", dec!(100)),
            equal_split("e1", "a"),
            equal_split("e1", "b"),
            equal_split("e1", "c"),
        ]);

        assert!(rejected.is_empty());
        let amounts: Vec<Decimal> = snapshot.expenses[0].splits.iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
    }

    #[test]
    fn test_split_within_tolerance_is_accepted() {
        let (snapshot, rejected) = build(vec![
            expense("e1", "a", dec!(100)),
            split("e1", "a", dec!(33.33)),
            split("e1", "b", dec!(33.33)),
            split("e1", "c", dec!(33.33)),
        ]);

        assert!(rejected.is_empty());
        assert_eq!(snapshot.expenses.len(), 1);
    }

    #[test]
    fn test_finish_rejects_bad_expenses() {
        let (snapshot, rejected) = build(vec![
            expense("empty", "a", dec!(10)),
            expense("mixed", "a", dec!(10)),
            split("mixed", "a", dec!(5)),
            equal_split("mixed", "b"),
            expense("short", "a", dec!(50)),
            split("short", "a", dec!(10)),
            split("short", "b", dec!(10)),
            expense("ok", "a", dec!(10)),
            split("ok", "b", dec!(10)),
        ]);

        assert_eq!(snapshot.expenses.len(), 1);
        assert_eq!(snapshot.expenses[0].id, "ok");
        assert_eq!(
            rejected,
            vec![
                SettlementError::EmptySplits {
                    expense: "empty".to_string()
                },
                SettlementError::MixedSplits {
                    expense: "mixed".to_string()
                },
                SettlementError::SplitMismatch {
                    expense: "short".to_string(),
                    expected: dec!(50),
                    actual: dec!(20),
                },
            ]
        );
    }

    #[test]
    fn test_process_rejects_invalid_records() {
        let mut builder = SnapshotBuilder::new();
        builder.process(member("a")).unwrap();
        builder.process(expense("e1", "a", dec!(10))).unwrap();

        assert_eq!(
            builder.process(member("a")),
            Err(SettlementError::DuplicateMember {
                member: "a".to_string()
            })
        );
        assert_eq!(
            builder.process(expense("e1", "a", dec!(5))),
            Err(SettlementError::DuplicateExpense {
                expense: "e1".to_string()
            })
        );
        assert_eq!(
            builder.process(expense("e2", "a", Decimal::ZERO)),
            Err(SettlementError::non_positive_amount(Decimal::ZERO, "expense"))
        );
        assert_eq!(
            builder.process(split("e9", "a", dec!(5))),
            Err(SettlementError::UnknownExpense {
                expense: "e9".to_string()
            })
        );
        assert!(matches!(
            builder.process(split("e1", "a", dec!(-1))),
            Err(SettlementError::NegativeSplit { .. })
        ));
        assert_eq!(
            builder.process(transfer("a", "a", dec!(5))),
            Err(SettlementError::SelfTransfer {
                member: "a".to_string()
            })
        );
        assert!(matches!(
            builder.process(transfer("a", "b", dec!(-3))),
            Err(SettlementError::NonPositiveAmount { .. })
        ));

        // Nothing rejected above reached the snapshot
        builder.process(split("e1", "a", dec!(10))).unwrap();
        let (snapshot, rejected) = builder.finish();
        assert!(rejected.is_empty());
        assert_eq!(snapshot.members.len(), 1);
        assert_eq!(snapshot.expenses.len(), 1);
        assert_eq!(snapshot.expenses[0].splits.len(), 1);
        assert!(snapshot.transfers.is_empty());
    }

    #[test]
    fn test_unknown_members_pass_through() {
        let (snapshot, rejected) = build(vec![
            member("a"),
            expense("e1", "a", dec!(10)),
            split("e1", "ghost", dec!(10)),
        ]);

        assert!(rejected.is_empty());
        assert_eq!(snapshot.expenses[0].splits[0].member_id, "ghost");
    }
}
