//! Settlement result types
//!
//! Everything here is produced by one settlement computation and lives only
//! as long as the caller keeps it; nothing is persisted.
//!
//! JSON field names follow the camelCase shape of the trip settlements API
//! (`memberId`, `fromName`, `totalExpenses`, ...).

use super::money::EPSILON;
use super::trip::MemberId;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Net position of one member
///
/// Positive: the group owes this member. Negative: the member owes the group.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtBalance {
    pub member_id: MemberId,
    pub member_name: String,
    pub balance: Decimal,
}

/// One proposed payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub from: MemberId,
    pub from_name: String,
    pub to: MemberId,
    pub to_name: String,
    /// Always positive, rounded to cents
    pub amount: Decimal,
}

/// Per-member activity summary
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    pub member_id: MemberId,
    pub member_name: String,
    /// Number of expenses this member paid for
    pub paid_count: usize,
    /// Sum of the expenses this member paid for
    pub total_paid: Decimal,
    /// Number of expenses this member has a split in
    pub involved_count: usize,
}

/// Square grid of potential debts between members
///
/// Keyed by (debtor, creditor). Covers every ordered pair of members,
/// self pairs included; absent debts are stored as zero. Serializes as a
/// nested `{debtor: {creditor: amount}}` map in member order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DebtMatrix {
    members: Vec<MemberId>,
    index: HashMap<MemberId, usize>,
    amounts: Vec<Decimal>,
}

impl DebtMatrix {
    /// Create an all-zero matrix over the given members
    ///
    /// Duplicate ids keep their first position.
    pub fn new(members: impl IntoIterator<Item = MemberId>) -> Self {
        let mut ids = Vec::new();
        let mut index = HashMap::new();
        for id in members {
            if !index.contains_key(&id) {
                index.insert(id.clone(), ids.len());
                ids.push(id);
            }
        }
        let amounts = vec![Decimal::ZERO; ids.len() * ids.len()];
        DebtMatrix {
            members: ids,
            index,
            amounts,
        }
    }

    /// Members covered by the matrix, in row/column order
    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    /// Number of members (rows)
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Amount `debtor` potentially owes `creditor`
    ///
    /// Returns `None` when either id is not part of the matrix.
    pub fn get(&self, debtor: &str, creditor: &str) -> Option<Decimal> {
        let row = *self.index.get(debtor)?;
        let col = *self.index.get(creditor)?;
        Some(self.amounts[row * self.members.len() + col])
    }

    /// Set an entry; ignored when either id is unknown
    pub(crate) fn set(&mut self, debtor: &str, creditor: &str, amount: Decimal) {
        if let (Some(&row), Some(&col)) = (self.index.get(debtor), self.index.get(creditor)) {
            let width = self.members.len();
            self.amounts[row * width + col] = amount;
        }
    }

    /// Iterate all entries row by row as (debtor, creditor, amount)
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &MemberId, Decimal)> + '_ {
        let width = self.members.len();
        self.amounts.iter().enumerate().map(move |(i, amount)| {
            (&self.members[i / width], &self.members[i % width], *amount)
        })
    }

    /// Number of pairs with an amount above epsilon
    pub fn outstanding_pairs(&self) -> usize {
        self.amounts.iter().filter(|amount| **amount > EPSILON).count()
    }
}

impl Serialize for DebtMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.members.len()))?;
        for (row, debtor) in self.members.iter().enumerate() {
            map.serialize_entry(debtor, &MatrixRow { matrix: self, row })?;
        }
        map.end()
    }
}

struct MatrixRow<'a> {
    matrix: &'a DebtMatrix,
    row: usize,
}

impl Serialize for MatrixRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let width = self.matrix.members.len();
        let mut map = serializer.serialize_map(Some(width))?;
        for (col, creditor) in self.matrix.members.iter().enumerate() {
            map.serialize_entry(creditor, &self.matrix.amounts[self.row * width + col])?;
        }
        map.end()
    }
}

/// Full result of one settlement computation
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReport {
    pub balances: Vec<DebtBalance>,
    pub settlements: Vec<Settlement>,
    pub matrix: DebtMatrix,
    /// Sum of all expense amounts (informational)
    pub total_expenses: Decimal,
    /// Sum of all transfer amounts (informational)
    pub total_transfers: Decimal,
    pub member_stats: Vec<MemberStats>,
}

impl SettlementReport {
    /// Count creditors, debtors and settled members
    pub fn summary(&self) -> BalanceSummary {
        let mut summary = BalanceSummary::default();
        for balance in &self.balances {
            if balance.balance > EPSILON {
                summary.creditors += 1;
            } else if balance.balance < -EPSILON {
                summary.debtors += 1;
            } else {
                summary.settled += 1;
            }
        }
        summary
    }
}

/// Counts of members by balance sign
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceSummary {
    pub creditors: usize,
    pub debtors: usize,
    pub settled: usize,
}

/// A settlement report labelled with the trip it belongs to
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TripReport {
    pub trip: String,
    #[serde(flatten)]
    pub report: SettlementReport,
}
