//! Trip snapshot types consumed by the settlement engine
//!
//! These mirror what a caller fetches for one trip: its members, its expenses
//! with their per-member splits, and the direct transfers recorded between
//! members. The engine treats them as a read-only snapshot.

use rust_decimal::Decimal;
use serde::Serialize;

/// Member identifier
///
/// Opaque and unique within a trip.
pub type MemberId = String;

/// Expense identifier
pub type ExpenseId = String;

/// A participant of the trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Member {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Share of an expense owed by one member
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSplit {
    pub member_id: MemberId,
    pub amount: Decimal,
}

impl ExpenseSplit {
    pub fn new(member_id: impl Into<MemberId>, amount: Decimal) -> Self {
        ExpenseSplit {
            member_id: member_id.into(),
            amount,
        }
    }
}

/// An expense advanced by one member on behalf of the group
///
/// Callers are expected to keep the split amounts summing to `amount`
/// within 0.01; the engine itself does not re-check this.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub description: Option<String>,
    pub amount: Decimal,
    pub payer_id: MemberId,
    pub splits: Vec<ExpenseSplit>,
}

impl Expense {
    pub fn new(
        id: impl Into<ExpenseId>,
        payer_id: impl Into<MemberId>,
        amount: Decimal,
        splits: Vec<ExpenseSplit>,
    ) -> Self {
        Expense {
            id: id.into(),
            description: None,
            amount,
            payer_id: payer_id.into(),
            splits,
        }
    }

    /// Sum of all split amounts
    pub fn split_total(&self) -> Decimal {
        self.splits.iter().map(|split| split.amount).sum()
    }
}

/// A direct payment between two members, outside of any expense
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: Option<String>,
    pub from_id: MemberId,
    pub to_id: MemberId,
    pub amount: Decimal,
    pub description: Option<String>,
}

impl Transfer {
    pub fn new(from_id: impl Into<MemberId>, to_id: impl Into<MemberId>, amount: Decimal) -> Self {
        Transfer {
            id: None,
            from_id: from_id.into(),
            to_id: to_id.into(),
            amount,
            description: None,
        }
    }
}

/// Consistent view of one trip's data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripSnapshot {
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
    pub transfers: Vec<Transfer>,
}

/// Amount given on a split row
///
/// Rows without an amount ask for the expense to be shared equally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitShare {
    Fixed(Decimal),
    Equal,
}

/// One parsed input row of a trip file
#[derive(Debug, Clone, PartialEq)]
pub enum TripRecord {
    Member(Member),
    Expense {
        id: ExpenseId,
        payer_id: MemberId,
        amount: Decimal,
        description: Option<String>,
    },
    Split {
        expense_id: ExpenseId,
        member_id: MemberId,
        share: SplitShare,
    },
    Transfer(Transfer),
}

impl TripRecord {
    /// Lowercase record type as it appears in the `type` column
    pub fn record_type(&self) -> &'static str {
        match self {
            TripRecord::Member(_) => "member",
            TripRecord::Expense { .. } => "expense",
            TripRecord::Split { .. } => "split",
            TripRecord::Transfer(_) => "transfer",
        }
    }
}
