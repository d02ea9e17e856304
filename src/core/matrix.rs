//! Pairwise debt matrix
//!
//! A display view of who could owe whom, derived straight from the net
//! balances. Every debtor/creditor pair gets the smaller of the two open
//! amounts, so one creditor may appear against several debtors at once;
//! the entries are potential debts, not an allocation plan.

use crate::types::money::{is_creditor, is_debtor, EPSILON};
use crate::types::{DebtBalance, DebtMatrix};

/// Debt matrix construction service
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixBuilder;

impl MatrixBuilder {
    pub fn build(&self, balances: &[DebtBalance]) -> DebtMatrix {
        let mut matrix = DebtMatrix::new(balances.iter().map(|b| b.member_id.clone()));

        for debtor in balances.iter().filter(|b| is_debtor(b.balance)) {
            for creditor in balances.iter().filter(|b| is_creditor(b.balance)) {
                let debt = debtor.balance.abs().min(creditor.balance);
                if debt > EPSILON {
                    matrix.set(&debtor.member_id, &creditor.member_id, debt);
                }
            }
        }

        matrix
    }
}

/// Build the debt matrix with the default builder
pub fn build_debt_matrix(balances: &[DebtBalance]) -> DebtMatrix {
    MatrixBuilder.build(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn balances(entries: &[(&str, Decimal)]) -> Vec<DebtBalance> {
        entries
            .iter()
            .map(|(id, balance)| DebtBalance {
                member_id: id.to_string(),
                member_name: id.to_string(),
                balance: *balance,
            })
            .collect()
    }

    #[test]
    fn test_cross_product_is_not_an_allocation() {
        let matrix = MatrixBuilder.build(&balances(&[
            ("a", dec!(40)),
            ("b", dec!(10)),
            ("c", dec!(-50)),
            ("d", dec!(-5)),
        ]));

        assert_eq!(matrix.get("c", "a"), Some(dec!(40)));
        assert_eq!(matrix.get("c", "b"), Some(dec!(10)));
        assert_eq!(matrix.get("d", "a"), Some(dec!(5)));
        assert_eq!(matrix.get("d", "b"), Some(dec!(5)));
        // creditors never owe, debtors are never owed
        assert_eq!(matrix.get("a", "c"), Some(Decimal::ZERO));
        assert_eq!(matrix.get("c", "d"), Some(Decimal::ZERO));
        assert_eq!(matrix.outstanding_pairs(), 4);
    }

    #[test]
    fn test_self_pairs_are_zero() {
        let matrix = MatrixBuilder.build(&balances(&[("a", dec!(25)), ("b", dec!(-25))]));
        for id in ["a", "b"] {
            assert_eq!(matrix.get(id, id), Some(Decimal::ZERO));
        }
    }

    #[test]
    fn test_balances_within_epsilon_are_ignored() {
        let matrix = MatrixBuilder.build(&balances(&[
            ("a", dec!(0.01)),
            ("b", dec!(-0.01)),
            ("c", Decimal::ZERO),
        ]));
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.outstanding_pairs(), 0);
    }

    #[test]
    fn test_empty_balances_give_empty_matrix() {
        let matrix = build_debt_matrix(&[]);
        assert!(matrix.is_empty());
        assert_eq!(matrix.iter().count(), 0);
    }
}
