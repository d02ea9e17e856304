//! Monetary helpers shared by every settlement stage
//!
//! All amounts are `rust_decimal::Decimal` values with two-decimal-place
//! semantics. Comparisons against zero go through [`EPSILON`] so that
//! rounding noise never produces a one-cent settlement.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance below which a monetary difference is treated as zero (0.01)
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Number of decimal places kept on displayed and settled amounts
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to cents, half away from zero
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether an amount is within epsilon of zero (inclusive)
pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() <= EPSILON
}

/// Whether a balance marks its member as a net debtor
pub fn is_debtor(balance: Decimal) -> bool {
    balance < -EPSILON
}

/// Whether a balance marks its member as a net creditor
pub fn is_creditor(balance: Decimal) -> bool {
    balance > EPSILON
}

/// Round every amount to cents so the rounded amounts add up to the rounded
/// exact total
///
/// Amounts are first rounded half away from zero. If that leaves the total
/// off by some cents, each cent is taken from (or given to) the amount that
/// rounding pushed furthest in that direction; ties go to the earlier amount.
/// No amount moves by a full cent or more from its exact value.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use trip_settlement_engine::types::money::round_preserving_total;
///
/// let exact = [Decimal::new(2010, 3), Decimal::new(-1005, 3), Decimal::new(-1005, 3)];
/// let rounded = round_preserving_total(&exact);
/// assert_eq!(rounded, vec![Decimal::new(201, 2), Decimal::new(-100, 2), Decimal::new(-101, 2)]);
/// ```
pub fn round_preserving_total(amounts: &[Decimal]) -> Vec<Decimal> {
    let mut rounded: Vec<Decimal> = amounts.iter().copied().map(round_amount).collect();
    let target = round_amount(amounts.iter().copied().sum());
    let error = rounded.iter().copied().sum::<Decimal>() - target;

    let steps = (error.abs() / EPSILON).to_usize().unwrap_or(0);
    if steps == 0 {
        return rounded;
    }

    // positive drift: rounding moved this amount the same way the total is off
    let sign = if error > Decimal::ZERO {
        Decimal::ONE
    } else {
        Decimal::NEGATIVE_ONE
    };
    let drift: Vec<Decimal> = rounded
        .iter()
        .zip(amounts)
        .map(|(r, exact)| (*r - *exact) * sign)
        .collect();

    let mut order: Vec<usize> = (0..amounts.len()).collect();
    order.sort_by(|&a, &b| drift[b].cmp(&drift[a]));
    for &i in order.iter().take(steps) {
        rounded[i] -= EPSILON * sign;
    }

    rounded
}

/// Split a non-negative total into `parts` equal shares
///
/// Each share is the per-member amount truncated to cents; the cents left
/// over are handed out one at a time to the leading shares, so the shares
/// always sum exactly to the total rounded to cents.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use trip_settlement_engine::types::money::split_equally;
///
/// let shares = split_equally(Decimal::new(10000, 2), 3);
/// assert_eq!(shares, vec![Decimal::new(3334, 2), Decimal::new(3333, 2), Decimal::new(3333, 2)]);
/// ```
pub fn split_equally(total: Decimal, parts: usize) -> Vec<Decimal> {
    if parts == 0 {
        return Vec::new();
    }

    let total = round_amount(total);
    let count = Decimal::from(parts);
    let base = (total / count).round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero);
    let leftover_cents = ((total - base * count) / EPSILON).to_usize().unwrap_or(0);

    (0..parts)
        .map(|i| if i < leftover_cents { base + EPSILON } else { base })
        .collect()
}
