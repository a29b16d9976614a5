//! Debt simplification.
//!
//! Net creditors are greedily matched against net debtors, largest first,
//! producing a short list of payments that clears every balance.
use serde::{Deserialize, Serialize};

use crate::{Money, NetBalances, Obligation, Participant, compute_net_balances};

/// A suggested payment from a debtor to a creditor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizedSettlement {
    pub from: Participant,
    pub to: Participant,
    pub amount: Money,
}

/// Greedy settlement planner.
///
/// Balances whose magnitude is at most `tolerance` are treated as settled.
/// Amounts are integer minor units, so the default tolerance of zero treats
/// any balance of at least one minor unit as outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BalanceSimplifier {
    tolerance: Money,
}

impl BalanceSimplifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the settled-balance tolerance. Negative values are clamped to zero.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Money) -> Self {
        self.tolerance = tolerance.max(Money::ZERO);
        self
    }

    #[must_use]
    pub fn tolerance(&self) -> Money {
        self.tolerance
    }

    /// Computes suggested payments that clear `balances`.
    ///
    /// Creditors are visited from the largest balance down and debtors from
    /// the most negative up; ties keep the map's iteration order.
    pub fn simplify(&self, balances: &NetBalances) -> Vec<OptimizedSettlement> {
        let mut creditors: Vec<(Participant, Money)> = Vec::new();
        let mut debtors: Vec<(Participant, Money)> = Vec::new();

        for entry in balances.values() {
            if entry.balance > self.tolerance {
                creditors.push((entry.participant(), entry.balance));
            } else if entry.balance < -self.tolerance {
                debtors.push((entry.participant(), entry.balance));
            }
        }

        // `sort_by` is stable, which keeps encounter order among equal balances.
        creditors.sort_by(|(_, a), (_, b)| b.cmp(a));
        debtors.sort_by(|(_, a), (_, b)| a.cmp(b));

        let mut settlements = Vec::new();
        let (mut ci, mut di) = (0, 0);

        while ci < creditors.len() && di < debtors.len() {
            let (creditor, credit) = &mut creditors[ci];
            let (debtor, debt) = &mut debtors[di];

            let amount = (*credit).min(-*debt);
            if amount > self.tolerance {
                settlements.push(OptimizedSettlement {
                    from: debtor.clone(),
                    to: creditor.clone(),
                    amount,
                });
            }

            *credit -= amount;
            *debt += amount;

            if credit.abs() <= self.tolerance {
                ci += 1;
            }
            if debt.abs() <= self.tolerance {
                di += 1;
            }
        }

        tracing::debug!(
            creditors = creditors.len(),
            debtors = debtors.len(),
            settlements = settlements.len(),
            "simplified balances"
        );

        settlements
    }

    /// Nets `obligations` and simplifies the result.
    pub fn simplified_settlements(&self, obligations: &[Obligation]) -> Vec<OptimizedSettlement> {
        self.simplify(&compute_net_balances(obligations))
    }
}

/// [`BalanceSimplifier::simplify`] with the default tolerance.
pub fn simplify(balances: &NetBalances) -> Vec<OptimizedSettlement> {
    BalanceSimplifier::default().simplify(balances)
}

/// [`BalanceSimplifier::simplified_settlements`] with the default tolerance.
pub fn simplified_settlements(obligations: &[Obligation]) -> Vec<OptimizedSettlement> {
    BalanceSimplifier::default().simplified_settlements(obligations)
}
