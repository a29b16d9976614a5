use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    BalanceSimplifier, EngineError, Money, NetBalances, Obligation, OptimizedSettlement,
    Participant, ParticipantId, ResultEngine, Roster, SplitInput, SplitPolicy, calculate_splits,
    compute_net_balances,
};

/// One participant's portion of a recorded expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseShare {
    pub participant: Participant,
    /// Policy-specific raw value, see [`crate::CalculatedSplit::amount`].
    pub amount: Decimal,
    pub share: Money,
}

/// An expense paid by `payer` and split among `splits`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub payer: Participant,
    pub description: Option<String>,
    pub total: Money,
    pub policy: SplitPolicy,
    pub splits: Vec<ExpenseShare>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    #[default]
    Pending,
    Confirmed,
    Rejected,
}

impl SettlementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }
}

/// A payment `from` one member `to` another.
///
/// Only confirmed settlements count towards balances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: Participant,
    pub to: Participant,
    pub amount: Money,
    pub status: SettlementStatus,
}

/// In-memory expense and settlement book for one group.
///
/// Converts recorded activity into [`Obligation`]s and feeds them to the
/// balance simplifier.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    roster: Roster,
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
}

impl Ledger {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            expenses: Vec::new(),
            settlements: Vec::new(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    /// Splits `total` among `inputs` and records the expense.
    ///
    /// An empty `inputs` under [`SplitPolicy::Equal`] splits among the whole
    /// roster, in roster order.
    pub fn add_expense(
        &mut self,
        payer: ParticipantId,
        description: Option<&str>,
        total: Money,
        policy: SplitPolicy,
        inputs: &[SplitInput],
    ) -> ResultEngine<&Expense> {
        let payer = self.roster.require(&payer)?.clone();

        let roster_inputs;
        let inputs = if inputs.is_empty() && policy == SplitPolicy::Equal {
            roster_inputs = self.roster.equal_inputs();
            roster_inputs.as_slice()
        } else {
            inputs
        };
        for input in inputs {
            self.roster.require(&input.participant_id)?;
        }

        let splits = calculate_splits(total, policy, inputs)?
            .into_iter()
            .map(|split| {
                Ok(ExpenseShare {
                    participant: self.roster.require(&split.participant_id)?.clone(),
                    amount: split.amount,
                    share: split.share,
                })
            })
            .collect::<ResultEngine<Vec<_>>>()?;

        tracing::debug!(
            payer = %payer.id,
            total = total.minor(),
            policy = %policy,
            "expense recorded"
        );

        self.expenses.push(Expense {
            payer,
            description: normalize_optional_text(description),
            total,
            policy,
            splits,
        });
        self.expenses
            .last()
            .ok_or_else(|| EngineError::InvalidAmount("expense was not recorded".to_string()))
    }

    /// Records a payment and returns its index.
    pub fn record_settlement(
        &mut self,
        from: ParticipantId,
        to: ParticipantId,
        amount: Money,
        status: SettlementStatus,
    ) -> ResultEngine<usize> {
        if from == to {
            return Err(EngineError::InvalidAmount(
                "settlement payer and receiver must differ".to_string(),
            ));
        }
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "settlement amount must be positive, got {}",
                amount.minor()
            )));
        }
        let from = self.roster.require(&from)?.clone();
        let to = self.roster.require(&to)?.clone();

        self.settlements.push(Settlement {
            from,
            to,
            amount,
            status,
        });
        Ok(self.settlements.len() - 1)
    }

    pub fn confirm_settlement(&mut self, index: usize) -> ResultEngine<&Settlement> {
        self.transition_settlement(index, SettlementStatus::Confirmed)
    }

    pub fn reject_settlement(&mut self, index: usize) -> ResultEngine<&Settlement> {
        self.transition_settlement(index, SettlementStatus::Rejected)
    }

    fn transition_settlement(
        &mut self,
        index: usize,
        next: SettlementStatus,
    ) -> ResultEngine<&Settlement> {
        let settlement = self
            .settlements
            .get_mut(index)
            .ok_or(EngineError::SettlementNotFound(index))?;
        if settlement.status != SettlementStatus::Pending {
            return Err(EngineError::InvalidSettlementState(format!(
                "settlement #{index} is already {}",
                settlement.status.as_str()
            )));
        }
        settlement.status = next;
        Ok(settlement)
    }

    /// Directed debts implied by the book.
    ///
    /// Every split participant other than the payer owes the payer their
    /// share. A confirmed settlement adds the reverse edge (receiver towards
    /// payer), cancelling the debt it paid off.
    pub fn obligations(&self) -> Vec<Obligation> {
        let from_expenses = self.expenses.iter().flat_map(|expense| {
            expense
                .splits
                .iter()
                .filter(|split| split.participant.id != expense.payer.id)
                .map(|split| {
                    Obligation::new(
                        split.participant.clone(),
                        expense.payer.clone(),
                        split.share,
                    )
                })
        });
        let from_settlements = self
            .settlements
            .iter()
            .filter(|settlement| settlement.status == SettlementStatus::Confirmed)
            .map(|settlement| {
                Obligation::new(
                    settlement.to.clone(),
                    settlement.from.clone(),
                    settlement.amount,
                )
            });

        from_expenses.chain(from_settlements).collect()
    }

    pub fn net_balances(&self) -> NetBalances {
        compute_net_balances(&self.obligations())
    }

    pub fn suggested_settlements(&self, simplifier: &BalanceSimplifier) -> Vec<OptimizedSettlement> {
        simplifier.simplified_settlements(&self.obligations())
    }
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
