use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Money, Participant, ParticipantId};

/// A directed debt: `debtor` owes `creditor` the given `amount`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligation {
    pub debtor: Participant,
    pub creditor: Participant,
    pub amount: Money,
}

impl Obligation {
    pub fn new(debtor: Participant, creditor: Participant, amount: Money) -> Self {
        Self {
            debtor,
            creditor,
            amount,
        }
    }
}

/// Aggregate position of one participant.
///
/// Positive balance = net creditor (is owed money), negative = net debtor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBalance {
    pub participant_id: ParticipantId,
    pub name: String,
    pub balance: Money,
}

impl NetBalance {
    fn zero(participant: &Participant) -> Self {
        Self {
            participant_id: participant.id,
            name: participant.name.clone(),
            balance: Money::ZERO,
        }
    }

    #[must_use]
    pub fn participant(&self) -> Participant {
        Participant::new(self.participant_id, self.name.clone())
    }
}

/// Net balances keyed by participant, iterated in first-encounter order.
///
/// Equality ignores iteration order.
pub type NetBalances = IndexMap<ParticipantId, NetBalance>;

/// Folds obligations into one signed balance per participant.
///
/// Only participants that appear in at least one obligation get an entry.
/// The name attached to an id is the first one seen.
pub fn compute_net_balances(obligations: &[Obligation]) -> NetBalances {
    let mut balances = NetBalances::new();

    for obligation in obligations {
        balances
            .entry(obligation.debtor.id)
            .or_insert_with(|| NetBalance::zero(&obligation.debtor))
            .balance -= obligation.amount;
        balances
            .entry(obligation.creditor.id)
            .or_insert_with(|| NetBalance::zero(&obligation.creditor))
            .balance += obligation.amount;
    }

    balances
}
