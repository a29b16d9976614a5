//! Mapping between the JSON shapes in `api_types` and engine types.
use api_types::{balance, ledger, split};
use engine::{
    CalculatedSplit, EngineError, Ledger, Money, NetBalances, OptimizedSettlement, Participant,
    ParticipantId, Roster, SettlementStatus, SplitInput, SplitPolicy,
};

pub fn split_inputs(participants: &[split::SplitParticipant]) -> Vec<SplitInput> {
    participants
        .iter()
        .map(|participant| SplitInput {
            participant_id: ParticipantId::from(participant.id),
            raw_amount: participant.raw_amount,
        })
        .collect()
}

pub fn split_response(splits: Vec<CalculatedSplit>) -> split::SplitResponse {
    split::SplitResponse {
        splits: splits
            .into_iter()
            .map(|split| split::SplitResult {
                participant_id: split.participant_id.into(),
                amount: split.amount,
                share_minor: split.share.minor(),
            })
            .collect(),
    }
}

fn settlement_status(status: ledger::SettlementStatus) -> SettlementStatus {
    match status {
        ledger::SettlementStatus::Pending => SettlementStatus::Pending,
        ledger::SettlementStatus::Confirmed => SettlementStatus::Confirmed,
        ledger::SettlementStatus::Rejected => SettlementStatus::Rejected,
    }
}

/// Replays a ledger file into an in-memory [`Ledger`].
///
/// Errors carry the position of the offending entry.
pub fn load_ledger(file: &ledger::LedgerFile) -> Result<Ledger, String> {
    let roster = Roster::try_from(
        file.members
            .iter()
            .map(|member| Participant::new(member.id.into(), member.name.clone()))
            .collect::<Vec<_>>(),
    )
    .map_err(|err| format!("members: {err}"))?;
    let mut book = Ledger::new(roster);

    for (idx, expense) in file.expenses.iter().enumerate() {
        let at = |err: EngineError| format!("expense #{idx}: {err}");
        let policy: SplitPolicy = expense.policy.parse().map_err(at)?;
        book.add_expense(
            expense.payer.into(),
            expense.description.as_deref(),
            Money::new(expense.total_minor),
            policy,
            &split_inputs(&expense.participants),
        )
        .map_err(at)?;
    }

    for (idx, settlement) in file.settlements.iter().enumerate() {
        book.record_settlement(
            settlement.from.into(),
            settlement.to.into(),
            Money::new(settlement.amount_minor),
            settlement_status(settlement.status),
        )
        .map_err(|err| format!("settlement #{idx}: {err}"))?;
    }

    Ok(book)
}

pub fn balance_report(
    balances: &NetBalances,
    settlements: &[OptimizedSettlement],
) -> balance::BalanceReport {
    balance::BalanceReport {
        balances: balances
            .values()
            .map(|entry| balance::NetBalanceView {
                participant_id: entry.participant_id.into(),
                name: entry.name.clone(),
                balance_minor: entry.balance.minor(),
            })
            .collect(),
        settlements: settlements
            .iter()
            .map(|settlement| balance::SuggestedSettlementView {
                from_id: settlement.from.id.into(),
                from_name: settlement.from.name.clone(),
                to_id: settlement.to.id.into(),
                to_name: settlement.to.name.clone(),
                amount_minor: settlement.amount.minor(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::BalanceSimplifier;
    use uuid::Uuid;

    const LEDGER: &str = r#"{
        "members": [
            {"id": "00000000-0000-0000-0000-000000000001", "name": "A"},
            {"id": "00000000-0000-0000-0000-000000000002", "name": "B"},
            {"id": "00000000-0000-0000-0000-000000000003", "name": "C"}
        ],
        "expenses": [
            {
                "payer": "00000000-0000-0000-0000-000000000002",
                "description": "tickets",
                "total_minor": 100,
                "policy": "exact",
                "participants": [
                    {"id": "00000000-0000-0000-0000-000000000001", "raw_amount": 100}
                ]
            },
            {
                "payer": "00000000-0000-0000-0000-000000000003",
                "total_minor": 100,
                "policy": "PERCENTAGE",
                "participants": [
                    {"id": "00000000-0000-0000-0000-000000000002", "raw_amount": 50},
                    {"id": "00000000-0000-0000-0000-000000000003", "raw_amount": 50}
                ]
            }
        ]
    }"#;

    #[test]
    fn ledger_file_produces_reference_settlements() {
        let file: ledger::LedgerFile = serde_json::from_str(LEDGER).unwrap();
        let book = load_ledger(&file).unwrap();

        let net = book.net_balances();
        let settlements = book.suggested_settlements(&BalanceSimplifier::default());
        let report = balance_report(&net, &settlements);

        let balances: Vec<(&str, i64)> = report
            .balances
            .iter()
            .map(|view| (view.name.as_str(), view.balance_minor))
            .collect();
        assert_eq!(balances, [("A", -100), ("B", 50), ("C", 50)]);

        let payments: Vec<(&str, &str, i64)> = report
            .settlements
            .iter()
            .map(|s| (s.from_name.as_str(), s.to_name.as_str(), s.amount_minor))
            .collect();
        assert_eq!(payments, [("A", "B", 50), ("A", "C", 50)]);
    }

    #[test]
    fn unknown_policy_names_the_expense() {
        let file: ledger::LedgerFile = serde_json::from_str(
            r#"{
                "members": [{"id": "00000000-0000-0000-0000-000000000001", "name": "A"}],
                "expenses": [{
                    "payer": "00000000-0000-0000-0000-000000000001",
                    "total_minor": 10,
                    "policy": "shares"
                }]
            }"#,
        )
        .unwrap();

        let err = load_ledger(&file).unwrap_err();
        assert_eq!(err, "expense #0: unknown split policy: \"shares\"");
    }

    #[test]
    fn split_results_keep_input_order() {
        let participants = vec![
            split::SplitParticipant {
                id: Uuid::from_u128(2),
                raw_amount: None,
            },
            split::SplitParticipant {
                id: Uuid::from_u128(1),
                raw_amount: None,
            },
        ];
        let splits = engine::calculate_splits(
            Money::new(5),
            SplitPolicy::Equal,
            &split_inputs(&participants),
        )
        .unwrap();

        let response = split_response(splits);
        let ids: Vec<Uuid> = response.splits.iter().map(|s| s.participant_id).collect();
        assert_eq!(ids, [Uuid::from_u128(2), Uuid::from_u128(1)]);
        assert_eq!(response.splits[0].share_minor, 3);
    }
}
