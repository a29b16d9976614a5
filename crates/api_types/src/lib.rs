use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod split {
    use super::*;

    /// A participant of a split request.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SplitParticipant {
        pub id: Uuid,
        /// Minor units for `EXACT`, percentage points for `PERCENTAGE`,
        /// ignored for `EQUAL`.
        #[serde(default)]
        pub raw_amount: Option<Decimal>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitRequest {
        pub total_minor: i64,
        /// `EQUAL`, `EXACT` or `PERCENTAGE` (case-insensitive).
        pub policy: String,
        /// Order matters: rounding remainders go to the first participants.
        pub participants: Vec<SplitParticipant>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitResult {
        pub participant_id: Uuid,
        pub amount: Decimal,
        pub share_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitResponse {
        pub splits: Vec<SplitResult>,
    }
}

pub mod ledger {
    use super::*;
    use split::SplitParticipant;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Member {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub payer: Uuid,
        pub description: Option<String>,
        pub total_minor: i64,
        pub policy: String,
        /// Empty with an `EQUAL` policy means "every member".
        #[serde(default)]
        pub participants: Vec<SplitParticipant>,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SettlementStatus {
        Pending,
        #[default]
        Confirmed,
        Rejected,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementNew {
        pub from: Uuid,
        pub to: Uuid,
        pub amount_minor: i64,
        #[serde(default)]
        pub status: SettlementStatus,
    }

    /// A whole group book: members in membership order plus its activity.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerFile {
        pub members: Vec<Member>,
        #[serde(default)]
        pub expenses: Vec<ExpenseNew>,
        #[serde(default)]
        pub settlements: Vec<SettlementNew>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NetBalanceView {
        pub participant_id: Uuid,
        pub name: String,
        /// Positive = is owed money, negative = owes money.
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SuggestedSettlementView {
        pub from_id: Uuid,
        pub from_name: String,
        pub to_id: Uuid,
        pub to_name: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceReport {
        pub balances: Vec<NetBalanceView>,
        pub settlements: Vec<SuggestedSettlementView>,
    }
}
