//! The module contains the errors the engine can return.
//!
//! Split validation errors:
//!
//! - [`EmptyParticipantSet`] returned when a split has no participants.
//! - [`InvalidSplitAmount`] returned when a raw amount is missing or out of range.
//! - [`SplitSumMismatch`] returned when exact amounts do not add up to the total.
//! - [`PercentageSumMismatch`] returned when percentages do not add up to 100.
//! - [`UnknownSplitPolicy`] returned when a policy tag is not recognized.
//!
//! The remaining variants come from the in-memory [`Ledger`].
//!
//!  [`EmptyParticipantSet`]: EngineError::EmptyParticipantSet
//!  [`InvalidSplitAmount`]: EngineError::InvalidSplitAmount
//!  [`SplitSumMismatch`]: EngineError::SplitSumMismatch
//!  [`PercentageSumMismatch`]: EngineError::PercentageSumMismatch
//!  [`UnknownSplitPolicy`]: EngineError::UnknownSplitPolicy
//!  [`Ledger`]: crate::Ledger
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ParticipantId;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("at least one participant required")]
    EmptyParticipantSet,
    #[error("invalid split amount: {0}")]
    InvalidSplitAmount(String),
    #[error("split amounts sum to {sum} but the expense total is {total}")]
    SplitSumMismatch { sum: i64, total: i64 },
    #[error("percentages must add up to 100, got {sum}")]
    PercentageSumMismatch { sum: Decimal },
    #[error("unknown split policy: \"{0}\"")]
    UnknownSplitPolicy(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("participant {0} is not a member of this group")]
    UnknownParticipant(ParticipantId),
    #[error("participant {0} is already a member of this group")]
    DuplicateParticipant(ParticipantId),
    #[error("settlement #{0} not found")]
    SettlementNotFound(usize),
    #[error("invalid settlement state: {0}")]
    InvalidSettlementState(String),
}
