//! Split calculation: turns one expense total into per-participant shares.
//!
//! Three policies are supported:
//!
//! - [`SplitPolicy::Equal`]: everyone pays `total / n`; the remainder is
//!   spread one minor unit at a time over the first participants.
//! - [`SplitPolicy::Exact`]: each participant states the amount they owe.
//! - [`SplitPolicy::Percentage`]: each participant states a percentage; the
//!   flooring remainder goes entirely to the first participant.
//!
//! Input order is significant for both remainder rules.
use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ParticipantId, ResultEngine};

/// Slack allowed between the sum of exact amounts and the expense total.
const EXACT_TOLERANCE_MINOR: i64 = 1;

/// Slack allowed between the sum of percentages and 100.
const PERCENTAGE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// How an expense total is divided among its participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SplitPolicy {
    Equal,
    Exact,
    Percentage,
}

impl SplitPolicy {
    /// Canonical policy tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "EQUAL",
            Self::Exact => "EXACT",
            Self::Percentage => "PERCENTAGE",
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitPolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EQUAL" => Ok(Self::Equal),
            "EXACT" => Ok(Self::Exact),
            "PERCENTAGE" => Ok(Self::Percentage),
            _ => Err(EngineError::UnknownSplitPolicy(s.to_string())),
        }
    }
}

/// One participant of a split request.
///
/// `raw_amount` is an amount in minor units under EXACT, percentage points
/// under PERCENTAGE, and ignored under EQUAL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitInput {
    pub participant_id: ParticipantId,
    pub raw_amount: Option<Decimal>,
}

impl SplitInput {
    #[must_use]
    pub fn equal(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            raw_amount: None,
        }
    }

    #[must_use]
    pub fn exact(participant_id: ParticipantId, amount: Money) -> Self {
        Self {
            participant_id,
            raw_amount: Some(Decimal::from(amount.minor())),
        }
    }

    #[must_use]
    pub fn percentage(participant_id: ParticipantId, percentage: Decimal) -> Self {
        Self {
            participant_id,
            raw_amount: Some(percentage),
        }
    }
}

/// Result of a split for one participant.
///
/// `amount` is the policy-specific value that produced the split (the
/// percentage, the literal exact amount, or the equal share); `share` is
/// always the amount owed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedSplit {
    pub participant_id: ParticipantId,
    pub amount: Decimal,
    pub share: Money,
}

/// Validates a split request and computes every participant's share.
///
/// For EQUAL and PERCENTAGE the shares always add up to `total` exactly. For
/// EXACT the stated amounts are returned unchanged once they are within one
/// minor unit of `total`.
pub fn calculate_splits(
    total: Money,
    policy: SplitPolicy,
    inputs: &[SplitInput],
) -> ResultEngine<Vec<CalculatedSplit>> {
    if inputs.is_empty() {
        return Err(EngineError::EmptyParticipantSet);
    }
    if !total.is_positive() {
        return Err(EngineError::InvalidSplitAmount(format!(
            "total amount must be positive, got {}",
            total.minor()
        )));
    }

    tracing::debug!(
        policy = %policy,
        total = total.minor(),
        participants = inputs.len(),
        "calculating splits"
    );

    match policy {
        SplitPolicy::Equal => Ok(equal_splits(total, inputs)),
        SplitPolicy::Exact => exact_splits(total, inputs),
        SplitPolicy::Percentage => percentage_splits(total, inputs),
    }
}

fn equal_splits(total: Money, inputs: &[SplitInput]) -> Vec<CalculatedSplit> {
    // A slice never holds more than `isize::MAX` elements.
    let count = inputs.len() as i64;
    let base = total.minor() / count;
    let remainder = total.minor() - base * count;

    inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| {
            let extra = i64::from((idx as i64) < remainder);
            let share = Money::new(base + extra);
            CalculatedSplit {
                participant_id: input.participant_id,
                amount: Decimal::from(share.minor()),
                share,
            }
        })
        .collect()
}

fn exact_splits(total: Money, inputs: &[SplitInput]) -> ResultEngine<Vec<CalculatedSplit>> {
    let mut splits = Vec::with_capacity(inputs.len());
    let mut sum = Money::ZERO;

    for input in inputs {
        let raw = required_raw_amount(input)?;
        if raw < Decimal::ZERO {
            return Err(EngineError::InvalidSplitAmount(format!(
                "amount for {} must not be negative, got {raw}",
                input.participant_id
            )));
        }
        if !raw.fract().is_zero() {
            return Err(EngineError::InvalidSplitAmount(format!(
                "amount for {} must be a whole number of minor units, got {raw}",
                input.participant_id
            )));
        }
        let share = raw.to_i64().map(Money::new).ok_or_else(|| {
            EngineError::InvalidSplitAmount(format!(
                "amount for {} is too large",
                input.participant_id
            ))
        })?;
        sum = sum.checked_add(share).ok_or_else(|| {
            EngineError::InvalidSplitAmount("sum of exact amounts is too large".to_string())
        })?;
        splits.push(CalculatedSplit {
            participant_id: input.participant_id,
            amount: raw,
            share,
        });
    }

    if (sum.minor() - total.minor()).abs() > EXACT_TOLERANCE_MINOR {
        return Err(EngineError::SplitSumMismatch {
            sum: sum.minor(),
            total: total.minor(),
        });
    }

    Ok(splits)
}

fn percentage_splits(total: Money, inputs: &[SplitInput]) -> ResultEngine<Vec<CalculatedSplit>> {
    let mut percentages = Vec::with_capacity(inputs.len());
    let mut sum = Decimal::ZERO;

    for input in inputs {
        let raw = required_raw_amount(input)?;
        if raw < Decimal::ZERO || raw > Decimal::ONE_HUNDRED {
            return Err(EngineError::InvalidSplitAmount(format!(
                "percentage for {} must be between 0 and 100, got {raw}",
                input.participant_id
            )));
        }
        sum += raw;
        percentages.push(raw);
    }

    if (sum - Decimal::ONE_HUNDRED).abs() > PERCENTAGE_TOLERANCE {
        return Err(EngineError::PercentageSumMismatch { sum });
    }

    let total_dec = Decimal::from(total.minor());
    let mut splits = Vec::with_capacity(inputs.len());
    for (input, percentage) in inputs.iter().zip(percentages) {
        let share = (total_dec * percentage / Decimal::ONE_HUNDRED)
            .floor()
            .to_i64()
            .map(Money::new)
            .ok_or_else(|| {
                EngineError::InvalidSplitAmount(format!(
                    "share for {} is out of range",
                    input.participant_id
                ))
            })?;
        splits.push(CalculatedSplit {
            participant_id: input.participant_id,
            amount: percentage,
            share,
        });
    }

    let allocated: Money = splits.iter().map(|split| split.share).sum();
    let diff = total - allocated;
    // Only a shortfall is topped up; a sum above 100 keeps its extra unit.
    if diff.is_positive()
        && let Some(first) = splits.first_mut()
    {
        first.share += diff;
    }

    Ok(splits)
}

fn required_raw_amount(input: &SplitInput) -> ResultEngine<Decimal> {
    input.raw_amount.ok_or_else(|| {
        EngineError::InvalidSplitAmount(format!("missing amount for {}", input.participant_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pid(n: u128) -> ParticipantId {
        ParticipantId::from(Uuid::from_u128(n))
    }

    fn shares(splits: &[CalculatedSplit]) -> Vec<i64> {
        splits.iter().map(|split| split.share.minor()).collect()
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("equal".parse::<SplitPolicy>(), Ok(SplitPolicy::Equal));
        assert_eq!(" Exact ".parse::<SplitPolicy>(), Ok(SplitPolicy::Exact));
        assert_eq!(
            "PERCENTAGE".parse::<SplitPolicy>(),
            Ok(SplitPolicy::Percentage)
        );
        assert_eq!(
            "shares".parse::<SplitPolicy>(),
            Err(EngineError::UnknownSplitPolicy("shares".to_string()))
        );
    }

    #[test]
    fn equal_ignores_raw_amounts() {
        let inputs = [
            SplitInput::percentage(pid(1), Decimal::from(90)),
            SplitInput::equal(pid(2)),
        ];
        let splits = calculate_splits(Money::new(7), SplitPolicy::Equal, &inputs).unwrap();
        assert_eq!(shares(&splits), [4, 3]);
        assert_eq!(splits[0].amount, Decimal::from(4));
    }

    #[test]
    fn exact_tolerates_one_unit_without_rescaling() {
        let inputs = [
            SplitInput::exact(pid(1), Money::new(600)),
            SplitInput::exact(pid(2), Money::new(401)),
        ];
        let splits = calculate_splits(Money::new(1000), SplitPolicy::Exact, &inputs).unwrap();
        assert_eq!(shares(&splits), [600, 401]);

        let under = [
            SplitInput::exact(pid(1), Money::new(600)),
            SplitInput::exact(pid(2), Money::new(399)),
        ];
        let splits = calculate_splits(Money::new(1000), SplitPolicy::Exact, &under).unwrap();
        assert_eq!(shares(&splits), [600, 399]);
    }

    #[test]
    fn exact_rejects_fractional_minor_units() {
        let inputs = [SplitInput {
            participant_id: pid(1),
            raw_amount: Some(Decimal::new(10005, 1)),
        }];
        let err = calculate_splits(Money::new(1000), SplitPolicy::Exact, &inputs).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSplitAmount(_)));
    }

    #[test]
    fn percentage_accepts_sum_within_tolerance() {
        let inputs = [
            SplitInput::percentage(pid(1), Decimal::new(3333, 2)),
            SplitInput::percentage(pid(2), Decimal::new(3333, 2)),
            SplitInput::percentage(pid(3), Decimal::new(3333, 2)),
        ];
        // 99.99 is within 0.01 of 100.
        let splits = calculate_splits(Money::new(100), SplitPolicy::Percentage, &inputs).unwrap();
        assert_eq!(shares(&splits), [34, 33, 33]);
        assert_eq!(splits[0].amount, Decimal::new(3333, 2));
    }

    #[test]
    fn percentage_over_tolerance_is_rejected() {
        let inputs = [
            SplitInput::percentage(pid(1), Decimal::new(5002, 2)),
            SplitInput::percentage(pid(2), Decimal::from(50)),
        ];
        assert_eq!(
            calculate_splits(Money::new(100), SplitPolicy::Percentage, &inputs),
            Err(EngineError::PercentageSumMismatch {
                sum: Decimal::new(10002, 2)
            })
        );
    }

    #[test]
    fn non_positive_total_is_rejected() {
        let inputs = [SplitInput::equal(pid(1))];
        assert!(matches!(
            calculate_splits(Money::ZERO, SplitPolicy::Equal, &inputs),
            Err(EngineError::InvalidSplitAmount(_))
        ));
    }
}
