//! Ledger arithmetic for shared expenses.
//!
//! Two pure components make up the engine:
//!
//! - [`calculate_splits`] divides one expense total into per-participant
//!   shares under a [`SplitPolicy`].
//! - [`BalanceSimplifier`] nets a set of [`Obligation`]s and proposes the
//!   payments that clear them.
//!
//! [`Ledger`] glues both together for an in-memory group book.
//!
//! ```rust
//! use engine::{Money, ParticipantId, SplitInput, SplitPolicy, calculate_splits};
//!
//! let (a, b, c) = (
//!     ParticipantId::new_v4(),
//!     ParticipantId::new_v4(),
//!     ParticipantId::new_v4(),
//! );
//! let inputs = [SplitInput::equal(a), SplitInput::equal(b), SplitInput::equal(c)];
//! let splits = calculate_splits(Money::new(100), SplitPolicy::Equal, &inputs).unwrap();
//! let shares: Vec<i64> = splits.iter().map(|s| s.share.minor()).collect();
//! assert_eq!(shares, [34, 33, 33]);
//! ```
pub use balances::{NetBalance, NetBalances, Obligation, compute_net_balances};
pub use error::EngineError;
pub use ledger::{Expense, ExpenseShare, Ledger, Settlement, SettlementStatus};
pub use money::Money;
pub use participant::{Participant, ParticipantId, Roster};
pub use rust_decimal::Decimal;
pub use simplify::{BalanceSimplifier, OptimizedSettlement, simplified_settlements, simplify};
pub use split::{CalculatedSplit, SplitInput, SplitPolicy, calculate_splits};

mod balances;
mod error;
mod ledger;
mod money;
mod participant;
mod simplify;
mod split;

type ResultEngine<T> = Result<T, EngineError>;
