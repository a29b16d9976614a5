use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, SplitInput};

/// Opaque participant key.
///
/// The engine never looks inside it: it is only compared and used as a map
/// key.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Generates a fresh random id.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for ParticipantId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ParticipantId> for Uuid {
    fn from(value: ParticipantId) -> Self {
        value.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ParticipantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A participant id together with its display name.
///
/// The name is presentation only; algorithms match on `id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered group membership.
///
/// Insertion order is meaningful: EQUAL splits hand the rounding remainder
/// to members in this order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    members: IndexMap<ParticipantId, Participant>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a member, rejecting ids already present.
    pub fn add(&mut self, participant: Participant) -> ResultEngine<()> {
        if self.members.contains_key(&participant.id) {
            return Err(EngineError::DuplicateParticipant(participant.id));
        }
        self.members.insert(participant.id, participant);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.members.get(id)
    }

    /// Like [`Roster::get`], but a missing member is an error.
    pub fn require(&self, id: &ParticipantId) -> ResultEngine<&Participant> {
        self.get(id).ok_or(EngineError::UnknownParticipant(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.members.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// One input per member, in roster order, for an EQUAL split.
    #[must_use]
    pub fn equal_inputs(&self) -> Vec<SplitInput> {
        self.members.keys().map(|id| SplitInput::equal(*id)).collect()
    }
}

impl TryFrom<Vec<Participant>> for Roster {
    type Error = EngineError;

    fn try_from(participants: Vec<Participant>) -> Result<Self, Self::Error> {
        let mut roster = Roster::new();
        for participant in participants {
            roster.add(participant)?;
        }
        Ok(roster)
    }
}
