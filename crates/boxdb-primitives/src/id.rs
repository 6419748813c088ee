use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// TypeId
/// Model-scoped numeric id of an entity or a property.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct TypeId(u32);

impl TypeId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero is never a valid model id.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

///
/// IdUidParseError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum IdUidParseError {
    #[error("id/uid '{0}' must have the form 'id:uid'")]
    Format(String),

    #[error("id/uid '{0}' contains a non-numeric component")]
    Number(String),
}

///
/// IdUid
///
/// Pair of a (reassignable) model id and a (stable) unique id.
/// Serialized as `"id:uid"`, the form used by model JSON files.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdUid {
    pub id: TypeId,
    pub uid: u64,
}

impl IdUid {
    #[must_use]
    pub const fn new(id: u32, uid: u64) -> Self {
        Self {
            id: TypeId::new(id),
            uid,
        }
    }

    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id.get()
    }

    #[must_use]
    pub const fn uid(&self) -> u64 {
        self.uid
    }
}

impl fmt::Display for IdUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.uid)
    }
}

impl FromStr for IdUid {
    type Err = IdUidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, uid) = s
            .split_once(':')
            .ok_or_else(|| IdUidParseError::Format(s.to_string()))?;

        let id = id
            .trim()
            .parse::<u32>()
            .map_err(|_| IdUidParseError::Number(s.to_string()))?;
        let uid = uid
            .trim()
            .parse::<u64>()
            .map_err(|_| IdUidParseError::Number(s.to_string()))?;

        Ok(Self::new(id, uid))
    }
}

impl TryFrom<String> for IdUid {
    type Error = IdUidParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IdUid> for String {
    fn from(id: IdUid) -> Self {
        id.to_string()
    }
}
