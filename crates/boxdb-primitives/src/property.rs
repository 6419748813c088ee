use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

///
/// PropertyType
///
/// Storage type of a property as understood by the native engine.
/// Discriminants are part of the native model contract.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize,
)]
#[repr(u16)]
pub enum PropertyType {
    Bool = 1,
    Byte = 2,
    Short = 3,
    Char = 4,
    Int = 5,
    Long = 6,
    Float = 7,
    Double = 8,
    String = 9,
    Date = 10,
    Relation = 11,
    ByteVector = 23,
    StringVector = 30,
}

impl PropertyType {
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Whether values of this type live in a child region referenced by offset.
    #[must_use]
    pub const fn is_offset(self) -> bool {
        matches!(self, Self::String | Self::ByteVector | Self::StringVector)
    }

    /// Width in bytes of the fixed slot, `None` for offset types.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Byte => Some(1),
            Self::Short => Some(2),
            Self::Char | Self::Int | Self::Float => Some(4),
            Self::Long | Self::Double | Self::Date | Self::Relation => Some(8),
            Self::String | Self::ByteVector | Self::StringVector => None,
        }
    }
}

///
/// PropertyFlags
///
/// Bit set of property flags. Bit values are part of the native model contract.
///

#[derive(Clone, Copy, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertyFlags(u32);

impl PropertyFlags {
    pub const NONE: Self = Self(0);
    pub const ID: Self = Self(1);
    pub const NON_PRIMITIVE_TYPE: Self = Self(2);
    pub const NOT_NULL: Self = Self(4);
    pub const INDEXED: Self = Self(8);
    pub const RESERVED: Self = Self(16);
    pub const UNIQUE: Self = Self(32);
    pub const ID_MONOTONIC_SEQUENCE: Self = Self(64);
    pub const ID_SELF_ASSIGNABLE: Self = Self(128);
    pub const INDEX_PARTIAL_SKIP_NULL: Self = Self(256);
    pub const INDEX_PARTIAL_SKIP_ZERO: Self = Self(512);
    pub const VIRTUAL: Self = Self(1024);
    pub const INDEX_HASH: Self = Self(2048);
    pub const INDEX_HASH64: Self = Self(4096);
    pub const UNSIGNED: Self = Self(8192);

    const NAMED: [(&'static str, Self); 14] = [
        ("ID", Self::ID),
        ("NON_PRIMITIVE_TYPE", Self::NON_PRIMITIVE_TYPE),
        ("NOT_NULL", Self::NOT_NULL),
        ("INDEXED", Self::INDEXED),
        ("RESERVED", Self::RESERVED),
        ("UNIQUE", Self::UNIQUE),
        ("ID_MONOTONIC_SEQUENCE", Self::ID_MONOTONIC_SEQUENCE),
        ("ID_SELF_ASSIGNABLE", Self::ID_SELF_ASSIGNABLE),
        ("INDEX_PARTIAL_SKIP_NULL", Self::INDEX_PARTIAL_SKIP_NULL),
        ("INDEX_PARTIAL_SKIP_ZERO", Self::INDEX_PARTIAL_SKIP_ZERO),
        ("VIRTUAL", Self::VIRTUAL),
        ("INDEX_HASH", Self::INDEX_HASH),
        ("INDEX_HASH64", Self::INDEX_HASH64),
        ("UNSIGNED", Self::UNSIGNED),
    ];

    /// Keep unknown bits as-is; newer engines may define more flags.
    #[must_use]
    pub const fn from_bits_retain(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Bits set in `self` that no named flag covers.
    #[must_use]
    pub const fn unknown_bits(self) -> u32 {
        let mut known = 0;
        let mut i = 0;
        while i < Self::NAMED.len() {
            let (_, flag) = Self::NAMED[i];
            known |= flag.0;
            i += 1;
        }

        self.0 & !known
    }

    /// Names of the known flags set in `self`, lowest bit first.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(name, _)| name)
    }
}

impl BitOr for PropertyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for PropertyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for PropertyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyFlags({self})")
    }
}

impl fmt::Display for PropertyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }

        let mut first = true;
        for name in self.names() {
            if !first {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
            first = false;
        }

        let known = Self::NAMED.iter().fold(0, |acc, (_, flag)| acc | flag.0);
        let unknown = self.0 & !known;
        if unknown != 0 {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "{unknown:#x}")?;
        }

        Ok(())
    }
}
