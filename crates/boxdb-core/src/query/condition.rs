use crate::binding::Property;

///
/// Condition
///
/// One comparison against a property. A query ANDs all of its conditions.
/// Values given here are defaults; parameter setters replace them on the
/// compiled query.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    StringEquals { property: Property, value: String },
    StringIn { property: Property, values: Vec<String> },
    IntEquals { property: Property, value: i64 },
    IntGreater { property: Property, value: i64 },
    IntLess { property: Property, value: i64 },
    IntBetween { property: Property, low: i64, high: i64 },
    Int64In { property: Property, values: Vec<i64> },
    Int32In { property: Property, values: Vec<i32> },
    DoubleGreater { property: Property, value: f64 },
    DoubleLess { property: Property, value: f64 },
    DoubleBetween { property: Property, low: f64, high: f64 },
    BytesEquals { property: Property, value: Vec<u8> },
}

impl Condition {
    #[must_use]
    pub const fn property(&self) -> Property {
        match self {
            Self::StringEquals { property, .. }
            | Self::StringIn { property, .. }
            | Self::IntEquals { property, .. }
            | Self::IntGreater { property, .. }
            | Self::IntLess { property, .. }
            | Self::IntBetween { property, .. }
            | Self::Int64In { property, .. }
            | Self::Int32In { property, .. }
            | Self::DoubleGreater { property, .. }
            | Self::DoubleLess { property, .. }
            | Self::DoubleBetween { property, .. }
            | Self::BytesEquals { property, .. } => *property,
        }
    }
}

impl Property {
    pub fn equals_string(self, value: impl Into<String>) -> Condition {
        Condition::StringEquals {
            property: self,
            value: value.into(),
        }
    }

    pub fn in_strings<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Condition {
        Condition::StringIn {
            property: self,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub const fn equals_int(self, value: i64) -> Condition {
        Condition::IntEquals {
            property: self,
            value,
        }
    }

    #[must_use]
    pub const fn greater_than(self, value: i64) -> Condition {
        Condition::IntGreater {
            property: self,
            value,
        }
    }

    #[must_use]
    pub const fn less_than(self, value: i64) -> Condition {
        Condition::IntLess {
            property: self,
            value,
        }
    }

    /// Inclusive on both ends.
    #[must_use]
    pub const fn between(self, low: i64, high: i64) -> Condition {
        Condition::IntBetween {
            property: self,
            low,
            high,
        }
    }

    pub fn in_int64(self, values: impl IntoIterator<Item = i64>) -> Condition {
        Condition::Int64In {
            property: self,
            values: values.into_iter().collect(),
        }
    }

    pub fn in_int32(self, values: impl IntoIterator<Item = i32>) -> Condition {
        Condition::Int32In {
            property: self,
            values: values.into_iter().collect(),
        }
    }

    #[must_use]
    pub const fn greater_than_double(self, value: f64) -> Condition {
        Condition::DoubleGreater {
            property: self,
            value,
        }
    }

    #[must_use]
    pub const fn less_than_double(self, value: f64) -> Condition {
        Condition::DoubleLess {
            property: self,
            value,
        }
    }

    #[must_use]
    pub const fn between_double(self, low: f64, high: f64) -> Condition {
        Condition::DoubleBetween {
            property: self,
            low,
            high,
        }
    }

    pub fn equals_bytes(self, value: impl Into<Vec<u8>>) -> Condition {
        Condition::BytesEquals {
            property: self,
            value: value.into(),
        }
    }
}
