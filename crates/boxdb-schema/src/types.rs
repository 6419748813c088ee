use boxdb_primitives::PropertyType;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

///
/// BufferKind
///
/// Whether a property lives inline in its table slot or in a child region
/// referenced by a backward offset.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferKind {
    Fixed,
    Offset,
}

///
/// SemanticType
///
/// Rust-side type of a record field. The textual form is the Rust type as
/// written in the record struct, which is also the form used in schema JSON.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum SemanticType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    Char,
    F32,
    F64,
    String,
    Bytes,
    StringVec,
}

impl SemanticType {
    /// Rust type text used in generated code and schema JSON.
    #[must_use]
    pub const fn rust_type(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Bytes => "Vec<u8>",
            Self::Char => "char",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I8 => "i8",
            Self::Isize => "isize",
            Self::String => "String",
            Self::StringVec => "Vec<String>",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U8 => "u8",
            Self::Usize => "usize",
        }
    }

    /// Native storage type for this semantic type.
    #[must_use]
    pub const fn store_type(self) -> PropertyType {
        match self {
            Self::Bool => PropertyType::Bool,
            Self::I8 | Self::U8 => PropertyType::Byte,
            Self::I16 | Self::U16 => PropertyType::Short,
            Self::Char => PropertyType::Char,
            Self::I32 | Self::U32 | Self::Isize | Self::Usize => PropertyType::Int,
            Self::I64 | Self::U64 => PropertyType::Long,
            Self::F32 => PropertyType::Float,
            Self::F64 => PropertyType::Double,
            Self::String => PropertyType::String,
            Self::Bytes => PropertyType::ByteVector,
            Self::StringVec => PropertyType::StringVector,
        }
    }

    #[must_use]
    pub const fn buffer_kind(self) -> BufferKind {
        if self.store_type().is_offset() {
            BufferKind::Offset
        } else {
            BufferKind::Fixed
        }
    }

    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize
        )
    }

    /// Platform-width integers that are narrowed into 32-bit slots.
    #[must_use]
    pub const fn is_platform_int(self) -> bool {
        matches!(self, Self::Isize | Self::Usize)
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.rust_type())
    }
}

impl FromStr for SemanticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        let ty = match compact.as_str() {
            "bool" => Self::Bool,
            "Vec<u8>" => Self::Bytes,
            "char" => Self::Char,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "isize" => Self::Isize,
            "String" => Self::String,
            "Vec<String>" => Self::StringVec,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "usize" => Self::Usize,
            _ => return Err(format!("unknown semantic type '{s}'")),
        };

        Ok(ty)
    }
}

impl TryFrom<String> for SemanticType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SemanticType> for String {
    fn from(ty: SemanticType) -> Self {
        ty.rust_type().to_string()
    }
}
