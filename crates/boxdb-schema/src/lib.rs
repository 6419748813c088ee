//! Schema model for boxdb: entity and property descriptors consumed by the
//! binding generator.
//!
//! The model is plain data. Derived facts (store type, buffer kind, slot
//! offsets) are computed once when descriptors are built, and `validate`
//! checks the cross-entity invariants before any code is generated.

pub mod case;
pub mod error;
pub mod load;
pub mod node;
pub mod types;
pub mod validate;

pub use node::SchemaModel;


use thiserror::Error as ThisError;

/// Maximum length for entity names.
pub const MAX_ENTITY_NAME_LEN: usize = 64;

/// Maximum length for property names.
pub const MAX_PROPERTY_NAME_LEN: usize = 64;

/// Byte offset of the first slot entry inside a vtable.
pub const VTABLE_HEADER_LEN: u16 = 4;

/// Most properties an entity can hold before its vtable offsets leave `u16`.
pub const MAX_PROPERTIES: usize = 32_766;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        node::*,
        types::{BufferKind, SemanticType},
    };
    pub use boxdb_primitives::{IdUid, PropertyFlags, PropertyType, TypeId};
}

///
/// SchemaError
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("schema json is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema file '{path}' could not be read: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("entity '{entity}': {message}")]
    Descriptor { entity: String, message: String },

    #[error("schema validation failed:\n{0}")]
    Validation(error::ErrorTree),
}
