//! ## Crate layout
//! - `build`: binding generator, called from build scripts through `build!`.
//! - `core`: runtime bindings, boxes, queries and the native engine boundary.
//! - `schema`: schema model, JSON loading and validation.
//!
//! Generated bindings name everything through `::boxdb`, so a crate using
//! them only needs this one dependency (plus a build dependency for the
//! generator).

pub use boxdb_build as build;
pub use boxdb_core as core;
pub use boxdb_schema as schema;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Runtime
//

pub use boxdb_core::{
    Binding, BufferBuilder, BufferError, Condition, DecodeError, EntityBox, Error, IdUid,
    MemoryStore, Model, ModelBuilder, ModelError, NativeError, Offset, ParamArityError, Property,
    PropertyFlags, PropertyType, Query, Store, StoreBuilder, Table, TypeId,
};

//
// Macros
//

pub use boxdb_build::build;
pub use boxdb_core::include_bindings;

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::{MemoryStore, StoreBuilder};
}
