//! Runtime for boxdb: generated bindings, typed boxes, compiled queries and
//! the boundary to the native storage engine.

#[macro_use]
mod macros;

// public exports are one module level down
pub mod binding;
pub mod buffer;
pub mod engine;
pub mod entity_box;
pub mod error;
pub mod model;
pub mod query;
pub mod store;

// test
#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use binding::{Binding, Property};
pub use boxdb_primitives::{IdUid, PropertyFlags, PropertyType, TypeId};
pub use buffer::{BufferBuilder, BufferError, DecodeError, Offset, Table};
pub use engine::{MemoryStore, NativeError};
pub use entity_box::EntityBox;
pub use error::{Error, ParamArityError};
pub use model::{Model, ModelBuilder, ModelError};
pub use query::{Condition, Query};
pub use store::{Store, StoreBuilder};

///
/// Prelude
///
/// Types generated code and typical callers name directly.
///

pub mod prelude {
    pub use crate::{
        binding::{Binding, Property},
        entity_box::EntityBox,
        query::{Condition, Query},
        store::Store,
    };
}
