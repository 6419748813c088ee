//! Boundary to the native storage engine.
//!
//! Everything the runtime needs from storage goes through [`NativeStore`] and
//! the cursor it lends out. [`MemoryStore`] is the in-process implementation
//! used by tests and examples.

mod memory;

pub use memory::MemoryStore;

use crate::{Error, model::Model, query::Condition};
use boxdb_primitives::TypeId;
use std::num::NonZeroU64;
use thiserror::Error as ThisError;

pub const ERROR_ILLEGAL_STATE: i32 = 10001;
pub const ERROR_ILLEGAL_ARGUMENT: i32 = 10002;
pub const ERROR_NOT_FOUND: i32 = 404;

///
/// NativeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("native error {code}: {message}")]
pub struct NativeError {
    pub code: i32,
    pub message: String,
}

impl NativeError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ERROR_ILLEGAL_STATE, message)
    }

    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::new(ERROR_ILLEGAL_ARGUMENT, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ERROR_NOT_FOUND, message)
    }
}

///
/// QueryHandle
///
/// Opaque engine-issued token for a compiled query.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct QueryHandle(NonZeroU64);

impl QueryHandle {
    #[must_use]
    pub const fn new(raw: NonZeroU64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

///
/// ParamValue
///
/// Replacement value for a condition of a compiled query.
///

#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    String(String),
    StringIn(Vec<String>),
    Int(i64),
    IntPair(i64, i64),
    Int64In(Vec<i64>),
    Int32In(Vec<i32>),
    Double(f64),
    DoublePair(f64, f64),
    Bytes(Vec<u8>),
}

///
/// NativeCursor
///
/// Entity-scoped access lent out for the duration of one callback.
/// Buffers go in and come out in the flat record format.
///

pub trait NativeCursor {
    fn get(&mut self, id: u64) -> Result<Option<Vec<u8>>, NativeError>;

    fn get_all(&mut self) -> Result<Vec<Vec<u8>>, NativeError>;

    /// Resolve the id a put will use: `0` asks for a new one.
    fn id_for_put(&mut self, id: u64) -> Result<u64, NativeError>;

    fn put(&mut self, id: u64, data: &[u8]) -> Result<(), NativeError>;

    fn remove(&mut self, id: u64) -> Result<bool, NativeError>;

    fn remove_all(&mut self) -> Result<u64, NativeError>;

    fn count(&mut self) -> Result<u64, NativeError>;

    fn query_find(
        &mut self,
        query: QueryHandle,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Vec<u8>>, NativeError>;

    fn query_find_ids(&mut self, query: QueryHandle) -> Result<Vec<u64>, NativeError>;

    fn query_count(&mut self, query: QueryHandle) -> Result<u64, NativeError>;

    fn query_remove(&mut self, query: QueryHandle) -> Result<u64, NativeError>;
}

/// Callback run against a borrowed cursor.
pub type CursorFn<'a> = dyn FnMut(&mut dyn NativeCursor) -> Result<(), Error> + 'a;

///
/// NativeStore
///

pub trait NativeStore: Send + Sync {
    /// Called once by the store builder before any other call.
    fn open(&self, model: &Model) -> Result<(), NativeError>;

    /// Run `f` with a cursor over `entity_id`. Writes made through a write
    /// cursor are committed only if `f` succeeds.
    fn with_cursor(&self, entity_id: TypeId, write: bool, f: &mut CursorFn<'_>)
    -> Result<(), Error>;

    fn query_create(
        &self,
        entity_id: TypeId,
        conditions: &[Condition],
    ) -> Result<QueryHandle, NativeError>;

    fn query_close(&self, query: QueryHandle) -> Result<(), NativeError>;

    fn query_describe(&self, query: QueryHandle) -> Result<String, NativeError>;

    fn query_set_param(
        &self,
        query: QueryHandle,
        entity_id: TypeId,
        property_id: TypeId,
        value: ParamValue,
    ) -> Result<(), NativeError>;
}
