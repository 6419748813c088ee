//! Compiled queries and their parameters.
//!
//! A [`Query`] owns one native query handle. It is `Open` until `close` is
//! called or the query is dropped, then permanently `Closed`; the handle is
//! checked and used under the same lock `close` takes.

mod condition;


pub use condition::Condition;

use crate::{
    Error, ParamArityError,
    binding::{Binding, Property},
    engine::{ParamValue, QueryHandle},
    store::Store,
};
use std::sync::{Mutex, MutexGuard, PoisonError};

///
/// Query
///

pub struct Query<B: Binding> {
    store: Store,
    binding: B,
    handle: Mutex<Option<QueryHandle>>,
    offset: u64,
    limit: u64,
}

impl<B: Binding> Query<B> {
    pub(crate) const fn new(store: Store, binding: B, handle: QueryHandle) -> Self {
        Self {
            store,
            binding,
            handle: Mutex::new(Some(handle)),
            offset: 0,
            limit: 0,
        }
    }

    /// Number of matching records to skip.
    pub const fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = offset;
        self
    }

    /// Maximum number of records to return; `0` means no limit.
    pub const fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Option<QueryHandle>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_handle<R>(&self, f: impl FnOnce(QueryHandle) -> Result<R, Error>) -> Result<R, Error> {
        let guard = self.lock();
        let handle = (*guard).ok_or(Error::ClosedResource)?;

        f(handle)
    }

    const fn reject_options(&self, operation: &'static str) -> Result<(), Error> {
        if self.offset != 0 || self.limit != 0 {
            return Err(Error::UnsupportedOptionCombination { operation });
        }

        Ok(())
    }

    /// Release the native query. Closing twice is a no-op; the handle is
    /// cleared even if the native close fails.
    pub fn close(&self) -> Result<(), Error> {
        let Some(handle) = self.lock().take() else {
            return Ok(());
        };

        tracing::debug!(entity = B::ENTITY_NAME, query = handle.get(), "closing query");
        self.store.native().query_close(handle)?;

        Ok(())
    }

    pub fn find(&self) -> Result<Vec<B::Entity>, Error> {
        self.with_handle(|handle| {
            self.store.run_with_cursor(B::ENTITY_ID, true, |cursor| {
                let buffers = cursor.query_find(handle, self.offset, self.limit)?;

                self.binding.decode_all(buffers)
            })
        })
    }

    /// Matching ids in native order. Offset and limit are applied here,
    /// after the native call returns.
    pub fn find_ids(&self) -> Result<Vec<u64>, Error> {
        let ids = self.with_handle(|handle| {
            self.store.run_with_cursor(B::ENTITY_ID, true, |cursor| {
                Ok(cursor.query_find_ids(handle)?)
            })
        })?;

        Ok(paginate(ids, self.offset, self.limit))
    }

    pub fn count(&self) -> Result<u64, Error> {
        self.with_handle(|handle| {
            self.reject_options("count")?;

            self.store.run_with_cursor(B::ENTITY_ID, true, |cursor| {
                Ok(cursor.query_count(handle)?)
            })
        })
    }

    /// Delete every matching record, returning how many were removed.
    pub fn remove(&self) -> Result<u64, Error> {
        self.with_handle(|handle| {
            self.reject_options("remove")?;

            self.store.run_with_cursor(B::ENTITY_ID, false, |cursor| {
                Ok(cursor.query_remove(handle)?)
            })
        })
    }

    pub fn describe(&self) -> Result<String, Error> {
        self.with_handle(|handle| Ok(self.store.native().query_describe(handle)?))
    }

    fn set_param(
        &self,
        property: Property,
        given: usize,
        max: Option<usize>,
        value: impl FnOnce() -> ParamValue,
    ) -> Result<(), Error> {
        self.with_handle(|handle| {
            ParamArityError::check(given, max)?;

            self.store.native().query_set_param(
                handle,
                property.entity_id(),
                property.property_id(),
                value(),
            )?;

            Ok(())
        })
    }

    /// Exactly one value.
    pub fn set_string_params<S: AsRef<str>>(
        &self,
        property: Property,
        values: &[S],
    ) -> Result<(), Error> {
        self.set_param(property, values.len(), Some(1), || {
            ParamValue::String(values[0].as_ref().to_string())
        })
    }

    pub fn set_string_params_in<S: AsRef<str>>(
        &self,
        property: Property,
        values: &[S],
    ) -> Result<(), Error> {
        self.set_param(property, values.len(), None, || {
            ParamValue::StringIn(values.iter().map(|v| v.as_ref().to_string()).collect())
        })
    }

    /// One value, or two for a range condition.
    pub fn set_int64_params(&self, property: Property, values: &[i64]) -> Result<(), Error> {
        self.set_param(property, values.len(), Some(2), || match *values {
            [a, b] => ParamValue::IntPair(a, b),
            _ => ParamValue::Int(values[0]),
        })
    }

    pub fn set_int64_params_in(&self, property: Property, values: &[i64]) -> Result<(), Error> {
        self.set_param(property, values.len(), None, || {
            ParamValue::Int64In(values.to_vec())
        })
    }

    pub fn set_int32_params_in(&self, property: Property, values: &[i32]) -> Result<(), Error> {
        self.set_param(property, values.len(), None, || {
            ParamValue::Int32In(values.to_vec())
        })
    }

    /// One value, or two for a range condition.
    pub fn set_float64_params(&self, property: Property, values: &[f64]) -> Result<(), Error> {
        self.set_param(property, values.len(), Some(2), || match *values {
            [a, b] => ParamValue::DoublePair(a, b),
            _ => ParamValue::Double(values[0]),
        })
    }

    /// Exactly one value.
    pub fn set_bytes_params<V: AsRef<[u8]>>(
        &self,
        property: Property,
        values: &[V],
    ) -> Result<(), Error> {
        self.set_param(property, values.len(), Some(1), || {
            ParamValue::Bytes(values[0].as_ref().to_vec())
        })
    }
}

impl<B: Binding> Drop for Query<B> {
    fn drop(&mut self) {
        let handle = self
            .handle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            tracing::warn!(
                entity = B::ENTITY_NAME,
                query = handle.get(),
                "query dropped without close; releasing it now"
            );

            if let Err(err) = self.store.native().query_close(handle) {
                tracing::warn!(entity = B::ENTITY_NAME, %err, "closing dropped query failed");
            }
        }
    }
}

/// Skip `offset` ids, then keep at most `limit` (`0` keeps the rest).
pub(crate) fn paginate(mut ids: Vec<u64>, offset: u64, limit: u64) -> Vec<u64> {
    if offset == 0 && limit == 0 {
        return ids;
    }

    let len = ids.len();
    let start = usize::try_from(offset).map_or(len, |offset| offset.min(len));
    let end = match limit {
        0 => len,
        limit => usize::try_from(limit).map_or(len, |limit| start.saturating_add(limit).min(len)),
    };

    ids.truncate(end);
    ids.drain(..start);

    ids
}
