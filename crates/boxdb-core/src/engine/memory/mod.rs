mod cursor;
mod eval;


use crate::{
    Error,
    engine::{CursorFn, NativeError, NativeStore, ParamValue, QueryHandle},
    model::{Model, ModelEntity},
    query::Condition,
};
use boxdb_primitives::TypeId;
use cursor::{MemoryCursor, Rows, UndoLog};
use std::{
    collections::{BTreeMap, HashMap},
    num::NonZeroU64,
    sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

///
/// MemoryStore
///
/// In-process engine keeping one ordered row map per entity.
/// Write cursors change rows in place and keep an undo log; a callback that
/// returns `Err` has every change rolled back.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    queries: Mutex<QueryTable>,
}

#[derive(Debug, Default)]
struct State {
    model: Option<Model>,
    entities: HashMap<TypeId, EntityRows>,
}

#[derive(Debug, Default)]
struct EntityRows {
    rows: BTreeMap<u64, Vec<u8>>,
    last_id: u64,
}

#[derive(Debug, Default)]
struct QueryTable {
    issued: u64,
    open: HashMap<QueryHandle, CompiledQuery>,
}

#[derive(Clone, Debug)]
struct CompiledQuery {
    entity_id: TypeId,
    conditions: Vec<Condition>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of compiled queries not yet closed.
    pub fn open_queries(&self) -> usize {
        self.lock_queries().map_or(0, |queries| queries.open.len())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, State>, NativeError> {
        self.state
            .read()
            .map_err(|_| NativeError::illegal_state("store state lock poisoned"))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, State>, NativeError> {
        self.state
            .write()
            .map_err(|_| NativeError::illegal_state("store state lock poisoned"))
    }

    fn lock_queries(&self) -> Result<MutexGuard<'_, QueryTable>, NativeError> {
        self.queries
            .lock()
            .map_err(|_| NativeError::illegal_state("query table lock poisoned"))
    }

    fn compiled(&self, query: QueryHandle) -> Result<CompiledQuery, NativeError> {
        self.lock_queries()?
            .open
            .get(&query)
            .cloned()
            .ok_or_else(|| unknown_query(query))
    }
}

impl NativeStore for MemoryStore {
    fn open(&self, model: &Model) -> Result<(), NativeError> {
        let mut state = self.write_state()?;
        if state.model.is_some() {
            return Err(NativeError::illegal_state("store is already open"));
        }

        state.entities = model
            .entities()
            .iter()
            .map(|entity| (entity.id, EntityRows::default()))
            .collect();
        state.model = Some(model.clone());

        Ok(())
    }

    fn with_cursor(
        &self,
        entity_id: TypeId,
        write: bool,
        f: &mut CursorFn<'_>,
    ) -> Result<(), Error> {
        if write {
            let mut guard = self.write_state()?;
            let state = &mut *guard;
            let entity = model_entity(state.model.as_ref(), entity_id)?;
            let rows = state
                .entities
                .get_mut(&entity_id)
                .ok_or_else(|| NativeError::not_found(format!("entity {entity_id} has no rows")))?;

            let mut undo = UndoLog::new(rows);
            let result = f(&mut MemoryCursor::new(
                self,
                entity,
                Rows::Write(&mut *rows, &mut undo),
            ));
            if result.is_err() {
                undo.rollback(rows);
            }
            result?;
        } else {
            let state = self.read_state()?;
            let entity = model_entity(state.model.as_ref(), entity_id)?;
            let rows = state
                .entities
                .get(&entity_id)
                .ok_or_else(|| NativeError::not_found(format!("entity {entity_id} has no rows")))?;

            f(&mut MemoryCursor::new(self, entity, Rows::Read(rows)))?;
        }

        Ok(())
    }

    fn query_create(
        &self,
        entity_id: TypeId,
        conditions: &[Condition],
    ) -> Result<QueryHandle, NativeError> {
        {
            let state = self.read_state()?;
            let entity = model_entity(state.model.as_ref(), entity_id)?;
            for condition in conditions {
                eval::validate(entity, condition)?;
            }
        }

        let mut queries = self.lock_queries()?;
        queries.issued += 1;
        let handle = NonZeroU64::new(queries.issued)
            .map(QueryHandle::new)
            .ok_or_else(|| NativeError::illegal_state("query handles exhausted"))?;

        queries.open.insert(
            handle,
            CompiledQuery {
                entity_id,
                conditions: conditions.to_vec(),
            },
        );

        Ok(handle)
    }

    fn query_close(&self, query: QueryHandle) -> Result<(), NativeError> {
        self.lock_queries()?
            .open
            .remove(&query)
            .map(|_| ())
            .ok_or_else(|| unknown_query(query))
    }

    fn query_describe(&self, query: QueryHandle) -> Result<String, NativeError> {
        let compiled = self.compiled(query)?;
        let state = self.read_state()?;
        let entity = model_entity(state.model.as_ref(), compiled.entity_id)?;

        Ok(eval::describe(entity, &compiled.conditions))
    }

    fn query_set_param(
        &self,
        query: QueryHandle,
        entity_id: TypeId,
        property_id: TypeId,
        value: ParamValue,
    ) -> Result<(), NativeError> {
        let mut queries = self.lock_queries()?;
        let compiled = queries
            .open
            .get_mut(&query)
            .ok_or_else(|| unknown_query(query))?;

        if compiled.entity_id != entity_id {
            return Err(NativeError::illegal_argument(format!(
                "query is for entity {}, not {entity_id}",
                compiled.entity_id
            )));
        }

        let applied = compiled
            .conditions
            .iter_mut()
            .filter(|c| c.property().property_id() == property_id)
            .any(|c| eval::apply_param(c, &value));

        if applied {
            Ok(())
        } else {
            Err(NativeError::illegal_argument(format!(
                "no condition on property {property_id} accepts {value:?}"
            )))
        }
    }
}

fn model_entity(model: Option<&Model>, entity_id: TypeId) -> Result<&ModelEntity, NativeError> {
    model
        .ok_or_else(|| NativeError::illegal_state("store is not open"))?
        .entity(entity_id)
        .ok_or_else(|| NativeError::not_found(format!("entity {entity_id} is not in the model")))
}

fn unknown_query(query: QueryHandle) -> NativeError {
    NativeError::illegal_state(format!("query {} is not open", query.get()))
}
