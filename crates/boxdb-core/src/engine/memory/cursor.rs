use super::{CompiledQuery, EntityRows, MemoryStore, eval};
use crate::{
    buffer::Table,
    engine::{NativeCursor, NativeError, QueryHandle},
    model::ModelEntity,
};

pub(super) enum Rows<'a> {
    Read(&'a EntityRows),
    Write(&'a mut EntityRows, &'a mut UndoLog),
}

///
/// UndoLog
///
/// Prior value of every row a write cursor changed, in change order.
///

#[derive(Debug)]
pub(super) struct UndoLog {
    last_id: u64,
    prior: Vec<(u64, Option<Vec<u8>>)>,
}

impl UndoLog {
    pub(super) const fn new(rows: &EntityRows) -> Self {
        Self {
            last_id: rows.last_id,
            prior: Vec::new(),
        }
    }

    fn record(&mut self, id: u64, prior: Option<Vec<u8>>) {
        self.prior.push((id, prior));
    }

    /// Replay the log newest first, restoring `rows` to its state when the
    /// cursor opened.
    pub(super) fn rollback(self, rows: &mut EntityRows) {
        for (id, prior) in self.prior.into_iter().rev() {
            match prior {
                Some(bytes) => rows.rows.insert(id, bytes),
                None => rows.rows.remove(&id),
            };
        }
        rows.last_id = self.last_id;
    }
}

///
/// MemoryCursor
///

pub(super) struct MemoryCursor<'a> {
    store: &'a MemoryStore,
    entity: &'a ModelEntity,
    rows: Rows<'a>,
}

impl<'a> MemoryCursor<'a> {
    pub(super) const fn new(
        store: &'a MemoryStore,
        entity: &'a ModelEntity,
        rows: Rows<'a>,
    ) -> Self {
        Self {
            store,
            entity,
            rows,
        }
    }

    fn rows(&self) -> &EntityRows {
        match &self.rows {
            Rows::Read(rows) => *rows,
            Rows::Write(rows, _) => &**rows,
        }
    }

    fn rows_mut(&mut self) -> Result<(&mut EntityRows, &mut UndoLog), NativeError> {
        match &mut self.rows {
            Rows::Read(_) => Err(NativeError::illegal_state(format!(
                "cursor for '{}' is read-only",
                self.entity.name
            ))),
            Rows::Write(rows, undo) => Ok((&mut **rows, &mut **undo)),
        }
    }

    fn query(&self, handle: QueryHandle) -> Result<CompiledQuery, NativeError> {
        let query = self.store.compiled(handle)?;
        if query.entity_id != self.entity.id {
            return Err(NativeError::illegal_argument(format!(
                "query {} is for entity {}, cursor is for '{}'",
                handle.get(),
                query.entity_id,
                self.entity.name
            )));
        }

        Ok(query)
    }

    /// Matching rows in id order.
    fn matching(&self, handle: QueryHandle) -> Result<Vec<(u64, &[u8])>, NativeError> {
        let query = self.query(handle)?;
        let mut out = Vec::new();

        for (id, bytes) in &self.rows().rows {
            let table = Table::root(bytes).map_err(|err| {
                NativeError::illegal_state(format!("record {id} is unreadable: {err}"))
            })?;

            if eval::matches_all(self.entity, &table, &query.conditions)? {
                out.push((*id, bytes.as_slice()));
            }
        }

        Ok(out)
    }
}

impl NativeCursor for MemoryCursor<'_> {
    fn get(&mut self, id: u64) -> Result<Option<Vec<u8>>, NativeError> {
        Ok(self.rows().rows.get(&id).cloned())
    }

    fn get_all(&mut self) -> Result<Vec<Vec<u8>>, NativeError> {
        Ok(self.rows().rows.values().cloned().collect())
    }

    fn id_for_put(&mut self, id: u64) -> Result<u64, NativeError> {
        let (rows, _) = self.rows_mut()?;
        if id == 0 {
            rows.last_id += 1;
            return Ok(rows.last_id);
        }

        rows.last_id = rows.last_id.max(id);

        Ok(id)
    }

    fn put(&mut self, id: u64, data: &[u8]) -> Result<(), NativeError> {
        if id == 0 {
            return Err(NativeError::illegal_argument("cannot put with id 0"));
        }

        let (rows, undo) = self.rows_mut()?;
        let prior = rows.rows.insert(id, data.to_vec());
        undo.record(id, prior);
        rows.last_id = rows.last_id.max(id);

        Ok(())
    }

    fn remove(&mut self, id: u64) -> Result<bool, NativeError> {
        let (rows, undo) = self.rows_mut()?;
        let Some(prior) = rows.rows.remove(&id) else {
            return Ok(false);
        };
        undo.record(id, Some(prior));

        Ok(true)
    }

    fn remove_all(&mut self) -> Result<u64, NativeError> {
        let (rows, undo) = self.rows_mut()?;
        let removed = std::mem::take(&mut rows.rows);
        let count = removed.len() as u64;
        undo.prior.extend(removed.into_iter().map(|(id, bytes)| (id, Some(bytes))));

        Ok(count)
    }

    fn count(&mut self) -> Result<u64, NativeError> {
        Ok(self.rows().rows.len() as u64)
    }

    fn query_find(
        &mut self,
        query: QueryHandle,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Vec<u8>>, NativeError> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = match limit {
            0 => usize::MAX,
            n => usize::try_from(n).unwrap_or(usize::MAX),
        };

        Ok(self
            .matching(query)?
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|(_, bytes)| bytes.to_vec())
            .collect())
    }

    fn query_find_ids(&mut self, query: QueryHandle) -> Result<Vec<u64>, NativeError> {
        Ok(self.matching(query)?.into_iter().map(|(id, _)| id).collect())
    }

    fn query_count(&mut self, query: QueryHandle) -> Result<u64, NativeError> {
        Ok(self.matching(query)?.len() as u64)
    }

    fn query_remove(&mut self, query: QueryHandle) -> Result<u64, NativeError> {
        let ids = self.query_find_ids(query)?;
        let (rows, undo) = self.rows_mut()?;
        for id in &ids {
            if let Some(prior) = rows.rows.remove(id) {
                undo.record(*id, Some(prior));
            }
        }

        Ok(ids.len() as u64)
    }
}
