use crate::{
    Error,
    binding::Binding,
    query::{Condition, Query},
    store::Store,
};

///
/// EntityBox
///
/// Typed CRUD access to one entity. Marshalling goes through the binding,
/// storage through one native cursor per call.
///

pub struct EntityBox<B: Binding> {
    store: Store,
    binding: B,
}

impl<B: Binding> std::fmt::Debug for EntityBox<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityBox")
            .field("entity", &B::ENTITY_NAME)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<B: Binding> EntityBox<B> {
    pub(crate) const fn new(store: Store, binding: B) -> Self {
        Self { store, binding }
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Insert (id `0`) or update a record. The id it was stored under is
    /// written back into the record and returned.
    pub fn put(&self, entity: &mut B::Entity) -> Result<u64, Error> {
        let id = self.store.run_with_cursor(B::ENTITY_ID, false, |cursor| {
            let id = cursor.id_for_put(self.binding.id(entity))?;
            cursor.put(id, &self.binding.encode(entity, id)?)?;

            Ok(id)
        })?;
        self.binding.set_id(entity, id);

        Ok(id)
    }

    /// Put every record within one cursor; nothing is stored if any fails.
    pub fn put_all(&self, entities: &mut [B::Entity]) -> Result<Vec<u64>, Error> {
        let ids = self.store.run_with_cursor(B::ENTITY_ID, false, |cursor| {
            let mut ids = Vec::with_capacity(entities.len());
            for entity in entities.iter() {
                let id = cursor.id_for_put(self.binding.id(entity))?;
                cursor.put(id, &self.binding.encode(entity, id)?)?;
                ids.push(id);
            }

            Ok(ids)
        })?;

        for (entity, id) in entities.iter_mut().zip(&ids) {
            self.binding.set_id(entity, *id);
        }

        Ok(ids)
    }

    /// `Ok(None)` when no record has this id.
    pub fn get(&self, id: u64) -> Result<Option<B::Entity>, Error> {
        self.store.run_with_cursor(B::ENTITY_ID, true, |cursor| {
            cursor
                .get(id)?
                .map(|bytes| self.binding.to_object(&bytes))
                .transpose()
        })
    }

    pub fn get_all(&self) -> Result<Vec<B::Entity>, Error> {
        self.store.run_with_cursor(B::ENTITY_ID, true, |cursor| {
            let buffers = cursor.get_all()?;

            self.binding.decode_all(buffers)
        })
    }

    pub fn contains(&self, id: u64) -> Result<bool, Error> {
        self.store
            .run_with_cursor(B::ENTITY_ID, true, |cursor| Ok(cursor.get(id)?.is_some()))
    }

    pub fn count(&self) -> Result<u64, Error> {
        self.store
            .run_with_cursor(B::ENTITY_ID, true, |cursor| Ok(cursor.count()?))
    }

    pub fn remove(&self, entity: &B::Entity) -> Result<bool, Error> {
        self.remove_id(self.binding.id(entity))
    }

    /// Returns whether a record was removed.
    pub fn remove_id(&self, id: u64) -> Result<bool, Error> {
        self.store
            .run_with_cursor(B::ENTITY_ID, false, |cursor| Ok(cursor.remove(id)?))
    }

    pub fn remove_all(&self) -> Result<u64, Error> {
        self.store
            .run_with_cursor(B::ENTITY_ID, false, |cursor| Ok(cursor.remove_all()?))
    }

    /// Compile `conditions` (ANDed) into a query over this entity.
    pub fn query(&self, conditions: impl IntoIterator<Item = Condition>) -> Result<Query<B>, Error> {
        let conditions: Vec<Condition> = conditions.into_iter().collect();
        let handle = self
            .store
            .native()
            .query_create(B::ENTITY_ID, &conditions)?;

        tracing::debug!(
            entity = B::ENTITY_NAME,
            query = handle.get(),
            conditions = conditions.len(),
            "query created"
        );

        Ok(Query::new(self.store.clone(), self.binding, handle))
    }
}

impl<B: Binding> Clone for EntityBox<B> {
    fn clone(&self) -> Self {
        Self::new(self.store.clone(), self.binding)
    }
}
