use crate::{
    Error,
    binding::Binding,
    engine::{NativeCursor, NativeError, NativeStore},
    entity_box::EntityBox,
    model::{Model, ModelError},
};
use boxdb_primitives::TypeId;
use std::sync::Arc;

///
/// StoreBuilder
///

#[derive(Debug, Default)]
pub struct StoreBuilder {
    model: Option<Model>,
    debug: bool,
}

impl StoreBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    /// Emit a `debug` event for every cursor the store hands out.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Open `native` with the model and wrap it.
    pub fn build(self, native: impl NativeStore + 'static) -> Result<Store, Error> {
        self.build_shared(Arc::new(native))
    }

    pub fn build_shared(self, native: Arc<dyn NativeStore>) -> Result<Store, Error> {
        let model = self.model.ok_or(ModelError::NoEntities)?;
        native.open(&model)?;

        tracing::debug!(entities = model.entities().len(), "store opened");

        Ok(Store {
            inner: Arc::new(StoreInner {
                native,
                model,
                debug: self.debug,
            }),
        })
    }
}

struct StoreInner {
    native: Arc<dyn NativeStore>,
    model: Model,
    debug: bool,
}

///
/// Store
///
/// Cheap-to-clone handle on an opened native store and its model.
///

#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    #[must_use]
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    #[must_use]
    pub fn model(&self) -> &Model {
        &self.inner.model
    }

    pub(crate) fn native(&self) -> &dyn NativeStore {
        self.inner.native.as_ref()
    }

    /// Typed box for `B`'s entity. Fails if the entity is not in the model.
    pub fn box_for<B: Binding>(&self) -> Result<EntityBox<B>, Error> {
        if self.inner.model.entity(B::ENTITY_ID).is_none() {
            return Err(Error::UnknownEntity(B::ENTITY_ID));
        }

        Ok(EntityBox::new(self.clone(), B::default()))
    }

    /// Run `f` against one cursor over `entity_id`. Writes through a
    /// non-read-only cursor are committed only if `f` succeeds.
    pub fn run_with_cursor<R>(
        &self,
        entity_id: TypeId,
        read_only: bool,
        f: impl FnOnce(&mut dyn NativeCursor) -> Result<R, Error>,
    ) -> Result<R, Error> {
        if self.inner.debug {
            tracing::debug!(entity = %entity_id, read_only, "acquiring cursor");
        }

        let mut f = Some(f);
        let mut out = None;
        self.inner
            .native
            .with_cursor(entity_id, !read_only, &mut |cursor| {
                let f = f
                    .take()
                    .ok_or_else(|| NativeError::illegal_state("cursor callback ran twice"))?;
                out = Some(f(cursor)?);

                Ok(())
            })?;

        out.ok_or_else(|| NativeError::illegal_state("cursor callback did not run").into())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("entities", &self.inner.model.entities().len())
            .field("debug", &self.inner.debug)
            .finish_non_exhaustive()
    }
}
