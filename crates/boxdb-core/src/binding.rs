use crate::{
    Error,
    buffer::BufferBuilder,
    model::{ModelBuilder, ModelError},
};
use boxdb_primitives::TypeId;

///
/// Binding
///
/// Per-record-type adapter between a Rust struct and its stored form.
/// Implementations are generated from the schema model; boxes and queries
/// only ever talk to records through this trait.
///

pub trait Binding: Copy + Default + Send + Sync + 'static {
    type Entity: 'static;

    const ENTITY_ID: TypeId;
    const ENTITY_UID: u64;
    const ENTITY_NAME: &'static str;

    /// Register the entity and its properties, in slot order.
    fn add_to_model(&self, model: &mut ModelBuilder) -> Result<(), ModelError>;

    fn id(&self, entity: &Self::Entity) -> u64;

    fn set_id(&self, entity: &mut Self::Entity, id: u64);

    /// Serialize `entity` into `fbb`, writing `id` into the identifier slot
    /// instead of the record's own value.
    fn flatten(
        &self,
        entity: &Self::Entity,
        fbb: &mut BufferBuilder,
        id: u64,
    ) -> Result<(), Error>;

    fn to_object(&self, bytes: &[u8]) -> Result<Self::Entity, Error>;

    fn make_vec(&self, capacity: usize) -> Vec<Self::Entity> {
        Vec::with_capacity(capacity)
    }

    fn append_to_vec(&self, mut vec: Vec<Self::Entity>, entity: Self::Entity) -> Vec<Self::Entity> {
        vec.push(entity);
        vec
    }

    fn encode(&self, entity: &Self::Entity, id: u64) -> Result<Vec<u8>, Error> {
        let mut fbb = BufferBuilder::new();
        self.flatten(entity, &mut fbb, id)?;

        Ok(fbb.finish()?)
    }

    fn decode_all<I>(&self, buffers: I) -> Result<Vec<Self::Entity>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let buffers = buffers.into_iter();
        let mut out = self.make_vec(buffers.size_hint().0);
        for bytes in buffers {
            out = self.append_to_vec(out, self.to_object(bytes.as_ref())?);
        }

        Ok(out)
    }
}

///
/// Property
///
/// Typed handle naming one property of one entity, used to build query
/// conditions and to address query parameters.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Property {
    entity_id: TypeId,
    property_id: TypeId,
}

impl Property {
    #[must_use]
    pub const fn new(entity_id: u32, property_id: u32) -> Self {
        Self {
            entity_id: TypeId::new(entity_id),
            property_id: TypeId::new(property_id),
        }
    }

    #[must_use]
    pub const fn entity_id(self) -> TypeId {
        self.entity_id
    }

    #[must_use]
    pub const fn property_id(self) -> TypeId {
        self.property_id
    }
}
