//! Runtime model handed to the native store at open time.
//!
//! Generated bindings register themselves through [`ModelBuilder`]; the
//! builder checks ids and identity rules as it goes, and `build` checks the
//! watermarks once everything is in.

mod builder;

#[cfg(test)]
mod tests;

pub use builder::ModelBuilder;

use crate::buffer::slot_offset;
use boxdb_primitives::{IdUid, PropertyFlags, PropertyType, TypeId};
use thiserror::Error as ThisError;

///
/// ModelProperty
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelProperty {
    pub id: TypeId,
    pub uid: u64,
    pub name: String,
    pub property_type: PropertyType,
    pub flags: PropertyFlags,
}

impl ModelProperty {
    #[must_use]
    pub const fn is_id(&self) -> bool {
        self.flags.contains(PropertyFlags::ID)
    }

    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        self.flags.contains(PropertyFlags::UNSIGNED)
    }
}

///
/// ModelEntity
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelEntity {
    pub id: TypeId,
    pub uid: u64,
    pub name: String,
    pub properties: Vec<ModelProperty>,
    pub last_property_id: Option<IdUid>,
}

impl ModelEntity {
    #[must_use]
    pub fn property(&self, id: TypeId) -> Option<&ModelProperty> {
        self.properties.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn property_by_name(&self, name: &str) -> Option<&ModelProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn id_property(&self) -> Option<&ModelProperty> {
        self.properties.iter().find(|p| p.is_id())
    }

    /// Vtable offset of a property; slots follow registration order.
    #[must_use]
    pub fn slot_offset(&self, id: TypeId) -> Option<u16> {
        let index = self.properties.iter().position(|p| p.id == id)?;

        u16::try_from(index).ok().map(slot_offset)
    }
}

///
/// Model
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Model {
    entities: Vec<ModelEntity>,
    last_entity_id: Option<IdUid>,
}

impl Model {
    #[must_use]
    pub fn entity(&self, id: TypeId) -> Option<&ModelEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn entity_by_name(&self, name: &str) -> Option<&ModelEntity> {
        self.entities.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn entities(&self) -> &[ModelEntity] {
        &self.entities
    }

    #[must_use]
    pub const fn last_entity_id(&self) -> Option<IdUid> {
        self.last_entity_id
    }
}

///
/// ModelError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ModelError {
    #[error("entity id {id} is registered twice")]
    DuplicateEntity { id: TypeId },

    #[error("entity '{entity}': property id {id} is registered twice")]
    DuplicateProperty { entity: String, id: TypeId },

    #[error("entity id {id} is above the last entity id {last}")]
    EntityIdAboveLast { id: TypeId, last: TypeId },

    #[error("entity '{entity}': {reason}")]
    IdProperty { entity: String, reason: &'static str },

    #[error("{what} must have non-zero id and uid")]
    InvalidId { what: String },

    #[error("entity '{entity}' has no last property id")]
    MissingLastPropertyId { entity: String },

    #[error("model has no entities")]
    NoEntities,

    #[error("{operation} called before any entity was added")]
    NoEntity { operation: &'static str },

    #[error("{operation} called before any property was added")]
    NoProperty { operation: &'static str },

    #[error("entity '{entity}': property id {id} is above the last property id {last}")]
    PropertyIdAboveLast {
        entity: String,
        id: TypeId,
        last: TypeId,
    },
}
