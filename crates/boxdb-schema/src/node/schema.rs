use crate::{SchemaError, prelude::*, validate::validate_schema};

///
/// SchemaModel
///
/// Every entity of one model namespace plus the model-level watermark.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SchemaModel {
    pub entities: Vec<EntityDescriptor>,
    pub last_entity_id: IdUid,
}

impl SchemaModel {
    #[must_use]
    pub const fn new(last_entity_id: IdUid) -> Self {
        Self {
            entities: Vec::new(),
            last_entity_id,
        }
    }

    #[must_use]
    pub fn entity(mut self, entity: EntityDescriptor) -> Self {
        self.entities.push(entity);
        self
    }

    #[must_use]
    pub fn get_entity(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Check every model invariant, reporting all violations together.
    pub fn validate(&self) -> Result<(), SchemaError> {
        validate_schema(self).map_err(SchemaError::Validation)
    }
}
