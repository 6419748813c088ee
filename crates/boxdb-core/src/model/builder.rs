use crate::model::{Model, ModelEntity, ModelError, ModelProperty};
use boxdb_primitives::{IdUid, PropertyFlags, PropertyType, TypeId};

///
/// ModelBuilder
///
/// Incremental model construction. Calls apply to the most recently added
/// entity and property, the same order generated `add_to_model` bodies use.
///

#[derive(Debug, Default)]
pub struct ModelBuilder {
    entities: Vec<ModelEntity>,
    last_entity_id: Option<IdUid>,
}

impl ModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(&mut self, name: &str, id: u32, uid: u64) -> Result<&mut Self, ModelError> {
        if id == 0 || uid == 0 {
            return Err(ModelError::InvalidId {
                what: format!("entity '{name}'"),
            });
        }

        let id = TypeId::new(id);
        if self.entities.iter().any(|e| e.id == id) {
            return Err(ModelError::DuplicateEntity { id });
        }

        self.entities.push(ModelEntity {
            id,
            uid,
            name: name.to_string(),
            properties: Vec::new(),
            last_property_id: None,
        });

        Ok(self)
    }

    pub fn property(
        &mut self,
        name: &str,
        property_type: PropertyType,
        id: u32,
        uid: u64,
    ) -> Result<&mut Self, ModelError> {
        let entity = self.current_entity("property")?;

        if id == 0 || uid == 0 {
            return Err(ModelError::InvalidId {
                what: format!("property '{}.{name}'", entity.name),
            });
        }

        let id = TypeId::new(id);
        if entity.property(id).is_some() {
            return Err(ModelError::DuplicateProperty {
                entity: entity.name.clone(),
                id,
            });
        }

        entity.properties.push(ModelProperty {
            id,
            uid,
            name: name.to_string(),
            property_type,
            flags: PropertyFlags::NONE,
        });

        Ok(self)
    }

    /// Add flags to the last property.
    pub fn property_flags(&mut self, flags: PropertyFlags) -> Result<&mut Self, ModelError> {
        let entity = self.current_entity("property_flags")?;
        let property = entity
            .properties
            .last_mut()
            .ok_or(ModelError::NoProperty {
                operation: "property_flags",
            })?;

        property.flags |= flags;

        Ok(self)
    }

    pub fn entity_last_property_id(&mut self, id: u32, uid: u64) -> Result<&mut Self, ModelError> {
        let entity = self.current_entity("entity_last_property_id")?;
        entity.last_property_id = Some(IdUid::new(id, uid));

        Ok(self)
    }

    pub fn last_entity_id(&mut self, id: u32, uid: u64) -> &mut Self {
        self.last_entity_id = Some(IdUid::new(id, uid));

        self
    }

    fn current_entity(&mut self, operation: &'static str) -> Result<&mut ModelEntity, ModelError> {
        self.entities
            .last_mut()
            .ok_or(ModelError::NoEntity { operation })
    }

    /// Check the collected entities and produce the model.
    pub fn build(self) -> Result<Model, ModelError> {
        if self.entities.is_empty() {
            return Err(ModelError::NoEntities);
        }

        for entity in &self.entities {
            check_entity(entity)?;

            if let Some(last) = self.last_entity_id
                && entity.id > last.id
            {
                return Err(ModelError::EntityIdAboveLast {
                    id: entity.id,
                    last: last.id,
                });
            }
        }

        Ok(Model {
            entities: self.entities,
            last_entity_id: self.last_entity_id,
        })
    }
}

fn check_entity(entity: &ModelEntity) -> Result<(), ModelError> {
    let last = entity
        .last_property_id
        .ok_or_else(|| ModelError::MissingLastPropertyId {
            entity: entity.name.clone(),
        })?;

    if let Some(prop) = entity.properties.iter().find(|p| p.id > last.id) {
        return Err(ModelError::PropertyIdAboveLast {
            entity: entity.name.clone(),
            id: prop.id,
            last: last.id,
        });
    }

    let mut ids = entity.properties.iter().filter(|p| p.is_id());
    let reason = match (ids.next(), ids.next()) {
        (None, _) => Some("no identifier property"),
        (Some(_), Some(_)) => Some("multiple identifier properties"),
        (Some(id), None) if id.property_type != PropertyType::Long => {
            Some("identifier property must be stored as Long")
        }
        _ => None,
    };

    match reason {
        Some(reason) => Err(ModelError::IdProperty {
            entity: entity.name.clone(),
            reason,
        }),
        None => Ok(()),
    }
}
