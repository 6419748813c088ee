//! JSON form of the schema model.
//!
//! ```json
//! {
//!   "lastEntityId": "1:1000",
//!   "entities": [{
//!     "id": "1:1000",
//!     "name": "Task",
//!     "lastPropertyId": "2:1002",
//!     "properties": [
//!       { "id": "1:1001", "name": "id", "type": "u64" },
//!       { "id": "2:1002", "name": "text", "type": "String" }
//!     ]
//!   }]
//! }
//! ```
//!
//! Unknown keys are ignored so model files written by newer tools still load.

use crate::{SchemaError, prelude::*};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelDef {
    last_entity_id: IdUid,
    #[serde(default)]
    entities: Vec<EntityDef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityDef {
    id: IdUid,
    name: String,
    last_property_id: IdUid,
    #[serde(default)]
    properties: Vec<PropertyDef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyDef {
    id: IdUid,
    name: String,
    #[serde(rename = "type")]
    semantic_type: SemanticType,
    #[serde(default)]
    store_name: Option<String>,
    #[serde(default)]
    store_type: Option<PropertyType>,
    #[serde(default)]
    buffer_kind: Option<BufferKind>,
    #[serde(default)]
    flags: Option<PropertyFlags>,
}

impl From<PropertyDef> for PropertyDescriptor {
    fn from(def: PropertyDef) -> Self {
        let mut prop = Self::new(def.id, def.name, def.semantic_type);

        if let Some(store_name) = def.store_name {
            prop = prop.with_store_name(store_name);
        }
        if let Some(store_type) = def.store_type {
            prop = prop.with_store_type(store_type);
        }
        if let Some(buffer_kind) = def.buffer_kind {
            prop = prop.with_buffer_kind(buffer_kind);
        }
        if let Some(flags) = def.flags {
            prop = prop.with_flags(flags);
        }

        prop
    }
}

impl From<EntityDef> for EntityDescriptor {
    fn from(def: EntityDef) -> Self {
        let mut entity = Self::new(def.id, def.name, def.last_property_id);
        for prop in def.properties {
            entity.push_property(prop.into());
        }
        entity.resolve_id_property();

        entity
    }
}

impl SchemaModel {
    /// Parse a model from JSON. The result is not validated yet.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let def: ModelDef = serde_json::from_str(json)?;

        Ok(Self {
            entities: def.entities.into_iter().map(Into::into).collect(),
            last_entity_id: def.last_entity_id,
        })
    }

    /// Read and parse a model file. The result is not validated yet.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json_str(&json)
    }
}
