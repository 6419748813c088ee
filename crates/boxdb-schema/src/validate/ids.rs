use crate::{MAX_PROPERTIES, prelude::*};
use std::collections::BTreeMap;

pub fn validate_entity_ids(schema: &SchemaModel, errs: &mut ErrorTree) {
    let mut ids: BTreeMap<TypeId, &str> = BTreeMap::new();
    let mut uids: BTreeMap<u64, &str> = BTreeMap::new();
    let last = schema.last_entity_id;

    for entity in &schema.entities {
        if entity.id.is_zero() || entity.uid == 0 {
            err!(
                errs,
                "entity '{}' has an invalid id/uid {}",
                entity.name,
                entity.id_uid()
            );
        }

        if entity.id > last.id {
            err!(
                errs,
                "entity '{}' id {} is above the last entity id {}",
                entity.name,
                entity.id,
                last.id
            );
        }

        if let Some(prev) = ids.insert(entity.id, &entity.name) {
            err!(
                errs,
                "duplicate entity id {} for '{prev}' and '{}'",
                entity.id,
                entity.name
            );
        }

        if let Some(prev) = uids.insert(entity.uid, &entity.name) {
            err!(
                errs,
                "duplicate entity uid {} for '{prev}' and '{}'",
                entity.uid,
                entity.name
            );
        }
    }
}

pub fn validate_property_ids(entity: &EntityDescriptor, errs: &mut ErrorTree) {
    let last = entity.last_property_id;
    let mut ids: BTreeMap<TypeId, &str> = BTreeMap::new();
    let mut uids: BTreeMap<u64, &str> = BTreeMap::new();

    if last.id.is_zero() {
        err!(errs, "last property id must be set");
    }

    if entity.properties.len() > MAX_PROPERTIES {
        err!(
            errs,
            "{} properties exceed the vtable limit of {MAX_PROPERTIES}",
            entity.properties.len()
        );
    }

    // the table reserves `last.id` slots; declaration order must fit inside
    if entity.properties.len() > last.id.get() as usize {
        err!(
            errs,
            "{} properties do not fit into {} slots (last property id)",
            entity.properties.len(),
            last.id
        );
    }

    for prop in &entity.properties {
        if prop.id.is_zero() || prop.uid == 0 {
            err!(
                errs,
                "property '{}' has an invalid id/uid {}",
                prop.name,
                prop.id_uid()
            );
        }

        if prop.id > last.id {
            err!(
                errs,
                "property '{}' id {} is above the last property id {}",
                prop.name,
                prop.id,
                last.id
            );
        }

        if let Some(prev) = ids.insert(prop.id, &prop.name) {
            err!(
                errs,
                "duplicate property id {} for '{prev}' and '{}'",
                prop.id,
                prop.name
            );
        }

        if let Some(prev) = uids.insert(prop.uid, &prop.name) {
            err!(
                errs,
                "duplicate property uid {} for '{prev}' and '{}'",
                prop.uid,
                prop.name
            );
        }
    }
}
