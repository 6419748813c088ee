use crate::{MAX_ENTITY_NAME_LEN, MAX_PROPERTY_NAME_LEN, prelude::*};
use std::collections::BTreeSet;

pub fn validate_entity_naming(schema: &SchemaModel, errs: &mut ErrorTree) {
    let mut seen = BTreeSet::new();

    for entity in &schema.entities {
        let name = entity.name.as_str();

        if name.is_empty() {
            err!(errs, "entity {} has an empty name", entity.id_uid());
        } else if name.len() > MAX_ENTITY_NAME_LEN {
            err!(
                errs,
                "entity name '{name}' exceeds {MAX_ENTITY_NAME_LEN} characters"
            );
        }

        if !seen.insert(name) {
            err!(errs, "duplicate entity name '{name}'");
        }
    }
}

pub fn validate_property_naming(entity: &EntityDescriptor, errs: &mut ErrorTree) {
    let mut names = BTreeSet::new();
    let mut store_names = BTreeSet::new();

    for prop in &entity.properties {
        if prop.name.is_empty() || prop.store_name.is_empty() {
            err!(errs, "property {} has an empty name", prop.id_uid());
            continue;
        }

        if prop.name.len() > MAX_PROPERTY_NAME_LEN {
            err!(
                errs,
                "property name '{}' exceeds {MAX_PROPERTY_NAME_LEN} characters",
                prop.name
            );
        }

        if !names.insert(prop.name.as_str()) {
            err!(errs, "duplicate property name '{}'", prop.name);
        }

        if !store_names.insert(prop.store_name.as_str()) {
            err!(errs, "duplicate store name '{}'", prop.store_name);
        }
    }
}
