//! Schema validation orchestration.

pub mod ids;
pub mod identity;
pub mod naming;

use crate::{error::ErrorTree, node::SchemaModel};

/// Run full schema validation in a staged, deterministic order.
pub(crate) fn validate_schema(schema: &SchemaModel) -> Result<(), ErrorTree> {
    let mut errors = ErrorTree::new();

    // Phase 1: per-entity invariants.
    for entity in &schema.entities {
        let mut errs = ErrorTree::new();
        ids::validate_property_ids(entity, &mut errs);
        identity::validate_id_property(entity, &mut errs);
        naming::validate_property_naming(entity, &mut errs);

        errors.merge_for(entity.name.clone(), errs);
    }

    // Phase 2: model-wide invariants.
    ids::validate_entity_ids(schema, &mut errors);
    naming::validate_entity_naming(schema, &mut errors);

    errors.result()
}
