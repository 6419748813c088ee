use crate::prelude::*;

pub fn validate_id_property(entity: &EntityDescriptor, errs: &mut ErrorTree) {
    let flagged: Vec<&PropertyDescriptor> =
        entity.properties.iter().filter(|p| p.is_id()).collect();

    match flagged.as_slice() {
        [] => err!(errs, "no identifier property (flag one property as ID or name it 'id')"),
        [prop] => {
            if prop.semantic_type != SemanticType::U64 {
                err!(
                    errs,
                    "identifier property '{}' must be u64, found {}",
                    prop.name,
                    prop.semantic_type
                );
            }
        }
        many => {
            let names: Vec<&str> = many.iter().map(|p| p.name.as_str()).collect();
            err!(
                errs,
                "multiple identifier properties: {}",
                names.join(", ")
            );
        }
    }
}
