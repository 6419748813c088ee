use super::*;

fn task_model() -> ModelBuilder {
    let mut model = ModelBuilder::new();
    model
        .entity("Task", 1, 1000)
        .and_then(|m| m.property("id", PropertyType::Long, 1, 1001))
        .and_then(|m| m.property_flags(PropertyFlags::ID | PropertyFlags::UNSIGNED))
        .and_then(|m| m.property("text", PropertyType::String, 2, 1002))
        .and_then(|m| m.property("priority", PropertyType::Int, 3, 1003))
        .and_then(|m| m.entity_last_property_id(3, 1003))
        .expect("task entity");
    model.last_entity_id(1, 1000);

    model
}

#[test]
fn builds_model_with_slots_in_registration_order() {
    let model = task_model().build().expect("valid model");
    let task = model.entity(TypeId::new(1)).expect("task");

    assert_eq!(task.name, "Task");
    assert_eq!(task.id_property().map(|p| p.name.as_str()), Some("id"));
    assert_eq!(task.slot_offset(TypeId::new(1)), Some(4));
    assert_eq!(task.slot_offset(TypeId::new(3)), Some(8));
    assert_eq!(task.slot_offset(TypeId::new(9)), None);
    assert!(model.entity_by_name("Task").is_some());
    assert_eq!(model.last_entity_id(), Some(IdUid::new(1, 1000)));
}

#[test]
fn calls_out_of_order_are_rejected() {
    let mut model = ModelBuilder::new();

    let err = model
        .property("id", PropertyType::Long, 1, 1)
        .expect_err("property without entity");
    assert_eq!(err, ModelError::NoEntity { operation: "property" });

    model.entity("Task", 1, 1).expect("entity");
    let err = model
        .property_flags(PropertyFlags::ID)
        .expect_err("flags without property");
    assert_eq!(
        err,
        ModelError::NoProperty {
            operation: "property_flags"
        }
    );
}

#[test]
fn duplicate_and_zero_ids_are_rejected() {
    let mut model = task_model();

    let err = model.entity("Other", 1, 2000).expect_err("duplicate entity");
    assert_eq!(err, ModelError::DuplicateEntity { id: TypeId::new(1) });

    let err = model
        .property("again", PropertyType::Int, 2, 5000)
        .expect_err("duplicate property");
    assert!(
        matches!(err, ModelError::DuplicateProperty { .. }),
        "unexpected error: {err:?}"
    );

    let err = model.entity("Zero", 0, 1).expect_err("zero id");
    assert!(
        matches!(err, ModelError::InvalidId { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn build_checks_identifier_and_watermarks() {
    let mut model = ModelBuilder::new();
    model
        .entity("Note", 1, 10)
        .and_then(|m| m.property("body", PropertyType::String, 1, 11))
        .and_then(|m| m.entity_last_property_id(1, 11))
        .expect("note");
    let err = model.build().expect_err("missing id property");
    assert!(err.to_string().contains("no identifier property"), "{err}");

    let mut model = task_model();
    model.last_entity_id(2, 2000);
    model.entity("Late", 2, 2000).expect("entity");
    let err = model.build().expect_err("missing last property id");
    assert!(
        matches!(err, ModelError::MissingLastPropertyId { .. }),
        "unexpected error: {err:?}"
    );

    let mut model = task_model();
    model.entity_last_property_id(2, 1002).expect("lower watermark");
    let err = model.build().expect_err("property above watermark");
    assert!(
        matches!(err, ModelError::PropertyIdAboveLast { .. }),
        "unexpected error: {err:?}"
    );

    let err = ModelBuilder::new().build().expect_err("empty model");
    assert_eq!(err, ModelError::NoEntities);
}
