use crate::{GenerationError, GeneratorConfig, HEADER, generate};
use boxdb_schema::prelude::*;
use std::fs;

fn task_entity() -> EntityDescriptor {
    EntityDescriptor::new(IdUid::new(1, 1000), "Task", IdUid::new(4, 1004))
        .property(
            PropertyDescriptor::new(IdUid::new(1, 1001), "id", SemanticType::U64)
                .with_flags(PropertyFlags::ID),
        )
        .property(PropertyDescriptor::new(
            IdUid::new(2, 1002),
            "text",
            SemanticType::String,
        ))
        .property(PropertyDescriptor::new(
            IdUid::new(3, 1003),
            "letter",
            SemanticType::Char,
        ))
        .property(PropertyDescriptor::new(
            IdUid::new(4, 1004),
            "count",
            SemanticType::Usize,
        ))
}

fn schema_with(entity: EntityDescriptor) -> SchemaModel {
    SchemaModel::new(IdUid::new(2, 2000)).entity(entity)
}

fn task_schema() -> SchemaModel {
    schema_with(task_entity())
}

fn squash(code: &str) -> String {
    code.split_whitespace().collect()
}

fn task_code() -> String {
    let source = generate(&task_schema(), &GeneratorConfig::default()).expect("generate");
    let unit = source.unit("task.obx.rs").expect("task unit");

    squash(&unit.code)
}

#[test]
fn one_unit_per_entity_plus_model_each_with_header() {
    let source = generate(&task_schema(), &GeneratorConfig::default()).expect("generate");

    let names: Vec<&str> = source.units.iter().map(|u| u.file_name.as_str()).collect();
    assert_eq!(names, vec!["task.obx.rs", "boxdb_model.obx.rs"]);

    for unit in &source.units {
        assert!(unit.contents().starts_with(HEADER), "{}", unit.file_name);
    }
    assert!(source.render().starts_with(HEADER));
}

#[test]
fn rendered_source_parses_as_rust() {
    let source = generate(&task_schema(), &GeneratorConfig::default()).expect("generate");

    syn::parse_file(&source.render()).expect("generated code must parse");
}

#[test]
fn generation_is_deterministic() {
    let config = GeneratorConfig::default();
    let a = generate(&task_schema(), &config).expect("first");
    let b = generate(&task_schema(), &config).expect("second");

    assert_eq!(a, b);
}

#[test]
fn binding_impl_and_property_handles() {
    let code = task_code();

    assert!(code.contains("pubstructTaskBinding;"), "{code}");
    assert!(code.contains("impl::boxdb::BindingforTaskBinding"), "{code}");
    assert!(
        code.contains("pubconstTEXT:::boxdb::Property=::boxdb::Property::new(1,2);"),
        "{code}"
    );
    assert!(code.contains("pubtypeTaskBox=::boxdb::EntityBox<TaskBinding>;"));
    assert!(code.contains("pubfnbox_for_task(store:&::boxdb::Store)"));
}

#[test]
fn model_registration_follows_declaration_order() {
    let code = task_code();

    let expected = squash(
        r#"model.entity("Task", 1, 1000)?;
        model.property("id", ::boxdb::PropertyType::Long, 1, 1001)?;
        model.property_flags(::boxdb::PropertyFlags::ID | ::boxdb::PropertyFlags::UNSIGNED)?;
        model.property("text", ::boxdb::PropertyType::String, 2, 1002)?;
        model.property("letter", ::boxdb::PropertyType::Char, 3, 1003)?;
        model.property("count", ::boxdb::PropertyType::Int, 4, 1004)?;
        model.property_flags(::boxdb::PropertyFlags::UNSIGNED)?;
        model.entity_last_property_id(4, 1004)?;"#,
    );
    assert!(code.contains(&expected), "{code}");
}

#[test]
fn flatten_creates_children_before_the_table() {
    let code = task_code();

    let child = code
        .find("letoffset_text=fbb.create_string(&entity.text)?;")
        .expect("child region");
    let table = code.find("fbb.start_table(4)?;").expect("table start");
    assert!(child < table);

    assert!(code.contains("fbb.push_slot::<u64>(0,id,0)?;"), "{code}");
    assert!(code.contains("fbb.push_offset_slot(1,offset_text)?;"));
    assert!(code.contains("fbb.push_slot::<u32>(2,u32::from(entity.letter),0)?;"));
    assert!(code.contains(
        "u32::try_from(entity.count).map_err(|_|::boxdb::BufferError::SlotOverflow{slot:3})?"
    ));
}

#[test]
fn to_object_reads_every_slot_offset() {
    let code = task_code();

    assert!(code.contains("id:table.get_slot::<u64>(4,0)?,"), "{code}");
    assert!(code.contains("text:table.get_str_slot(6)?.to_owned(),"));
    assert!(code.contains("letter:table.get_char_slot(8,'\\0')?,"));
    assert!(code.contains("count:table.get_slot::<u32>(10,0)?asusize,"));
}

#[test]
fn id_only_entity_ignores_the_record() {
    let entity = EntityDescriptor::new(IdUid::new(1, 1000), "Marker", IdUid::new(1, 1001))
        .property(
            PropertyDescriptor::new(IdUid::new(1, 1001), "id", SemanticType::U64)
                .with_flags(PropertyFlags::ID),
        );

    let source = generate(&schema_with(entity), &GeneratorConfig::default()).expect("generate");
    let code = squash(&source.unit("marker.obx.rs").expect("unit").code);

    assert!(code.contains("_entity:&Marker"), "{code}");
}

#[test]
fn model_unit_registers_every_binding() {
    let second = EntityDescriptor::new(IdUid::new(2, 2000), "Note", IdUid::new(1, 2001))
        .property(
            PropertyDescriptor::new(IdUid::new(1, 2001), "id", SemanticType::U64)
                .with_flags(PropertyFlags::ID),
        );
    let schema = task_schema().entity(second);

    let source = generate(&schema, &GeneratorConfig::default()).expect("generate");
    let code = squash(&source.unit("boxdb_model.obx.rs").expect("model unit").code);

    assert!(code.contains(
        "::boxdb::Binding::add_to_model(&TaskBinding,&mutmodel)?;\
         ::boxdb::Binding::add_to_model(&NoteBinding,&mutmodel)?;\
         model.last_entity_id(2,2000);"
    ), "{code}");
}

#[test]
fn runtime_path_and_model_fn_come_from_config() {
    let config = GeneratorConfig::from_toml_str(
        r#"
        runtime_path = "crate::db"
        model_fn = "objectbox_model"
        "#,
    )
    .expect("config");
    assert_eq!(config.file_suffix, ".obx.rs");

    let source = generate(&task_schema(), &config).expect("generate");
    let task = squash(&source.unit("task.obx.rs").expect("task").code);
    assert!(task.contains("implcrate::db::BindingforTaskBinding"), "{task}");

    let model = squash(&source.unit("objectbox_model.obx.rs").expect("model").code);
    assert!(model.contains("pubfnobjectbox_model()"), "{model}");
}

#[test]
fn unknown_config_keys_are_rejected() {
    GeneratorConfig::from_toml_str("runtime = \"::x\"").expect_err("unknown key");
}

#[test]
fn string_vectors_fail_generation() {
    let mut entity = task_entity().property(PropertyDescriptor::new(
        IdUid::new(5, 1005),
        "tags",
        SemanticType::StringVec,
    ));
    entity.last_property_id = IdUid::new(5, 1005);

    let err = generate(&schema_with(entity), &GeneratorConfig::default())
        .expect_err("no rule for string vectors");
    assert!(
        matches!(&err, GenerationError::UnsupportedType { property, .. } if property == "tags"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn mismatched_buffer_kind_fails_generation() {
    let mut entity = task_entity();
    entity.properties[1] = entity.properties[1].clone().with_buffer_kind(BufferKind::Fixed);

    let err = generate(&schema_with(entity), &GeneratorConfig::default())
        .expect_err("string cannot be fixed");
    assert!(
        matches!(err, GenerationError::BufferKindMismatch { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn mismatched_store_type_fails_generation() {
    let mut entity = task_entity();
    entity.properties[1] = entity.properties[1]
        .clone()
        .with_store_type(PropertyType::Long);

    let err = generate(&schema_with(entity), &GeneratorConfig::default())
        .expect_err("string cannot be stored as long");
    assert!(
        matches!(err, GenerationError::StoreTypeMismatch { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn keyword_property_names_are_rejected() {
    let mut entity = task_entity();
    entity.properties[1].name = "type".to_string();

    let err = generate(&schema_with(entity), &GeneratorConfig::default())
        .expect_err("keyword field");
    assert!(
        matches!(&err, GenerationError::InvalidIdent(name) if name == "type"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn raw_identifier_fields_derive_plain_names() {
    let entity = EntityDescriptor::new(IdUid::new(1, 1000), "Task", IdUid::new(2, 1002))
        .property(
            PropertyDescriptor::new(IdUid::new(1, 1001), "id", SemanticType::U64)
                .with_flags(PropertyFlags::ID),
        )
        .property(
            PropertyDescriptor::new(IdUid::new(2, 1002), "r#type", SemanticType::String)
                .with_store_name("type"),
        );

    let source = generate(&schema_with(entity), &GeneratorConfig::default()).expect("generate");
    syn::parse_file(&source.render()).expect("generated code must parse");

    let code = squash(&source.unit("task.obx.rs").expect("task unit").code);
    assert!(code.contains("letoffset_type=fbb.create_string(&entity.r#type)?;"), "{code}");
    assert!(code.contains("pubconstTYPE:::boxdb::Property"), "{code}");
    assert!(code.contains("model.property(\"type\",::boxdb::PropertyType::String,2,1002)?;"));
    assert!(code.contains("r#type:table.get_str_slot(6)?.to_owned(),"), "{code}");
}

#[test]
fn invalid_runtime_path_is_rejected() {
    let config = GeneratorConfig {
        runtime_path: "not a path".to_string(),
        ..GeneratorConfig::default()
    };

    let err = generate(&task_schema(), &config).expect_err("bad path");
    assert!(
        matches!(err, GenerationError::InvalidRuntimePath(_)),
        "unexpected error: {err:?}"
    );
}

#[test]
fn invalid_schema_fails_before_generation() {
    let mut entity = task_entity();
    entity.properties[0].flags = PropertyFlags::NONE;
    entity.id_property = None;

    let err = generate(&schema_with(entity), &GeneratorConfig::default())
        .expect_err("no identifier");
    assert!(
        matches!(err, GenerationError::Schema(_)),
        "unexpected error: {err:?}"
    );
}

#[test]
fn write_to_dir_replaces_only_generated_units() {
    let dir = tempfile::tempdir().expect("temp dir");
    let stale = dir.path().join("old_entity.obx.rs");
    let foreign = dir.path().join("handwritten.obx.rs");
    let other = dir.path().join("notes.txt");

    fs::write(&stale, format!("{HEADER}\n\npub struct Old;\n")).expect("stale");
    fs::write(&foreign, "pub struct Mine;\n").expect("foreign");
    fs::write(&other, format!("{HEADER}\n")).expect("other");

    let source = generate(&task_schema(), &GeneratorConfig::default()).expect("generate");
    let written = source.write_to_dir(dir.path()).expect("write");

    assert_eq!(written.len(), 2);
    assert!(!stale.exists(), "stale generated unit must be removed");
    assert!(foreign.exists(), "files without the header are kept");
    assert!(other.exists(), "files without the suffix are kept");

    let task = fs::read_to_string(dir.path().join("task.obx.rs")).expect("task unit");
    assert!(task.starts_with(HEADER));

    // regenerating over our own output is a clean replace
    source.write_to_dir(dir.path()).expect("rewrite");
    let count = fs::read_dir(dir.path()).expect("read dir").count();
    assert_eq!(count, 4);
}
