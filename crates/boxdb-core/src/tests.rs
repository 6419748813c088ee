use crate::{
    Binding, Error, MemoryStore, Model, ModelBuilder, PropertyType, Store,
    test_support::{Note, NoteBinding, counting_store, memory_store},
};

#[test]
fn get_returns_none_for_missing_and_some_for_existing() {
    let notes = memory_store().box_for::<NoteBinding>().expect("note box");

    let mut note = Note::new("hello", 5);
    let id = notes.put(&mut note).expect("put");
    assert_eq!(note.id, id, "assigned id is written back");

    assert_eq!(notes.get(id).expect("get"), Some(note.clone()));
    assert_eq!(notes.get(id + 100).expect("get missing"), None);
    assert!(notes.contains(id).expect("contains"));
    assert!(!notes.contains(id + 100).expect("contains missing"));
}

#[test]
fn put_with_existing_id_updates_in_place() {
    let notes = memory_store().box_for::<NoteBinding>().expect("note box");

    let mut note = Note::new("draft", 1);
    let id = notes.put(&mut note).expect("insert");
    note.title = "final".to_string();
    note.data = vec![1, 2, 3];
    assert_eq!(notes.put(&mut note).expect("update"), id);

    assert_eq!(notes.count().expect("count"), 1);
    assert_eq!(notes.get(id).expect("get"), Some(note));
}

#[test]
fn get_all_and_removal() {
    let notes = memory_store().box_for::<NoteBinding>().expect("note box");
    let mut batch = vec![Note::new("a", 1), Note::new("b", 2), Note::new("c", 3)];
    let ids = notes.put_all(&mut batch).expect("put all");

    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(batch.iter().map(|n| n.id).collect::<Vec<_>>(), ids);
    assert_eq!(notes.get_all().expect("get all"), batch);

    assert!(notes.remove(&batch[1]).expect("remove"));
    assert!(!notes.remove_id(batch[1].id).expect("remove again"));
    assert_eq!(notes.remove_all().expect("remove all"), 2);
    assert!(notes.get_all().expect("get all").is_empty());
}

#[test]
fn each_box_call_uses_exactly_one_cursor() {
    let (store, native) = counting_store();
    let notes = store.box_for::<NoteBinding>().expect("note box");

    let before = native.calls();
    notes.put(&mut Note::new("x", 1)).expect("put");
    notes.get(1).expect("get");
    notes.count().expect("count");
    notes.put_all(&mut [Note::new("y", 2), Note::new("z", 3)]).expect("put all");

    assert_eq!(native.calls() - before, 4);
}

#[test]
fn box_debug_names_its_entity() {
    let notes = memory_store().box_for::<NoteBinding>().expect("note box");
    let shown = format!("{notes:?}");

    assert!(shown.starts_with("EntityBox"), "{shown}");
    assert!(shown.contains(&format!("{:?}", NoteBinding::ENTITY_NAME)), "{shown}");
}

#[test]
fn box_for_unknown_entity_fails() {
    let mut model = ModelBuilder::new();
    model
        .entity("Other", 7, 700)
        .and_then(|m| m.property("id", PropertyType::Long, 1, 701))
        .and_then(|m| m.property_flags(crate::PropertyFlags::ID))
        .and_then(|m| m.entity_last_property_id(1, 701))
        .expect("other entity");
    let model: Model = model.build().expect("model");

    let store = Store::builder()
        .model(model)
        .build(MemoryStore::new())
        .expect("store");

    let err = store.box_for::<NoteBinding>().expect_err("note is not modelled");
    assert!(
        matches!(err, Error::UnknownEntity(id) if id == NoteBinding::ENTITY_ID),
        "unexpected error: {err:?}"
    );
}

#[test]
fn store_builder_requires_a_model() {
    let err = Store::builder()
        .debug()
        .build(MemoryStore::new())
        .expect_err("no model");

    assert!(matches!(err, Error::Model(_)), "unexpected error: {err:?}");
}

#[test]
fn binding_substitutes_the_given_id() {
    let note = Note {
        id: 3,
        ..Note::new("t", 1)
    };

    let bytes = NoteBinding.encode(&note, 77).expect("encode");
    let decoded = NoteBinding.to_object(&bytes).expect("decode");

    assert_eq!(decoded.id, 77);
    assert_eq!(decoded.title, note.title);
}
