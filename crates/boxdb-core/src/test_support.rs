//! Hand-written binding and an instrumented engine for unit tests.

use crate::{
    Binding, BufferBuilder, Error, MemoryStore, Model, ModelBuilder, ModelError, NativeError,
    Property, PropertyFlags, PropertyType, Store, Table, TypeId,
    buffer::slot_offset,
    engine::{CursorFn, NativeStore, ParamValue, QueryHandle},
    query::Condition,
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

///
/// Note
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub rank: i32,
    pub score: f64,
    pub data: Vec<u8>,
}

impl Note {
    pub fn new(title: &str, rank: i32) -> Self {
        Self {
            title: title.to_string(),
            rank,
            ..Self::default()
        }
    }
}

///
/// NoteBinding
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoteBinding;

impl NoteBinding {
    pub const ID: Property = Property::new(1, 1);
    pub const TITLE: Property = Property::new(1, 2);
    pub const RANK: Property = Property::new(1, 3);
    pub const SCORE: Property = Property::new(1, 4);
    pub const DATA: Property = Property::new(1, 5);
}

impl Binding for NoteBinding {
    type Entity = Note;

    const ENTITY_ID: TypeId = TypeId::new(1);
    const ENTITY_UID: u64 = 100;
    const ENTITY_NAME: &'static str = "Note";

    fn add_to_model(&self, model: &mut ModelBuilder) -> Result<(), ModelError> {
        model.entity("Note", 1, 100)?;
        model.property("id", PropertyType::Long, 1, 101)?;
        model.property_flags(PropertyFlags::ID | PropertyFlags::UNSIGNED)?;
        model.property("title", PropertyType::String, 2, 102)?;
        model.property("rank", PropertyType::Int, 3, 103)?;
        model.property("score", PropertyType::Double, 4, 104)?;
        model.property("data", PropertyType::ByteVector, 5, 105)?;
        model.entity_last_property_id(5, 105)?;

        Ok(())
    }

    fn id(&self, entity: &Note) -> u64 {
        entity.id
    }

    fn set_id(&self, entity: &mut Note, id: u64) {
        entity.id = id;
    }

    fn flatten(&self, entity: &Note, fbb: &mut BufferBuilder, id: u64) -> Result<(), Error> {
        let title = fbb.create_string(&entity.title)?;
        let data = fbb.create_byte_vector(&entity.data)?;

        fbb.start_table(5)?;
        fbb.push_slot::<u64>(0, id, 0)?;
        fbb.push_offset_slot(1, title)?;
        fbb.push_slot::<i32>(2, entity.rank, 0)?;
        fbb.push_slot::<f64>(3, entity.score, 0.0)?;
        fbb.push_offset_slot(4, data)?;

        Ok(())
    }

    fn to_object(&self, bytes: &[u8]) -> Result<Note, Error> {
        let table = Table::root(bytes)?;

        Ok(Note {
            id: table.get_slot::<u64>(slot_offset(0), 0)?,
            title: table.get_str_slot(slot_offset(1))?.to_string(),
            rank: table.get_slot::<i32>(slot_offset(2), 0)?,
            score: table.get_slot::<f64>(slot_offset(3), 0.0)?,
            data: table.get_bytes_slot(slot_offset(4))?.to_vec(),
        })
    }
}

pub fn note_model() -> Model {
    let mut model = ModelBuilder::new();
    NoteBinding.add_to_model(&mut model).expect("note entity");
    model.last_entity_id(1, 100);

    model.build().expect("note model")
}

pub fn memory_store() -> Store {
    Store::builder()
        .model(note_model())
        .build(MemoryStore::new())
        .expect("store opens")
}

///
/// CountingStore
///
/// Delegates to a `MemoryStore` and counts every call that reaches it.
/// `fail_close` makes `query_close` report an error after releasing the query.
///

#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
    closes: AtomicUsize,
    fail_close: AtomicBool,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn fail_close(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }

    pub fn open_queries(&self) -> usize {
        self.inner.open_queries()
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl NativeStore for CountingStore {
    fn open(&self, model: &Model) -> Result<(), NativeError> {
        self.inner.open(model)
    }

    fn with_cursor(
        &self,
        entity_id: TypeId,
        write: bool,
        f: &mut CursorFn<'_>,
    ) -> Result<(), Error> {
        self.hit();
        self.inner.with_cursor(entity_id, write, f)
    }

    fn query_create(
        &self,
        entity_id: TypeId,
        conditions: &[Condition],
    ) -> Result<QueryHandle, NativeError> {
        self.hit();
        self.inner.query_create(entity_id, conditions)
    }

    fn query_close(&self, query: QueryHandle) -> Result<(), NativeError> {
        self.hit();
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.query_close(query)?;

        if self.fail_close.load(Ordering::SeqCst) {
            return Err(NativeError::illegal_state("close failed"));
        }

        Ok(())
    }

    fn query_describe(&self, query: QueryHandle) -> Result<String, NativeError> {
        self.hit();
        self.inner.query_describe(query)
    }

    fn query_set_param(
        &self,
        query: QueryHandle,
        entity_id: TypeId,
        property_id: TypeId,
        value: ParamValue,
    ) -> Result<(), NativeError> {
        self.hit();
        self.inner.query_set_param(query, entity_id, property_id, value)
    }
}

/// A store over a shared `CountingStore`, so tests can inspect the counters.
pub fn counting_store() -> (Store, Arc<CountingStore>) {
    let native = Arc::new(CountingStore::default());
    let store = Store::builder()
        .model(note_model())
        .build_shared(native.clone())
        .expect("store opens");

    (store, native)
}
