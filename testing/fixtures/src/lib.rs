//! Record types for the boxdb end-to-end tests. Their bindings are generated
//! from `schema/model.json` by the build script.

///
/// Task
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub priority: i32,
    pub done: bool,
    pub payload: Vec<u8>,
    pub ratio: f64,
}

impl Task {
    #[must_use]
    pub fn new(text: &str, priority: i32) -> Self {
        Self {
            text: text.to_string(),
            priority,
            ..Self::default()
        }
    }
}

///
/// Reading
///
/// One sensor sample; covers every fixed-width slot type.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reading {
    pub id: u64,
    pub sensor: String,
    pub level: i8,
    pub delta: i16,
    pub channel: u16,
    pub taken_at: i64,
    pub sequence: u32,
    pub quality: u8,
    pub drift: isize,
    pub index: usize,
    pub unit: char,
    pub value: f32,
    pub raw: u64,
}

boxdb::include_bindings!();

/// Store over the in-memory engine with every fixture entity registered.
pub fn memory_store() -> Result<boxdb::Store, boxdb::Error> {
    boxdb::Store::builder()
        .model(boxdb_model()?)
        .build(boxdb::MemoryStore::new())
}
