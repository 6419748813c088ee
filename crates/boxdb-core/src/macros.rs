// include_bindings
// macro to be placed once in the crate that owns the record structs
/// Include the bindings emitted by `boxdb::build!` (placed in `OUT_DIR/boxdb_bindings.rs`).
#[macro_export]
macro_rules! include_bindings {
    () => {
        include!(concat!(env!("OUT_DIR"), "/boxdb_bindings.rs"));
    };
}
