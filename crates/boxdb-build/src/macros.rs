//! Build-script helper that generates bindings from a schema JSON file.
//!
//! The generated source lands in `OUT_DIR/boxdb_bindings.rs`, where
//! `boxdb::include_bindings!()` picks it up. The macro evaluates to
//! `Result<(), GenerationError>`.
#[macro_export]
macro_rules! build {
    ($schema:expr) => {
        $crate::run_build_script($schema, &$crate::GeneratorConfig::default())
    };

    ($schema:expr, $config:expr) => {
        $crate::run_build_script($schema, $config)
    };
}
