use crate::config::ConfigError;
use boxdb_schema::SchemaError;
use thiserror::Error as ThisError;

///
/// GenerationError
///
/// Any of these halts generation; no partial or placeholder source is
/// produced.
///

#[derive(Debug, ThisError)]
pub enum GenerationError {
    #[error("{entity}.{property}: buffer kind {declared} does not fit type {semantic_type} (expected {expected})")]
    BufferKindMismatch {
        entity: String,
        property: String,
        semantic_type: String,
        declared: String,
        expected: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("'{0}' is not a valid Rust identifier")]
    InvalidIdent(String),

    #[error("'{0}' is not a valid runtime crate path")]
    InvalidRuntimePath(String),

    #[error("could not write generated source '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{entity}.{property}: store type {declared} does not fit type {semantic_type} (expected {expected})")]
    StoreTypeMismatch {
        entity: String,
        property: String,
        semantic_type: String,
        declared: String,
        expected: String,
    },

    #[error("{entity}.{property}: no encoding rule for type {semantic_type}")]
    UnsupportedType {
        entity: String,
        property: String,
        semantic_type: String,
    },
}
