//! Binding generator for boxdb.
//!
//! Turns a validated [`SchemaModel`] into Rust source: one unit per entity
//! (binding type, property handles, box alias) plus a model unit that
//! registers every entity. Build scripts normally go through [`build!`].

mod binding;
pub mod config;
mod error;
mod macros;
mod model;
mod output;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, GeneratorConfig};
pub use error::GenerationError;
pub use output::{GeneratedSource, GeneratedUnit};

use boxdb_schema::{case::to_snake, node::SchemaModel};
use proc_macro2::Ident;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use syn::parse_str;

/// First line of every generated unit. `write_to_dir` only ever removes
/// files that start with it.
pub const HEADER: &str = "// This file was automatically generated by boxdb, do not modify";

/// File name under `OUT_DIR` that `include_bindings!` reads.
pub const BINDINGS_FILE: &str = "boxdb_bindings.rs";

/// Generate bindings for every entity of `schema`.
///
/// The schema is validated first; nothing is produced unless every entity
/// can be generated.
pub fn generate(
    schema: &SchemaModel,
    config: &GeneratorConfig,
) -> Result<GeneratedSource, GenerationError> {
    schema.validate()?;

    BindingBuilder::new(schema, config)?.generate()
}

/// Load schema JSON from `path` and generate its bindings.
pub fn generate_from_file(
    path: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<GeneratedSource, GenerationError> {
    let schema = SchemaModel::from_json_file(path)?;

    generate(&schema, config)
}

/// Build-script entry point behind [`build!`]: generate from `schema_path`
/// and write the rendered source to `OUT_DIR/boxdb_bindings.rs`.
pub fn run_build_script(
    schema_path: &str,
    config: &GeneratorConfig,
) -> Result<(), GenerationError> {
    //
    // CARGO
    //

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={schema_path}");

    let out_dir = env::var("OUT_DIR").map_err(|_| GenerationError::MissingEnv("OUT_DIR"))?;

    //
    // BINDINGS
    //

    let source = generate_from_file(schema_path, config)?;
    let path = PathBuf::from(out_dir).join(BINDINGS_FILE);
    fs::write(&path, source.render()).map_err(|source| GenerationError::Io {
        path: path.display().to_string(),
        source,
    })?;

    Ok(())
}

///
/// BindingBuilder
///

pub(crate) struct BindingBuilder<'a> {
    pub(crate) schema: &'a SchemaModel,
    pub(crate) config: &'a GeneratorConfig,
    pub(crate) runtime: syn::Path,
}

impl<'a> BindingBuilder<'a> {
    pub(crate) fn new(
        schema: &'a SchemaModel,
        config: &'a GeneratorConfig,
    ) -> Result<Self, GenerationError> {
        let runtime = parse_str::<syn::Path>(&config.runtime_path)
            .map_err(|_| GenerationError::InvalidRuntimePath(config.runtime_path.clone()))?;

        Ok(Self {
            schema,
            config,
            runtime,
        })
    }

    /// Generate every unit, entities first in schema order, then the model.
    pub(crate) fn generate(&self) -> Result<GeneratedSource, GenerationError> {
        let suffix = &self.config.file_suffix;
        let mut units = Vec::with_capacity(self.schema.entities.len() + 1);

        for entity in &self.schema.entities {
            let tokens = binding::generate(self, entity)?;
            let file_name = format!("{}{suffix}", to_snake(&entity.name));
            tracing::debug!(entity = %entity.name, file = %file_name, "generated binding");

            units.push(GeneratedUnit::new(file_name, tokens.to_string()));
        }

        let tokens = model::generate(self)?;
        let file_name = format!("{}{suffix}", self.config.model_fn);
        tracing::debug!(file = %file_name, "generated model");
        units.push(GeneratedUnit::new(file_name, tokens.to_string()));

        Ok(GeneratedSource::new(units, suffix.clone()))
    }
}

/// Parse `name` as an identifier. Bare keywords and malformed names fail;
/// raw identifiers such as `r#type` are accepted.
pub(crate) fn ident(name: &str) -> Result<Ident, GenerationError> {
    parse_str::<Ident>(name).map_err(|_| GenerationError::InvalidIdent(name.to_string()))
}
