//! Identifier and property vocabulary shared by the schema model, the
//! binding generator, and the runtime.
//!
//! Nothing in here talks to a store; these are plain values whose numeric
//! representation is part of the native model contract.

mod id;
mod property;


pub use id::*;
pub use property::*;
