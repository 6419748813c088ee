mod entity;
mod property;
mod schema;

pub use entity::*;
pub use property::*;
pub use schema::*;
