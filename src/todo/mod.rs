//! The to-do list: a store object, its persistence backends and a web front end.

mod persist;
mod store;
mod web;

pub use persist::{JsonFile, MemoryPersist, Persist};
pub use store::TodoStore;
pub use web::{router, serve, serve_listener, SharedStore};
