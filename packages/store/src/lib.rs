pub mod document;
pub mod error;

mod memory;
pub use memory::{MemoryStore, Operation};

pub use document::{Document, DocumentStore, Fields};
pub use error::StoreError;
