//! Persistence layer — a namespaced key-value store for the application draft.

pub mod file;
pub mod local;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use local::LocalPersistence;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
