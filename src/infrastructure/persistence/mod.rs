pub mod fs_store;
pub mod in_memory_store;

pub use fs_store::FsForensicStore;
pub use in_memory_store::InMemoryStore;
