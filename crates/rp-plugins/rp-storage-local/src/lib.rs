//! # rp-storage-local
//! rusty-press/crates/rp-plugins/rp-storage-local/src/lib.rs
//! Local implementations of the storage ports.
//! `MemoryStore` and `FileStore` back `KeyValueStore`; `LocalMediaStore`
//! backs `MediaStore` with content-addressed, sharded files.

mod file;
mod media;
mod memory;

pub use file::FileStore;
pub use media::LocalMediaStore;
pub use memory::MemoryStore;
