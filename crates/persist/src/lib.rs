//! Persistence for saved games and replays
//!
//! - [`format`]: JSON file shapes and the load-integrity checks
//! - [`storage`]: the byte-level [`Storage`] trait with disk and memory backends
//! - [`store`]: [`GameStore`], the autosave file and the bounded replay store
//! - [`config`]: save directory layout
//!
//! Nothing here is fatal: load failures come back as [`LoadError`] naming the
//! bad field, and save failures are logged and reported as `false`.

pub mod config;
pub mod error;
pub mod format;
pub mod storage;
pub mod store;

pub use config::PersistConfig;
pub use error::{LoadError, SaveError, StorageError};
pub use format::{decode_replay, decode_snapshot, encode_replay, encode_snapshot};
pub use storage::{FsStorage, MemoryStorage, Storage};
pub use store::GameStore;
