pub mod error;
pub mod memory;
pub mod storage;

#[cfg(feature = "mongodb")]
pub mod dbs;

pub use error::StorageError;
pub use memory::MemoryStorage;
pub use storage::{run_cancellable, Storage, StoreItems};

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoStorage;
