//! Local cache layer.
//!
//! * [`file_name`]: derives a stable file name from a dataset identifier.
//! * [`local_store`]: saves a table under such a name and loads it back.
//!
//! Callers use these in a cache-aside fashion: derive the name, try to load,
//! and on a [`CacheError::NotFound`] fetch the data remotely and save it.

pub mod error;
pub mod file_name;
pub mod local_store;

pub use error::CacheError;
pub use file_name::{dataset_file_name, CacheFile};
pub use local_store::LocalStore;
