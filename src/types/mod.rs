pub mod database;
pub mod dataset_id;
pub mod format;
pub mod user;
