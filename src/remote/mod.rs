//! Downloaders for the NREL sources. Every function here goes to the network;
//! caching is handled by [`crate::Nrel`].

pub mod atb;
pub mod downloader;
pub mod error;
mod parse;
pub mod re_potential;
pub mod resource;
pub mod wkt;

pub use error::FetchError;
pub use resource::{ResourceKind, ResourceQuery, TIME_COLUMN};
pub use wkt::Wkt;
