//! Download NREL energy datasets into polars frames, cached on disk.
//!
//! The [`Nrel`] client covers the Annual Technology Baseline (electricity and
//! transportation), the US renewable energy technical potential table, and
//! NSRDB solar / WIND Toolkit time series. Every table is saved to a local
//! cache directory under a name derived from its [`DatasetId`], and served from
//! there on later calls.
//!
//! The cache layer can also be used on its own through [`LocalStore`] and
//! [`CacheFile`].

mod cache;
mod error;
mod filtering;
mod nrel;
mod remote;
mod types;
mod utils;

pub use error::NrelError;
pub use filtering::NrelFrameFilterExt;
pub use nrel::*;

pub use cache::{dataset_file_name, CacheError, CacheFile, LocalStore};
pub use remote::atb::{electricity_url, transportation_url};
pub use remote::re_potential::DEFAULT_RE_POTENTIAL_URL;
pub use remote::{FetchError, ResourceKind, ResourceQuery, Wkt, TIME_COLUMN};

pub use types::database::Database;
pub use types::dataset_id::{DatasetId, Disambiguators};
pub use types::format::SerializationFormat;
pub use types::user::{PersonalData, User};
