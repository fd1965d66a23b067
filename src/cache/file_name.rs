//! Derives canonical cache file names from dataset identifiers.
//!
//! A name has the shape `<short-code>[_<year>][_<value>...].<ext>`. The
//! disambiguator values are appended in the order the database declares its
//! keys, so the same identifier always maps to the same name and identifiers
//! that differ in any field map to different names.

use crate::cache::error::CacheError;
use crate::types::database::Database;
use crate::types::dataset_id::{DatasetId, Disambiguators};
use crate::types::format::SerializationFormat;
use std::fmt;
use std::str::FromStr;

/// The name of one cache entry together with the format it is encoded in.
///
/// Produced by [`CacheFile::derive`]; the store never re-parses the name to
/// decide how to read or write it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheFile {
    name: String,
    format: SerializationFormat,
}

impl CacheFile {
    /// Derives the file name for `id` encoded as `format`.
    ///
    /// # Errors
    ///
    /// * [`CacheError::InvalidYear`] if the year is `0`.
    /// * [`CacheError::MissingDisambiguator`] if a key the database needs is absent.
    /// * [`CacheError::UnexpectedDisambiguator`] if a key the database does not use is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use nrel::{CacheFile, Database, DatasetId, SerializationFormat};
    ///
    /// let id = DatasetId::new(Database::Electricity).with_year(2022);
    /// let file = CacheFile::derive(&id, SerializationFormat::Pickled).unwrap();
    /// assert_eq!(file.name(), "ATBe_2022.pkl");
    /// ```
    pub fn derive(id: &DatasetId, format: SerializationFormat) -> Result<Self, CacheError> {
        let mut name = id.database.short_code().to_string();

        if let Some(year) = id.year {
            if year == 0 {
                return Err(CacheError::InvalidYear(year));
            }
            name.push_str(&format!("_{year}"));
        }

        for value in disambiguator_values(id.database, id.extra_keys.as_ref())? {
            name.push('_');
            name.push_str(&value);
        }

        name.push('.');
        name.push_str(format.extension());

        Ok(Self { name, format })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> SerializationFormat {
        self.format
    }
}

/// Parses a literal file name such as `"ATBe_1882.pkl"`, taking the format
/// from its extension.
impl FromStr for CacheFile {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = s
            .rsplit_once('.')
            .filter(|(stem, _)| !stem.is_empty())
            .and_then(|(_, extension)| SerializationFormat::from_extension(extension))
            .ok_or_else(|| CacheError::UnknownExtension(s.to_string()))?;
        Ok(Self {
            name: s.to_string(),
            format,
        })
    }
}

impl fmt::Display for CacheFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Derives a cache file name from a database tag.
///
/// String-typed entry point over [`CacheFile::derive`]; an unrecognized tag
/// fails with [`CacheError::UnknownDatabase`].
///
/// ```
/// use nrel::dataset_file_name;
///
/// let file = dataset_file_name("electricity", Some(1882), None, true).unwrap();
/// assert_eq!(file.name(), "ATBe_1882.pkl");
/// assert!(dataset_file_name("heating", Some(1882), None, true).is_err());
/// ```
pub fn dataset_file_name(
    database: &str,
    year: Option<u32>,
    extra_keys: Option<&Disambiguators>,
    pickled: bool,
) -> Result<CacheFile, CacheError> {
    let id = DatasetId {
        database: database.parse()?,
        year,
        extra_keys: extra_keys.cloned(),
    };
    CacheFile::derive(&id, SerializationFormat::from_pickled(pickled))
}

fn disambiguator_values(
    database: Database,
    extra_keys: Option<&Disambiguators>,
) -> Result<Vec<String>, CacheError> {
    let expected = database.disambiguator_keys();
    let empty = Disambiguators::new();
    let extra_keys = extra_keys.unwrap_or(&empty);

    if let Some(key) = extra_keys
        .keys()
        .find(|key| !expected.iter().any(|expected| *expected == *key))
    {
        return Err(CacheError::UnexpectedDisambiguator {
            database,
            key: key.to_string(),
        });
    }

    expected
        .iter()
        .map(|key| {
            extra_keys
                .get(key)
                .map(format_value)
                .ok_or_else(|| CacheError::MissingDisambiguator {
                    database,
                    key: key.to_string(),
                })
        })
        .collect()
}

// `-0.0` and `0.0` are the same key, keep them the same name.
fn format_value(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
