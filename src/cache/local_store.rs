//! Persists tables as flat files in a single cache directory.

use crate::cache::error::CacheError;
use crate::cache::file_name::CacheFile;
use crate::types::format::SerializationFormat;
use crate::utils::get_cache_dir;
use log::{debug, info};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Header of the row label column written as the first csv column. A frame
/// that already has such a column gets `index_1`, `index_2`, ... instead.
pub(crate) const ROW_LABEL_COLUMN: &str = "index";

/// Saves and loads tables under derived file names in one directory.
///
/// The directory is resolved to an absolute path when the store is created,
/// but only created on disk by the first [`LocalStore::save`]. There is no
/// manifest: the directory listing is the index, and entries never expire.
///
/// Each operation is a blocking call on the file system. The store does no
/// locking; two writers saving the same name race and the last one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStore {
    directory: PathBuf,
}

impl LocalStore {
    /// Creates a store rooted at `directory`, resolved against the current
    /// working directory if it is relative.
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, CacheError> {
        let directory = directory.as_ref();
        let directory = std::path::absolute(directory)
            .map_err(|e| CacheError::DirResolution(directory.to_path_buf(), e))?;
        Ok(Self { directory })
    }

    /// Creates a store in the user's cache directory
    /// (e.g. `~/.cache/nrel_rs_cache` on Linux).
    pub fn in_default_location() -> Result<Self, CacheError> {
        let directory =
            get_cache_dir().map_err(|e| CacheError::DirResolution(PathBuf::new(), e))?;
        Self::new(directory)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes `frame` to `directory/<file name>`, replacing any existing file.
    ///
    /// Pickled entries use a binary columnar encoding; csv entries get a header
    /// row and a leading row label column.
    ///
    /// # Returns
    ///
    /// The path of the written file.
    ///
    /// # Errors
    ///
    /// * [`CacheError::UnsupportedCsvColumn`] if csv was requested and a column
    ///   has a nested or binary type. Nothing is written in that case.
    /// * [`CacheError::DirCreation`] if the directory cannot be created.
    /// * [`CacheError::WriteIo`] / [`CacheError::WritePolars`] if writing fails.
    ///   A partially written file may be left behind.
    pub fn save(&self, frame: &DataFrame, file: &CacheFile) -> Result<PathBuf, CacheError> {
        let path = self.directory.join(file.name());

        let mut encoded = match file.format() {
            SerializationFormat::Pickled => frame.clone(),
            SerializationFormat::Csv => {
                ensure_csv_compatible(frame)?;
                frame
                    .with_row_index(row_label_name(frame).into(), None)
                    .map_err(|e| CacheError::WritePolars(path.clone(), e))?
            }
        };

        std::fs::create_dir_all(&self.directory)
            .map_err(|e| CacheError::DirCreation(self.directory.clone(), e))?;

        let handle = File::create(&path).map_err(|e| CacheError::WriteIo(path.clone(), e))?;
        match file.format() {
            SerializationFormat::Pickled => {
                ParquetWriter::new(handle)
                    .with_compression(ParquetCompression::Snappy)
                    .finish(&mut encoded)
                    .map_err(|e| CacheError::WritePolars(path.clone(), e))?;
            }
            SerializationFormat::Csv => {
                CsvWriter::new(handle)
                    .include_header(true)
                    .finish(&mut encoded)
                    .map_err(|e| CacheError::WritePolars(path.clone(), e))?;
            }
        }

        info!(
            "Cached {} rows as {} to {:?}",
            frame.height(),
            file.format(),
            path
        );
        Ok(path)
    }

    /// Loads the table cached under `file`.
    ///
    /// # Errors
    ///
    /// * [`CacheError::NotFound`] if nothing is cached under that name. This is
    ///   the cache miss signal, see [`CacheError::is_cache_miss`].
    /// * [`CacheError::Conflict`] if the directory pattern matches more than one file.
    /// * [`CacheError::ReadIo`] / [`CacheError::ReadPolars`] if the file exists
    ///   but cannot be decoded.
    pub fn load(&self, file: &CacheFile) -> Result<DataFrame, CacheError> {
        let path = self.locate(file)?;

        let frame = match file.format() {
            SerializationFormat::Pickled => {
                let handle = File::open(&path).map_err(|e| CacheError::ReadIo(path.clone(), e))?;
                ParquetReader::new(handle)
                    .finish()
                    .map_err(|e| CacheError::ReadPolars(path.clone(), e))?
            }
            SerializationFormat::Csv => {
                let frame = CsvReadOptions::default()
                    .with_has_header(true)
                    .with_infer_schema_length(None)
                    .map_parse_options(|options| options.with_try_parse_dates(true))
                    .try_into_reader_with_file_path(Some(path.clone()))
                    .map_err(|e| CacheError::ReadPolars(path.clone(), e))?
                    .finish()
                    .map_err(|e| CacheError::ReadPolars(path.clone(), e))?;
                drop_row_labels(frame).map_err(|e| CacheError::ReadPolars(path.clone(), e))?
            }
        };

        info!("Cache hit for {} at {:?}", file, path);
        Ok(frame)
    }

    /// Finds the single file `file` resolves to in this store.
    ///
    /// An existing file at the exact path always wins. Otherwise the path is
    /// expanded as a glob pattern, so a store directory containing wildcards
    /// can match several files; that is reported as a conflict instead of
    /// picking one. A path that is not a valid pattern is only looked up
    /// literally.
    pub fn locate(&self, file: &CacheFile) -> Result<PathBuf, CacheError> {
        let candidate = self.directory.join(file.name());
        if candidate.is_file() {
            debug!("Found {:?}", candidate);
            return Ok(candidate);
        }

        let pattern = candidate.to_string_lossy().into_owned();
        let mut matches = match glob::glob(&pattern) {
            Ok(paths) => paths.collect::<Result<Vec<_>, _>>()?,
            Err(e) => {
                debug!("{} is not a glob pattern ({}), nothing to expand", pattern, e);
                Vec::new()
            }
        };
        debug!("Expanded {} to {} match(es)", pattern, matches.len());

        match matches.len() {
            0 => Err(CacheError::NotFound {
                file_name: file.name().to_string(),
                directory: self.directory.clone(),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(CacheError::Conflict {
                file_name: file.name().to_string(),
                matches,
            }),
        }
    }
}

fn ensure_csv_compatible(frame: &DataFrame) -> Result<(), CacheError> {
    for column in frame.get_columns() {
        let dtype = column.dtype();
        if dtype.is_nested() || matches!(dtype, DataType::Binary) {
            return Err(CacheError::UnsupportedCsvColumn {
                column: column.name().to_string(),
                dtype: dtype.clone(),
            });
        }
    }
    Ok(())
}

fn row_label_name(frame: &DataFrame) -> String {
    let taken = frame.get_column_names();
    let mut name = ROW_LABEL_COLUMN.to_string();
    let mut suffix = 0;
    while taken.iter().any(|column| column.as_str() == name) {
        suffix += 1;
        name = format!("{ROW_LABEL_COLUMN}_{suffix}");
    }
    name
}

/// Drops the leading row label column, whatever it is called.
fn drop_row_labels(frame: DataFrame) -> PolarsResult<DataFrame> {
    match frame.get_columns().split_first() {
        Some((_, data)) => DataFrame::new(data.to_vec()),
        None => Ok(frame),
    }
}
