//! The main entry point: NREL tables served through a local file cache.
//!
//! Every method derives a cache file name from the dataset it is asked for,
//! returns the cached table when there is one, and otherwise downloads the
//! table, caches it and returns it.

use crate::cache::file_name::CacheFile;
use crate::cache::local_store::LocalStore;
use crate::error::NrelError;
use crate::remote::atb::{fetch_electricity, fetch_transportation};
use crate::remote::downloader::Downloader;
use crate::remote::error::FetchError;
use crate::remote::re_potential::{fetch_re_potential, DEFAULT_RE_POTENTIAL_URL};
use crate::remote::resource::{fetch_resource, ResourceKind, ResourceQuery};
use crate::remote::wkt::Wkt;
use crate::types::database::Database;
use crate::types::dataset_id::{DatasetId, Disambiguators};
use crate::types::format::SerializationFormat;
use crate::types::user::User;
use crate::utils::get_cache_dir;
use bon::bon;
use log::warn;
use polars::prelude::*;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::task;

/// A geographical coordinate, latitude first.
///
/// # Examples
///
/// ```
/// use nrel::LatLon;
///
/// let champaign = LatLon(40.1164, -88.2434);
/// assert_eq!(champaign.0, 40.1164); // Latitude
/// assert_eq!(champaign.1, -88.2434); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Default resolution, in minutes, of solar and wind downloads.
pub const DEFAULT_INTERVAL: u32 = 60;

/// Client for NREL datasets with a local cache.
///
/// Create one with [`Nrel::new`] to cache in the user's cache directory, or
/// with [`Nrel::with_cache_folder`] to choose the folder. The folder is only
/// created once the first table is cached.
///
/// Cached entries never expire. Delete the file (see
/// [`LocalStore::locate`]) to force a new download.
///
/// # Examples
///
/// ```rust,no_run
/// # use nrel::{Nrel, NrelError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), NrelError> {
/// let client = Nrel::new()?;
/// let atb = client.electricity().year(2023).call().await?.collect()?;
/// println!("{}", atb.head(Some(5)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Nrel {
    store: LocalStore,
    downloader: Downloader,
}

#[bon]
impl Nrel {
    /// Creates a client caching into `cache_folder`. Relative paths are
    /// resolved against the current working directory.
    ///
    /// # Errors
    ///
    /// Returns [`NrelError::Cache`] if the folder cannot be resolved to an
    /// absolute path.
    pub fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, NrelError> {
        Ok(Self {
            store: LocalStore::new(cache_folder)?,
            downloader: Downloader::new(),
        })
    }

    /// Creates a client caching into the default cache directory
    /// (e.g. `~/.cache/nrel_rs_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`NrelError::CacheDirResolution`] if the user's cache
    /// directory cannot be determined.
    pub fn new() -> Result<Self, NrelError> {
        let cache_folder = get_cache_dir().map_err(NrelError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder)
    }

    pub fn cache_folder(&self) -> &Path {
        self.store.directory()
    }

    /// The store backing this client, for direct saves and loads.
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Annual Technology Baseline electricity data for one ATB edition.
    ///
    /// # Arguments
    ///
    /// * `.year(u32)`: **Required.** The ATB edition, e.g. `2023`.
    /// * `.format(SerializationFormat)`: Optional. How to cache the table. Defaults to
    ///   [`SerializationFormat::Pickled`].
    #[builder]
    pub async fn electricity(
        &self,
        year: u32,
        format: Option<SerializationFormat>,
    ) -> Result<LazyFrame, NrelError> {
        let id = DatasetId::new(Database::Electricity).with_year(year);
        let frame = self
            .cached(&id, format.unwrap_or_default(), || {
                fetch_electricity(&self.downloader, year)
            })
            .await?;
        Ok(frame.lazy())
    }

    /// Annual Technology Baseline transportation data for one ATB edition.
    ///
    /// # Arguments
    ///
    /// * `.year(u32)`: **Required.** The ATB edition, e.g. `2020`.
    /// * `.format(SerializationFormat)`: Optional. Defaults to [`SerializationFormat::Pickled`].
    #[builder]
    pub async fn transportation(
        &self,
        year: u32,
        format: Option<SerializationFormat>,
    ) -> Result<LazyFrame, NrelError> {
        let id = DatasetId::new(Database::Transportation).with_year(year);
        let frame = self
            .cached(&id, format.unwrap_or_default(), || {
                fetch_transportation(&self.downloader, year)
            })
            .await?;
        Ok(frame.lazy())
    }

    /// Renewable energy technical potential per US state, with `State` as the
    /// first column.
    ///
    /// # Arguments
    ///
    /// * `.url(&str)`: Optional. Where to download the workbook from. Defaults to
    ///   [`DEFAULT_RE_POTENTIAL_URL`]. The URL is not part of the cache identity:
    ///   once cached, the table is returned regardless of the URL.
    /// * `.format(SerializationFormat)`: Optional. Defaults to [`SerializationFormat::Pickled`].
    #[builder]
    pub async fn re_potential(
        &self,
        url: Option<&str>,
        format: Option<SerializationFormat>,
    ) -> Result<LazyFrame, NrelError> {
        let url = url.unwrap_or(DEFAULT_RE_POTENTIAL_URL);
        let id = DatasetId::new(Database::RePotential);
        let frame = self
            .cached(&id, format.unwrap_or_default(), || {
                fetch_re_potential(&self.downloader, url)
            })
            .await?;
        Ok(frame.lazy())
    }

    /// NSRDB solar time series for one location over one or more years.
    ///
    /// Each year is cached separately under its location and request options
    /// (interval, time zone, leap day and attribute set); the result stacks
    /// the years in the order given. The first column is `time`.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.**
    /// * `.years(&[u32])`: **Required.** At least one year.
    /// * `.user(&User)`: **Required.** Identifies the caller to the API.
    /// * `.attributes(Vec<String>)`: Optional. Columns to request. Defaults to every
    ///   entry of [`ResourceKind::available_attributes`]. Order and repetition do not
    ///   change the cache identity.
    /// * `.interval(u32)`: Optional. Minutes between rows, `30` or `60`. Defaults to `60`.
    /// * `.leap_day(bool)`: Optional. Include February 29th. Defaults to `false`.
    /// * `.utc(bool)`: Optional. UTC instead of local time stamps. Defaults to `false`.
    /// * `.format(SerializationFormat)`: Optional. Defaults to [`SerializationFormat::Pickled`].
    ///
    /// # Errors
    ///
    /// Returns [`NrelError::NoYearsRequested`] for an empty `years`, and
    /// [`NrelError::Fetch`] for an unsupported interval or attribute before
    /// anything is downloaded.
    #[builder]
    pub async fn solar(
        &self,
        location: LatLon,
        years: &[u32],
        user: &User,
        attributes: Option<Vec<String>>,
        interval: Option<u32>,
        leap_day: Option<bool>,
        utc: Option<bool>,
        format: Option<SerializationFormat>,
    ) -> Result<LazyFrame, NrelError> {
        let options = ResourceOptions {
            kind: ResourceKind::Solar,
            location,
            attributes,
            interval,
            leap_day,
            utc,
            format,
        };
        self.resource(options, years, user).await
    }

    /// WIND Toolkit time series for one location over one or more years.
    ///
    /// Same arguments as [`Nrel::solar`], except that the interval may be `5`,
    /// `10`, `15`, `30` or `60` minutes.
    #[builder]
    pub async fn wind(
        &self,
        location: LatLon,
        years: &[u32],
        user: &User,
        attributes: Option<Vec<String>>,
        interval: Option<u32>,
        leap_day: Option<bool>,
        utc: Option<bool>,
        format: Option<SerializationFormat>,
    ) -> Result<LazyFrame, NrelError> {
        let options = ResourceOptions {
            kind: ResourceKind::Wind,
            location,
            attributes,
            interval,
            leap_day,
            utc,
            format,
        };
        self.resource(options, years, user).await
    }
}

struct ResourceOptions {
    kind: ResourceKind,
    location: LatLon,
    attributes: Option<Vec<String>>,
    interval: Option<u32>,
    leap_day: Option<bool>,
    utc: Option<bool>,
    format: Option<SerializationFormat>,
}

impl Nrel {
    async fn resource(
        &self,
        options: ResourceOptions,
        years: &[u32],
        user: &User,
    ) -> Result<LazyFrame, NrelError> {
        if years.is_empty() {
            return Err(NrelError::NoYearsRequested);
        }
        let kind = options.kind;
        let attributes = options.attributes.unwrap_or_else(|| {
            kind.available_attributes()
                .iter()
                .map(|attribute| attribute.to_string())
                .collect()
        });
        user.warn_missing_fields();

        let mut frames = Vec::with_capacity(years.len());
        for &year in years {
            let query = ResourceQuery {
                kind,
                wkt: Wkt::Point(options.location),
                year,
                interval: options.interval.unwrap_or(DEFAULT_INTERVAL),
                attributes: &attributes,
                leap_day: options.leap_day.unwrap_or(false),
                utc: options.utc.unwrap_or(false),
                user,
            };
            // Reject bad parameters before touching the cache.
            let attribute_mask = query.validate()?;

            let id = resource_id(&query, options.location, attribute_mask);
            let frame = self
                .cached(&id, options.format.unwrap_or_default(), || {
                    fetch_resource(&self.downloader, &query)
                })
                .await?;
            frames.push(frame.lazy());
        }

        Ok(concat(frames, UnionArgs::default())?)
    }

    /// Cache-aside lookup: load the table cached for `id`, or run `fetch`
    /// and cache its result. Only a cache miss triggers `fetch`; any other
    /// cache error is returned as is.
    async fn cached<F, Fut>(
        &self,
        id: &DatasetId,
        format: SerializationFormat,
        fetch: F,
    ) -> Result<DataFrame, NrelError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<DataFrame, FetchError>>,
    {
        let file = CacheFile::derive(id, format)?;

        let store = self.store.clone();
        let lookup = file.clone();
        match task::spawn_blocking(move || store.load(&lookup)).await? {
            Ok(frame) => return Ok(frame),
            Err(e) if e.is_cache_miss() => {
                warn!("Cache miss for {}. Downloading.", file);
            }
            Err(e) => return Err(e.into()),
        }

        let frame = fetch().await?;

        let store = self.store.clone();
        let frame = task::spawn_blocking(move || {
            store.save(&frame, &file)?;
            Ok::<_, NrelError>(frame)
        })
        .await??;
        Ok(frame)
    }
}

/// Identity of one year of solar or wind data: everything that changes the
/// table's content is a disambiguator.
fn resource_id(query: &ResourceQuery<'_>, location: LatLon, attribute_mask: u64) -> DatasetId {
    let flag = |set: bool| if set { 1.0 } else { 0.0 };
    DatasetId::new(query.kind.database())
        .with_year(query.year)
        .with_extra_keys(
            Disambiguators::new()
                .with("lon", location.1)
                .with("lat", location.0)
                .with("interval", f64::from(query.interval))
                .with("utc", flag(query.utc))
                .with("leap_day", flag(query.leap_day))
                .with("attributes", attribute_mask as f64),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::error::CacheError;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn client(dir: &TempDir) -> Nrel {
        Nrel::with_cache_folder(dir.path().to_path_buf()).expect("Failed to create client")
    }

    fn user() -> User {
        User {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            reason: "Research".to_string(),
            email: "ada@example.com".to_string(),
            affiliation: "Analytical Engines".to_string(),
            mailing_list: false,
            api_key: "DEMO_KEY".to_string(),
        }
    }

    fn cache_entries(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path())
            .expect("Failed to list cache dir")
            .count()
    }

    fn solar_year(year: i32) -> DataFrame {
        let stamps = (0..3).map(|hour| {
            NaiveDate::from_ymd_opt(year, 1, 1)
                .and_then(|date| date.and_hms_opt(hour, 0, 0))
                .expect("valid datetime")
        });
        let time =
            DatetimeChunked::from_naive_datetime("time".into(), stamps, TimeUnit::Microseconds);
        let mut frame = df!("GHI" => [0.0f64, 10.0, 20.0]).expect("Failed to build frame");
        frame
            .insert_column(0, time.into_series())
            .expect("Failed to insert time column");
        frame
    }

    struct SolarRequest {
        location: LatLon,
        interval: u32,
        utc: bool,
        attributes: Vec<String>,
    }

    impl SolarRequest {
        fn file(&self, year: u32, user: &User, format: SerializationFormat) -> CacheFile {
            let query = ResourceQuery {
                kind: ResourceKind::Solar,
                wkt: Wkt::Point(self.location),
                year,
                interval: self.interval,
                attributes: &self.attributes,
                leap_day: false,
                utc: self.utc,
                user,
            };
            let mask = query.validate().expect("Valid request");
            CacheFile::derive(&resource_id(&query, self.location, mask), format)
                .expect("Failed to derive name")
        }
    }

    #[tokio::test]
    async fn test_electricity_served_from_cache() -> Result<(), NrelError> {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let client = client(&dir);
        let cached = df!(
            "technology" => ["LandbasedWind", "UtilityPV"],
            "value" => [1500.5f64, 1100.0],
        )?;
        let file = CacheFile::derive(
            &DatasetId::new(Database::Electricity).with_year(2023),
            SerializationFormat::Csv,
        )?;
        client.store().save(&cached, &file)?;

        let frame = client
            .electricity()
            .year(2023)
            .format(SerializationFormat::Csv)
            .call()
            .await?
            .collect()?;

        assert!(frame.equals(&cached));
        Ok(())
    }

    #[tokio::test]
    async fn test_re_potential_ignores_url_once_cached() -> Result<(), NrelError> {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let client = client(&dir);
        let cached = df!(
            "State" => ["Alabama", "Alaska"],
            "Urban PV (GWh)" => [19_000.0f64, 1_200.0],
        )?;
        let file = CacheFile::derive(
            &DatasetId::new(Database::RePotential),
            SerializationFormat::Pickled,
        )?;
        client.store().save(&cached, &file)?;

        let frame = client
            .re_potential()
            .url("http://invalid.localhost/unused.xlsx")
            .call()
            .await?
            .collect()?;

        assert!(frame.equals(&cached));
        Ok(())
    }

    #[tokio::test]
    async fn test_solar_stacks_csv_cached_years_in_order() -> Result<(), NrelError> {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let client = client(&dir);
        let user = user();
        let request = SolarRequest {
            location: LatLon(40.1164, -88.2434),
            interval: 30,
            utc: false,
            attributes: vec!["ghi".to_string()],
        };
        for year in [2018, 2019] {
            let file = request.file(year, &user, SerializationFormat::Csv);
            client.store().save(&solar_year(year as i32), &file)?;
        }

        let frame = client
            .solar()
            .location(request.location)
            .years(&[2019, 2018])
            .user(&user)
            .interval(30)
            .attributes(request.attributes.clone())
            .format(SerializationFormat::Csv)
            .call()
            .await?
            .collect()?;

        assert_eq!(frame.height(), 6);
        assert_eq!(
            frame.column("time")?.dtype(),
            &DataType::Datetime(TimeUnit::Microseconds, None)
        );
        let first = frame.column("time")?.datetime()?.get(0);
        let last = frame.column("time")?.datetime()?.get(5);
        assert!(first > last, "2019 rows should come before 2018 rows");
        Ok(())
    }

    #[tokio::test]
    async fn test_request_options_are_part_of_identity() -> Result<(), NrelError> {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let client = client(&dir);
        let user = user();
        let cached = SolarRequest {
            location: LatLon(40.1164, -88.2434),
            interval: 60,
            utc: false,
            attributes: vec!["ghi".to_string()],
        };
        let cached_file = cached.file(2019, &user, SerializationFormat::Pickled);
        client.store().save(&solar_year(2019), &cached_file)?;

        let utc_dni = SolarRequest {
            utc: true,
            attributes: vec!["dni".to_string()],
            ..cached
        };
        let other_file = utc_dni.file(2019, &user, SerializationFormat::Pickled);
        assert_ne!(cached_file, other_file);
        let err = client.store().load(&other_file).unwrap_err();
        assert!(err.is_cache_miss());

        let repeated = SolarRequest {
            location: LatLon(40.1164, -88.2434),
            interval: 60,
            utc: false,
            attributes: vec!["ghi".to_string(), "ghi".to_string()],
        };
        assert_eq!(repeated.file(2019, &user, SerializationFormat::Pickled), cached_file);
        Ok(())
    }

    #[tokio::test]
    async fn test_cached_fetches_once_then_reads_from_disk() -> Result<(), NrelError> {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let client = client(&dir);
        let id = DatasetId::new(Database::Electricity).with_year(2023);
        let table = df!(
            "technology" => ["LandbasedWind", "UtilityPV"],
            "value" => [1500.5f64, 1100.0],
        )?;
        let fetches = AtomicUsize::new(0);
        let counter = &fetches;

        let fetched = table.clone();
        let first = client
            .cached(&id, SerializationFormat::Pickled, move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, FetchError>(fetched)
            })
            .await?;
        assert!(first.equals(&table));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache_entries(&dir), 1);
        assert!(dir.path().join("ATBe_2023.pkl").is_file());

        let fetched = table.clone();
        let second = client
            .cached(&id, SerializationFormat::Pickled, move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, FetchError>(fetched)
            })
            .await?;
        assert!(second.equals(&table));
        assert_eq!(fetches.load(Ordering::SeqCst), 1, "Second call must not fetch");
        assert_eq!(cache_entries(&dir), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_fetch_caches_nothing() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let client = client(&dir);
        let id = DatasetId::new(Database::Transportation).with_year(2020);

        let result = client
            .cached(&id, SerializationFormat::Csv, || async {
                Err(FetchError::EmptySheet {
                    url: "test://atbt".to_string(),
                    sheet: "Joined Data for Levelized Calc".to_string(),
                })
            })
            .await;

        let err = result.err().expect("Fetch failure should be returned");
        assert!(matches!(err, NrelError::Fetch(FetchError::EmptySheet { .. })));
        assert_eq!(cache_entries(&dir), 0);
    }

    #[tokio::test]
    async fn test_invalid_requests_fail_before_download() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let client = client(&dir);

        let err = client
            .electricity()
            .year(0)
            .call()
            .await
            .err()
            .expect("Year 0 should be rejected");
        assert!(matches!(err, NrelError::Cache(CacheError::InvalidYear(0))));

        let err = client
            .wind()
            .location(LatLon(40.0, -88.0))
            .years(&[])
            .user(&user())
            .call()
            .await
            .err()
            .expect("Empty years should be rejected");
        assert!(matches!(err, NrelError::NoYearsRequested));

        let err = client
            .solar()
            .location(LatLon(40.0, -88.0))
            .years(&[2019])
            .user(&user())
            .interval(5)
            .call()
            .await
            .err()
            .expect("Interval 5 should be rejected for solar");
        assert!(matches!(
            err,
            NrelError::Fetch(FetchError::InvalidInterval { interval: 5, .. })
        ));
        assert_eq!(cache_entries(&dir), 0);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_not_treated_as_miss() -> Result<(), NrelError> {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let client = client(&dir);
        let file = CacheFile::derive(
            &DatasetId::new(Database::Transportation).with_year(2020),
            SerializationFormat::Pickled,
        )?;
        std::fs::write(dir.path().join(file.name()), b"not parquet").expect("Failed to write");

        let err = client
            .transportation()
            .year(2020)
            .call()
            .await
            .err()
            .expect("Corrupt entry should be an error");
        assert!(matches!(err, NrelError::Cache(CacheError::ReadPolars(..))));
        Ok(())
    }
}
