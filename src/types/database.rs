//! Defines the set of NREL databases this crate knows how to fetch and cache.

use crate::cache::error::CacheError;
use std::fmt;
use std::str::FromStr;

/// The NREL databases supported by this crate.
///
/// Each database has a fixed short code that prefixes its cache file names,
/// and a fixed set of disambiguator keys that per-location datasets need to
/// tell their cache entries apart.
///
/// # Examples
///
/// ```
/// use nrel::Database;
///
/// let db: Database = "electricity".parse().unwrap();
/// assert_eq!(db, Database::Electricity);
/// assert_eq!(db.short_code(), "ATBe");
/// assert!("heating".parse::<Database>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Database {
    /// Annual Technology Baseline, electricity sector.
    Electricity,
    /// Annual Technology Baseline, transportation sector.
    Transportation,
    /// U.S. renewable energy technical potential by state.
    RePotential,
    /// National Solar Radiation Database (PSM3), per location and year.
    Solar,
    /// WIND Toolkit, per location and year.
    Wind,
}

impl Database {
    /// All known databases, in declaration order.
    pub const ALL: [Database; 5] = [
        Database::Electricity,
        Database::Transportation,
        Database::RePotential,
        Database::Solar,
        Database::Wind,
    ];

    /// The tag used to name this database in user-facing strings.
    pub fn tag(&self) -> &'static str {
        match self {
            Database::Electricity => "electricity",
            Database::Transportation => "transportation",
            Database::RePotential => "re_potential",
            Database::Solar => "solar",
            Database::Wind => "wind",
        }
    }

    /// The abbreviation every cache file of this database starts with.
    pub fn short_code(&self) -> &'static str {
        match self {
            Database::Electricity => "ATBe",
            Database::Transportation => "ATBt",
            Database::RePotential => "NREL_REP",
            Database::Solar => "NSRDB",
            Database::Wind => "WTK",
        }
    }

    /// Disambiguator keys consumed by the file name, in the order their values
    /// are appended. Databases without per-location data consume none.
    ///
    /// Solar and wind tables depend on every request option: the site, the
    /// interval, the `utc` and `leap_day` flags (stored as `0`/`1`) and the
    /// requested `attributes` (a bit set over the kind's attribute catalogue).
    pub fn disambiguator_keys(&self) -> &'static [&'static str] {
        match self {
            Database::Electricity | Database::Transportation | Database::RePotential => &[],
            Database::Solar | Database::Wind => {
                &["lon", "lat", "interval", "utc", "leap_day", "attributes"]
            }
        }
    }
}

impl FromStr for Database {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Database::ALL
            .into_iter()
            .find(|db| db.tag() == s)
            .ok_or_else(|| CacheError::UnknownDatabase(s.to_string()))
    }
}

/// Formats a `Database` using its tag.
///
/// ```
/// use nrel::Database;
///
/// assert_eq!(Database::RePotential.to_string(), "re_potential");
/// ```
impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
