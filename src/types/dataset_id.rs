//! The logical key naming one cacheable table.

use crate::types::database::Database;
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

/// Extra numeric keys that tell per-location datasets apart
/// (for example `lon`, `lat` and `interval` for solar and wind data).
///
/// Keys are kept sorted so two maps with the same entries always compare and
/// hash equal, regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Disambiguators(BTreeMap<String, OrderedFloat<f64>>);

impl Disambiguators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a key, returning the updated map.
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0
            .insert(key.into(), OrderedFloat(value))
            .map(OrderedFloat::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).map(|value| value.into_inner())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Disambiguators {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut keys = Disambiguators::new();
        for (key, value) in iter {
            keys.insert(key, value);
        }
        keys
    }
}

/// Identifies what data a cached table holds: the database, an optional year
/// and optional disambiguators.
///
/// # Examples
///
/// ```
/// use nrel::{Database, DatasetId, Disambiguators};
///
/// let atb = DatasetId::new(Database::Electricity).with_year(2022);
///
/// let site = DatasetId::new(Database::Solar)
///     .with_year(2019)
///     .with_extra_keys(
///         Disambiguators::new()
///             .with("lon", -88.26)
///             .with("lat", 40.09)
///             .with("interval", 60.0)
///             .with("utc", 0.0)
///             .with("leap_day", 0.0)
///             .with("attributes", 512.0),
///     );
/// assert_ne!(atb, site);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetId {
    pub database: Database,
    pub year: Option<u32>,
    pub extra_keys: Option<Disambiguators>,
}

impl DatasetId {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            year: None,
            extra_keys: None,
        }
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_extra_keys(mut self, extra_keys: Disambiguators) -> Self {
        self.extra_keys = Some(extra_keys);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_disambiguators_ignore_insertion_order() {
        let a = Disambiguators::new().with("lat", 40.09).with("lon", -88.26);
        let b: Disambiguators = [("lon", -88.26), ("lat", 40.09)].into_iter().collect();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(DatasetId::new(Database::Wind).with_extra_keys(a));
        assert!(set.contains(&DatasetId::new(Database::Wind).with_extra_keys(b)));
    }

    #[test]
    fn test_insert_replaces_value() {
        let mut keys = Disambiguators::new();
        assert_eq!(keys.insert("lat", 1.0), None);
        assert_eq!(keys.insert("lat", 2.0), Some(1.0));
        assert_eq!(keys.get("lat"), Some(2.0));
        assert_eq!(keys.len(), 1);
    }
}
