//! Well-known text (WKT) locations for the NREL developer API.

use crate::nrel::LatLon;
use std::fmt;

/// Where to download resource data for.
///
/// Rendered URL-encoded, with longitude before latitude as WKT requires:
///
/// ```
/// use nrel::{LatLon, Wkt};
///
/// let point = Wkt::Point(LatLon(40.09, -88.26));
/// assert_eq!(point.to_string(), "POINT(-88.26%2040.09)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Wkt {
    Point(LatLon),
    MultiPoint(Vec<LatLon>),
    /// A closed ring; the first coordinate is not repeated automatically.
    Polygon(Vec<LatLon>),
}

impl Wkt {
    /// Plain WKT text, e.g. `POINT(-88.26 40.09)`.
    pub fn to_wkt(&self) -> String {
        match self {
            Wkt::Point(location) => format!("POINT({})", coordinate(location)),
            Wkt::MultiPoint(locations) => format!("MULTIPOINT({})", coordinates(locations)),
            Wkt::Polygon(locations) => format!("POLYGON(({}))", coordinates(locations)),
        }
    }
}

impl fmt::Display for Wkt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.to_wkt().replace(' ', "%20").replace(',', "%2C");
        write!(f, "{}", encoded)
    }
}

fn coordinate(location: &LatLon) -> String {
    format!("{} {}", location.1, location.0)
}

fn coordinates(locations: &[LatLon]) -> String {
    locations
        .iter()
        .map(coordinate)
        .collect::<Vec<_>>()
        .join(",")
}
