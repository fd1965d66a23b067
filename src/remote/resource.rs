//! Solar (NSRDB PSM3) and wind (WIND Toolkit) time series from the NREL
//! developer API.

use crate::remote::downloader::{redact_api_key, Downloader};
use crate::remote::error::FetchError;
use crate::remote::parse::csv_to_dataframe;
use crate::remote::wkt::Wkt;
use crate::types::database::Database;
use crate::types::user::User;
use chrono::NaiveDate;
use polars::prelude::*;
use reqwest::Url;
use std::fmt;
use tokio::task;

const API_ROOT: &str = "https://developer.nrel.gov";

/// Name of the datetime column built from the separate time fields.
pub const TIME_COLUMN: &str = "time";
const TIME_PARTS: [&str; 5] = ["Year", "Month", "Day", "Hour", "Minute"];

const SOLAR_ATTRIBUTES: [&str; 19] = [
    "air_temperature",
    "clearsky_dhi",
    "clearsky_dni",
    "clearsky_ghi",
    "cloud_type",
    "dew_point",
    "dhi",
    "dni",
    "fill_flag",
    "ghi",
    "ghuv-280-400",
    "ghuv-285-385",
    "relative_humidity",
    "solar_zenith_angle",
    "surface_albedo",
    "surface_pressure",
    "total_precipitable_water",
    "wind_direction",
    "wind_speed",
];

const WIND_ATTRIBUTES: [&str; 32] = [
    "pressure_0m",
    "pressure_100m",
    "pressure_200m",
    "relativehumidity_2m",
    "precipitationrate_0m",
    "windspeed_10m",
    "windspeed_40m",
    "windspeed_60m",
    "windspeed_80m",
    "windspeed_100m",
    "windspeed_120m",
    "windspeed_140m",
    "windspeed_160m",
    "windspeed_200m",
    "winddirection_10m",
    "winddirection_40m",
    "winddirection_60m",
    "winddirection_80m",
    "winddirection_100m",
    "winddirection_120m",
    "winddirection_140m",
    "winddirection_160m",
    "winddirection_200m",
    "temperature_10m",
    "temperature_40m",
    "temperature_60m",
    "temperature_80m",
    "temperature_100m",
    "temperature_120m",
    "temperature_140m",
    "temperature_160m",
    "temperature_200m",
];

/// The kind of resource time series to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Solar,
    Wind,
}

impl ResourceKind {
    pub fn database(&self) -> Database {
        match self {
            ResourceKind::Solar => Database::Solar,
            ResourceKind::Wind => Database::Wind,
        }
    }

    /// Every column the API can return for this kind.
    pub fn available_attributes(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Solar => &SOLAR_ATTRIBUTES,
            ResourceKind::Wind => &WIND_ATTRIBUTES,
        }
    }

    /// Supported resolutions in minutes.
    pub fn allowed_intervals(&self) -> &'static [u32] {
        match self {
            ResourceKind::Solar => &[30, 60],
            ResourceKind::Wind => &[5, 10, 15, 30, 60],
        }
    }

    fn api_path(&self) -> &'static str {
        match self {
            ResourceKind::Solar => "api/nsrdb/v2/solar/psm3-download",
            ResourceKind::Wind => "api/wind-toolkit/v2/wind/wtk-download",
        }
    }

    /// Bit set of `attributes` over [`ResourceKind::available_attributes`]:
    /// bit `i` is set when catalogue entry `i` is requested. Order and
    /// repetition do not matter.
    pub fn attribute_mask(&self, attributes: &[String]) -> Result<u64, FetchError> {
        let available = self.available_attributes();
        attributes.iter().try_fold(0u64, |mask, attribute| {
            let position = available
                .iter()
                .position(|known| *known == attribute.as_str())
                .ok_or_else(|| FetchError::UnknownAttribute {
                    kind: *self,
                    attribute: attribute.clone(),
                })?;
            Ok(mask | (1 << position))
        })
    }

    /// Lines of site metadata preceding the CSV header.
    pub(crate) fn metadata_rows(&self) -> usize {
        match self {
            ResourceKind::Solar => 2,
            ResourceKind::Wind => 1,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.database().tag())
    }
}

/// One download request against the developer API.
#[derive(Debug, Clone)]
pub struct ResourceQuery<'a> {
    pub kind: ResourceKind,
    pub wkt: Wkt,
    pub year: u32,
    /// Resolution in minutes.
    pub interval: u32,
    pub attributes: &'a [String],
    pub leap_day: bool,
    /// When true, time stamps are UTC instead of local time at the site.
    pub utc: bool,
    pub user: &'a User,
}

impl ResourceQuery<'_> {
    /// Builds the CSV download URL. Every query value is form-encoded.
    ///
    /// # Errors
    ///
    /// * [`FetchError::InvalidInterval`] if the interval is not offered for this kind.
    /// * [`FetchError::UnknownAttribute`] if an attribute is not in
    ///   [`ResourceKind::available_attributes`].
    pub fn url(&self) -> Result<String, FetchError> {
        self.validate()?;
        let user = self.user;
        let params = [
            ("wkt", self.wkt.to_wkt()),
            ("names", self.year.to_string()),
            ("leap_day", self.leap_day.to_string()),
            ("interval", self.interval.to_string()),
            ("utc", self.utc.to_string()),
            ("full_name", format!("{} {}", user.first_name, user.last_name)),
            ("email", user.email.clone()),
            ("affiliation", user.affiliation.clone()),
            ("mailing_list", user.mailing_list.to_string()),
            ("reason", user.reason.clone()),
            ("api_key", user.api_key.clone()),
            ("attributes", self.attributes.join(",")),
        ];
        let base = format!("{API_ROOT}/{}.csv", self.kind.api_path());
        let url = Url::parse_with_params(&base, &params).map_err(|e| FetchError::InvalidUrl {
            url: base.clone(),
            message: e.to_string(),
        })?;
        Ok(url.into())
    }

    /// Checks the interval and attributes, returning the attribute bit set
    /// (see [`ResourceKind::attribute_mask`]).
    pub fn validate(&self) -> Result<u64, FetchError> {
        let allowed = self.kind.allowed_intervals();
        if !allowed.contains(&self.interval) {
            return Err(FetchError::InvalidInterval {
                kind: self.kind,
                interval: self.interval,
                allowed,
            });
        }
        self.kind.attribute_mask(self.attributes)
    }
}

/// Downloads one year of solar or wind data.
pub async fn fetch_resource(
    downloader: &Downloader,
    query: &ResourceQuery<'_>,
) -> Result<DataFrame, FetchError> {
    let url = query.url()?;
    let bytes = downloader.get_bytes(&url).await?;
    let kind = query.kind;
    let shown_url = redact_api_key(&url);
    task::spawn_blocking(move || {
        let frame = csv_to_dataframe(bytes, &shown_url, kind.metadata_rows())?;
        with_time_column(frame, kind, &shown_url)
    })
    .await?
}

/// Replaces the `Year, Month, Day, Hour, Minute` columns with a single
/// leading [`TIME_COLUMN`] of naive datetimes in microseconds, the unit the
/// csv reader infers for parsed datetimes.
pub(crate) fn with_time_column(
    frame: DataFrame,
    kind: ResourceKind,
    url: &str,
) -> Result<DataFrame, FetchError> {
    let mut parts = Vec::with_capacity(TIME_PARTS.len());
    for name in TIME_PARTS {
        let column = frame.column(name).map_err(|_| FetchError::MissingColumn {
            url: url.to_string(),
            column: name.to_string(),
        })?;
        parts.push(column.cast(&DataType::Int64)?);
    }
    let parts = parts
        .iter()
        .map(|column| column.i64())
        .collect::<PolarsResult<Vec<_>>>()?;

    let invalid = |message: String| FetchError::InvalidTimestamp {
        kind,
        url: url.to_string(),
        message,
    };

    let mut stamps = Vec::with_capacity(frame.height());
    for row in 0..frame.height() {
        let field = |idx: usize| parts[idx].get(row);
        let (Some(year), Some(month), Some(day), Some(hour), Some(minute)) =
            (field(0), field(1), field(2), field(3), field(4))
        else {
            return Err(invalid(format!("row {row} has an empty time field")));
        };
        let stamp = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
            .and_then(|date| date.and_hms_opt(hour as u32, minute as u32, 0))
            .ok_or_else(|| {
                invalid(format!(
                    "{year}-{month:02}-{day:02} {hour:02}:{minute:02} is not a valid date and time"
                ))
            })?;
        stamps.push(stamp);
    }

    let time = DatetimeChunked::from_naive_datetime(
        TIME_COLUMN.into(),
        stamps,
        TimeUnit::Microseconds,
    );
    let mut frame = frame.drop_many(TIME_PARTS);
    frame.insert_column(0, time.into_series())?;
    Ok(frame)
}
