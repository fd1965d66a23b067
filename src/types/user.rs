//! Personal data required by the NREL developer API.

use crate::error::NrelError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A user of the NREL developer API.
///
/// The developer API rejects anonymous downloads: every request carries the
/// user's name, affiliation, reason, e-mail and API key. Sign up for a key at
/// <https://developer.nrel.gov/signup/>.
///
/// A profile can be kept on disk as JSON with [`User::save`] and
/// [`User::from_file`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    /// Motivation for making API queries.
    pub reason: String,
    pub email: String,
    pub affiliation: String,
    pub mailing_list: bool,
    pub api_key: String,
}

/// URL-ready personal fields, as produced by [`User::personal_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalData {
    pub api_key: String,
    pub name: String,
    pub reason: String,
    pub affiliation: String,
    pub email: String,
    pub mailing_list: String,
}

impl User {
    /// First and last name joined by `+`, with any inner spaces replaced by `+`.
    pub fn full_name(&self) -> String {
        replace_space(&format!("{}+{}", self.first_name, self.last_name))
    }

    /// Formats the profile for use in hand-built query strings.
    ///
    /// Empty fields are not an error here, but the API will likely reject the
    /// request, so each one is logged as a warning.
    pub fn personal_data(&self) -> PersonalData {
        self.warn_missing_fields();
        PersonalData {
            api_key: self.api_key.clone(),
            name: self.full_name(),
            reason: replace_space(&self.reason),
            affiliation: replace_space(&self.affiliation),
            email: self.email.clone(),
            mailing_list: self.mailing_list.to_string(),
        }
    }

    /// Logs a warning for each empty field. Returns true if any was empty.
    pub(crate) fn warn_missing_fields(&self) -> bool {
        let fields = [
            ("api_key", self.api_key.as_str()),
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("reason", self.reason.as_str()),
            ("affiliation", self.affiliation.as_str()),
            ("email", self.email.as_str()),
        ];
        let mut missing = false;
        for (field, value) in fields {
            if value.trim().is_empty() {
                warn!("Field: {} is empty.", field);
                missing = true;
            }
        }
        if missing {
            warn!("Some fields are missing. API queries may be rejected.");
        }
        missing
    }

    /// Reads a user profile from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, NrelError> {
        let bytes =
            std::fs::read(path).map_err(|e| NrelError::ProfileRead(path.to_path_buf(), e))?;
        serde_json::from_slice(&bytes).map_err(|e| NrelError::ProfileParse(path.to_path_buf(), e))
    }

    /// Writes this profile as pretty-printed JSON, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), NrelError> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| NrelError::ProfileParse(path.to_path_buf(), e))?;
        std::fs::write(path, json).map_err(|e| NrelError::ProfileWrite(path.to_path_buf(), e))
    }
}

fn replace_space(value: &str) -> String {
    value.replace(' ', "+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_user() -> User {
        User {
            first_name: "Samuel".to_string(),
            last_name: "G Dotson".to_string(),
            reason: "Academic research".to_string(),
            email: "user@example.com".to_string(),
            affiliation: "University of Illinois".to_string(),
            mailing_list: false,
            api_key: "DEMO_KEY".to_string(),
        }
    }

    #[test]
    fn test_full_name_replaces_spaces() {
        assert_eq!(sample_user().full_name(), "Samuel+G+Dotson");
    }

    #[test]
    fn test_personal_data_is_url_ready() {
        let data = sample_user().personal_data();
        assert_eq!(data.reason, "Academic+research");
        assert_eq!(data.affiliation, "University+of+Illinois");
        assert_eq!(data.mailing_list, "false");
        assert_eq!(data.api_key, "DEMO_KEY");
    }

    #[test]
    fn test_missing_fields_are_reported() {
        assert!(!sample_user().warn_missing_fields());
        let anonymous = User {
            api_key: "DEMO_KEY".to_string(),
            ..User::default()
        };
        assert!(anonymous.warn_missing_fields());
    }

    #[test]
    fn test_profile_round_trips_through_json() -> Result<(), NrelError> {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("user.json");
        let user = sample_user();
        user.save(&path)?;
        assert_eq!(User::from_file(&path)?, user);
        Ok(())
    }

    #[test]
    fn test_missing_profile_is_read_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let err = User::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, NrelError::ProfileRead(_, _)));
    }
}
