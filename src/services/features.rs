/// Feature-request builder
///
/// Converts a user profile and an optional preference record into the named
/// features the scoring model was trained on. Enum values are translated to
/// the model's vocabulary through a JSON mapping resource; whenever a value is
/// missing, or the resource has no entry for it, a fixed default is used
/// instead, so building a request never fails.
use anyhow::Context;
use chrono::{Months, NaiveDate, Utc};
use serde::Deserialize;
use std::{collections::HashMap, path::Path};

use crate::models::{FeatureRequest, Preference, User};

pub const DEFAULT_TARGET_DESTINATION: &str = "New York";
pub const DEFAULT_AGE_YEARS: u32 = 30;
pub const DEFAULT_SEASON: &str = "Summer";
pub const DEFAULT_DURATION_DAYS: i32 = 7;
pub const DEFAULT_GENDER: &str = "Male";
pub const DEFAULT_NATIONALITY: &str = "American";
pub const DEFAULT_ACCOMMODATION_TYPE: &str = "Hotel";
pub const DEFAULT_ACCOMMODATION_COST: i32 = 1200;
pub const DEFAULT_TRANSPORTATION_TYPE: &str = "Flight";
pub const DEFAULT_TRANSPORTATION_COST: i32 = 800;

const DOB_FORMAT: &str = "%m/%d/%Y";

const BUNDLED_MAPPINGS: &str = include_str!("../../resources/feature_mappings.json");

/// Per-enum vocabulary tables, keyed by the stored enum name
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EnumMappings {
    #[serde(default)]
    pub season: HashMap<String, String>,
    #[serde(default)]
    pub gender: HashMap<String, String>,
    #[serde(default)]
    pub accommodation: HashMap<String, String>,
    #[serde(default)]
    pub transport: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DefaultValues {
    pub season: Option<String>,
    pub nationality: Option<String>,
}

/// Vocabulary mapping resource
///
/// Read once at startup and shared read-only afterwards. An empty mapping is
/// valid: every lookup then resolves to its hard-coded default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FeatureMappings {
    #[serde(default)]
    pub enum_mappings: EnumMappings,
    /// Country name to nationality adjective
    #[serde(default)]
    pub nationality_mappings: HashMap<String, String>,
    #[serde(default)]
    pub default_values: DefaultValues,
}

impl FeatureMappings {
    /// Mapping compiled into the binary
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_MAPPINGS).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Bundled feature mappings are invalid");
            Self::default()
        })
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reads and parses the mapping resource at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading feature mappings from {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("parsing feature mappings from {}", path.display()))
    }

    /// Loads the mapping resource, degrading to an empty mapping on failure
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        match Self::load(path) {
            Ok(mappings) => {
                tracing::info!(
                    path = %path.display(),
                    nationalities = mappings.nationality_mappings.len(),
                    "Loaded feature mappings"
                );
                mappings
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %format!("{:#}", e),
                    "Failed to load feature mappings, falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

/// Builds [`FeatureRequest`]s from stored profile data
#[derive(Debug, Clone, Copy)]
pub struct FeatureRequestBuilder<'a> {
    mappings: &'a FeatureMappings,
}

impl<'a> FeatureRequestBuilder<'a> {
    pub fn new(mappings: &'a FeatureMappings) -> Self {
        Self { mappings }
    }

    /// Builds a request relative to today's date
    pub fn build(
        &self,
        user: &User,
        preference: Option<&Preference>,
        target_destination: Option<&str>,
    ) -> FeatureRequest {
        self.build_at(user, preference, target_destination, Utc::now().date_naive())
    }

    /// Builds a request relative to `today`, which only affects a synthesized date of birth
    pub fn build_at(
        &self,
        user: &User,
        preference: Option<&Preference>,
        target_destination: Option<&str>,
        today: NaiveDate,
    ) -> FeatureRequest {
        let dob = user.dob.unwrap_or_else(|| default_dob(today));

        let request = FeatureRequest {
            traveler_dob: dob.format(DOB_FORMAT).to_string(),
            season: self.season(preference),
            duration_days: preference
                .and_then(|p| p.avg_travel_duration)
                .unwrap_or(DEFAULT_DURATION_DAYS),
            traveler_gender: self.gender(user),
            traveler_nationality: self.nationality(user),
            accommodation_type: self.accommodation(preference),
            accommodation_cost: preference
                .and_then(|p| p.accommodation_budget)
                .unwrap_or(DEFAULT_ACCOMMODATION_COST),
            transportation_type: self.transport(preference),
            transportation_cost: preference
                .and_then(|p| p.transportation_budget)
                .unwrap_or(DEFAULT_TRANSPORTATION_COST),
            target_destination: target_destination
                .unwrap_or(DEFAULT_TARGET_DESTINATION)
                .to_string(),
        };

        tracing::info!(
            user_id = user.id,
            has_preference = preference.is_some(),
            season = %request.season,
            nationality = %request.traveler_nationality,
            "Built feature request"
        );

        request
    }

    fn season(&self, preference: Option<&Preference>) -> String {
        match preference.and_then(|p| p.preferred_travel_season) {
            Some(season) => lookup(&self.mappings.enum_mappings.season, season.as_str(), DEFAULT_SEASON),
            None => self
                .mappings
                .default_values
                .season
                .clone()
                .unwrap_or_else(|| DEFAULT_SEASON.to_string()),
        }
    }

    fn gender(&self, user: &User) -> String {
        match user.gender {
            Some(gender) => lookup(&self.mappings.enum_mappings.gender, gender.as_str(), DEFAULT_GENDER),
            None => DEFAULT_GENDER.to_string(),
        }
    }

    fn nationality(&self, user: &User) -> String {
        match user.primary_citizenship() {
            Some(country) => lookup(
                &self.mappings.nationality_mappings,
                &country.name,
                DEFAULT_NATIONALITY,
            ),
            None => self
                .mappings
                .default_values
                .nationality
                .clone()
                .unwrap_or_else(|| DEFAULT_NATIONALITY.to_string()),
        }
    }

    fn accommodation(&self, preference: Option<&Preference>) -> String {
        match preference.and_then(|p| p.preferred_accommodation) {
            Some(kind) => lookup(
                &self.mappings.enum_mappings.accommodation,
                kind.as_str(),
                DEFAULT_ACCOMMODATION_TYPE,
            ),
            None => DEFAULT_ACCOMMODATION_TYPE.to_string(),
        }
    }

    fn transport(&self, preference: Option<&Preference>) -> String {
        match preference.and_then(|p| p.transport_preference) {
            Some(kind) => lookup(
                &self.mappings.enum_mappings.transport,
                kind.as_str(),
                DEFAULT_TRANSPORTATION_TYPE,
            ),
            None => DEFAULT_TRANSPORTATION_TYPE.to_string(),
        }
    }
}

fn lookup(table: &HashMap<String, String>, key: &str, fallback: &str) -> String {
    table
        .get(key)
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

fn default_dob(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(DEFAULT_AGE_YEARS * 12))
        .unwrap_or(today)
}
