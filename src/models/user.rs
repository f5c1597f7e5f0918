use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Gender as stored on the user profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Stored name, also the key used by the feature vocabulary tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// A country, resolved together with the name of its continent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Country {
    pub id: i32,
    pub name: String,
    pub country_code: String,
    pub continent_id: i32,
    pub continent_name: Option<String>,
}

/// A registered traveller
///
/// Only the fields the recommendation pipeline reads are carried here;
/// credentials live with the authentication collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    /// Citizenships in insertion order; the first one is the primary citizenship
    #[serde(default)]
    pub citizenships: Vec<Country>,
}

impl User {
    pub fn primary_citizenship(&self) -> Option<&Country> {
        self.citizenships.first()
    }
}
