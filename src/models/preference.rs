use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Preferred travel season
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "SPRING",
            Season::Summer => "SUMMER",
            Season::Autumn => "AUTUMN",
            Season::Winter => "WINTER",
        }
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SPRING" => Ok(Season::Spring),
            "SUMMER" => Ok(Season::Summer),
            "AUTUMN" => Ok(Season::Autumn),
            "WINTER" => Ok(Season::Winter),
            other => Err(format!("unknown season: {}", other)),
        }
    }
}

/// Preferred accommodation type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccommodationType {
    Hotel,
    Airbnb,
    Lodge,
}

impl AccommodationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccommodationType::Hotel => "HOTEL",
            AccommodationType::Airbnb => "AIRBNB",
            AccommodationType::Lodge => "LODGE",
        }
    }
}

impl FromStr for AccommodationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HOTEL" => Ok(AccommodationType::Hotel),
            "AIRBNB" => Ok(AccommodationType::Airbnb),
            "LODGE" => Ok(AccommodationType::Lodge),
            other => Err(format!("unknown accommodation type: {}", other)),
        }
    }
}

/// Preferred mode of transport
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportType {
    Flights,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Flights => "FLIGHTS",
        }
    }
}

impl FromStr for TransportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FLIGHTS" => Ok(TransportType::Flights),
            other => Err(format!("unknown transport type: {}", other)),
        }
    }
}

/// Climate classification of a destination
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Climate {
    Tropical,
    Dry,
    Continental,
    Polar,
    Mediterranean,
    Arid,
    SemiArid,
    Monsoon,
    Tundra,
}

impl Climate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Climate::Tropical => "TROPICAL",
            Climate::Dry => "DRY",
            Climate::Continental => "CONTINENTAL",
            Climate::Polar => "POLAR",
            Climate::Mediterranean => "MEDITERRANEAN",
            Climate::Arid => "ARID",
            Climate::SemiArid => "SEMI_ARID",
            Climate::Monsoon => "MONSOON",
            Climate::Tundra => "TUNDRA",
        }
    }
}

impl FromStr for Climate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TROPICAL" => Ok(Climate::Tropical),
            "DRY" => Ok(Climate::Dry),
            "CONTINENTAL" => Ok(Climate::Continental),
            "POLAR" => Ok(Climate::Polar),
            "MEDITERRANEAN" => Ok(Climate::Mediterranean),
            "ARID" => Ok(Climate::Arid),
            "SEMI_ARID" => Ok(Climate::SemiArid),
            "MONSOON" => Ok(Climate::Monsoon),
            "TUNDRA" => Ok(Climate::Tundra),
            other => Err(format!("unknown climate: {}", other)),
        }
    }
}

/// A user's stored travel preferences
///
/// Every field is optional; the feature builder fills gaps with defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preference {
    pub id: i32,
    pub user_id: i32,
    pub accommodation_budget: Option<i32>,
    pub transportation_budget: Option<i32>,
    pub total_budget: Option<i32>,
    pub preferred_climate: Option<Climate>,
    pub preferred_travel_season: Option<Season>,
    pub preferred_accommodation: Option<AccommodationType>,
    pub avg_travel_duration: Option<i32>,
    pub transport_preference: Option<TransportType>,
    #[serde(default)]
    pub data_sharing: bool,
}
