use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Climate, Confidence, Country, Prediction};

/// A stored travel destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub country_id: i32,
    pub climate: Option<Climate>,
    #[serde(default)]
    pub popular_activities: Vec<String>,
    pub image_url: Option<String>,
    pub travel_advisory: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Destination returned to the client, merged with its scoring data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DestinationRecommendation {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub country_name: Option<String>,
    pub continent_name: Option<String>,
    pub climate: Option<Climate>,
    pub popular_activities: Vec<String>,
    pub image_url: Option<String>,
    pub travel_advisory: Option<String>,
    pub average_rating: f64,
    pub is_liked: bool,
    pub is_in_bucket_list: bool,
    pub rank: u32,
    pub probability: f64,
    pub confidence: Confidence,
    pub explanation: String,
    pub shap_details: Value,
}

impl DestinationRecommendation {
    /// Merges a stored destination with its resolved country and a prediction
    pub fn from_prediction(
        destination: Destination,
        country: Option<&Country>,
        average_rating: f64,
        prediction: &Prediction,
    ) -> Self {
        Self {
            id: destination.id,
            name: destination.name,
            description: destination.description,
            country_name: country.map(|c| c.name.clone()),
            continent_name: country.and_then(|c| c.continent_name.clone()),
            climate: destination.climate,
            popular_activities: destination.popular_activities,
            image_url: destination.image_url,
            travel_advisory: destination.travel_advisory,
            average_rating,
            // Likes and bucket lists are not tracked by this service yet
            is_liked: false,
            is_in_bucket_list: false,
            rank: prediction.rank,
            probability: prediction.probability,
            confidence: prediction.confidence(),
            explanation: prediction.explanation.clone(),
            shap_details: prediction.shap_details.clone(),
        }
    }
}
