use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Scoring service request
// ============================================================================

/// Named-feature mapping sent to the scoring service's `/predict` endpoint
///
/// Field names on the wire are the exact column names the model was trained on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRequest {
    /// Date of birth formatted as MM/DD/YYYY
    #[serde(rename = "Traveler DOB")]
    pub traveler_dob: String,
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "Duration (days)")]
    pub duration_days: i32,
    #[serde(rename = "Traveler gender")]
    pub traveler_gender: String,
    #[serde(rename = "Traveler nationality")]
    pub traveler_nationality: String,
    #[serde(rename = "Accommodation type")]
    pub accommodation_type: String,
    #[serde(rename = "Accommodation cost")]
    pub accommodation_cost: i32,
    #[serde(rename = "Transportation type")]
    pub transportation_type: String,
    #[serde(rename = "Transportation cost")]
    pub transportation_cost: i32,
    /// Destination the model should generate a counterfactual explanation for
    #[serde(rename = "generate_cf_for")]
    pub target_destination: String,
}

// ============================================================================
// Scoring service response
// ============================================================================

/// Confidence label attached to a prediction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Thresholds: above 0.7 is high, above 0.4 is medium
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.7 {
            Confidence::High
        } else if probability > 0.4 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// One scored destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    /// 1-based rank
    pub rank: u32,
    /// Destination name, matched exactly against stored destinations
    pub destination: String,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explanation: String,
    /// Feature-attribution weights, passed through untouched
    #[serde(default)]
    pub shap_details: Value,
}

impl Prediction {
    /// The label sent by the service, or one derived from the probability
    pub fn confidence(&self) -> Confidence {
        self.confidence
            .unwrap_or_else(|| Confidence::from_probability(self.probability))
    }
}

/// Treats an explicit `null` the same as a missing string
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Why a response could not be turned into predictions
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PredictionDecodeError {
    #[error("response has no predictions field")]
    Missing,

    #[error("predictions do not match the expected schema: {0}")]
    Schema(String),

    #[error("prediction for {destination} has rank {rank}, ranks start at 1")]
    InvalidRank { destination: String, rank: u32 },

    #[error("prediction for {destination} has probability {probability} outside [0, 1]")]
    InvalidProbability {
        destination: String,
        probability: f64,
    },
}

/// Envelope returned by the scoring service (or synthesized locally)
///
/// `predictions` is kept untyped until [`ModelResponse::decode_predictions`]
/// runs, so that a structurally broken body can be told apart from an
/// unsuccessful one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelResponse {
    #[serde(default)]
    pub status: String,
    /// Free-form; only `predictions` is decoded strictly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

impl ModelResponse {
    /// Builds a successful response around already-typed predictions
    pub fn success(predictions: &[Prediction], model_info: Option<Value>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: None,
            predictions: serde_json::to_value(predictions).ok(),
            model_info,
            timestamp: Some(Value::String(Utc::now().to_rfc3339())),
        }
    }

    /// Builds the synthetic error response used instead of propagating failures
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: Some(Value::String(message.into())),
            predictions: Some(Value::Array(Vec::new())),
            model_info: None,
            timestamp: Some(Value::String(Utc::now().to_rfc3339())),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// The message as text, whatever JSON type the service sent
    pub fn message_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Strictly decodes the predictions field
    ///
    /// Either every prediction is well-formed or the whole response is rejected.
    pub fn decode_predictions(&self) -> Result<Vec<Prediction>, PredictionDecodeError> {
        let raw = self
            .predictions
            .as_ref()
            .ok_or(PredictionDecodeError::Missing)?;

        let predictions: Vec<Prediction> = serde_json::from_value(raw.clone())
            .map_err(|e| PredictionDecodeError::Schema(e.to_string()))?;

        for prediction in &predictions {
            if prediction.rank == 0 {
                return Err(PredictionDecodeError::InvalidRank {
                    destination: prediction.destination.clone(),
                    rank: prediction.rank,
                });
            }
            if !(0.0..=1.0).contains(&prediction.probability) {
                return Err(PredictionDecodeError::InvalidProbability {
                    destination: prediction.destination.clone(),
                    probability: prediction.probability,
                });
            }
        }

        Ok(predictions)
    }
}
