/// Personalized destination recommendations
///
/// Pipeline: profile → feature request → scoring model → merge with stored
/// destinations. Every failure along the way degrades to a fallback instead
/// of an error:
///
/// - scoring service down, or answering with a non-success status → a
///   deterministic simulated ranking over a fixed destination pool
/// - response whose `predictions` are missing or malformed → every stored
///   destination with randomized scores, shuffled
/// - unknown user or a store failure → an empty list
///
/// [`RecommendationOutcome`] records which of these happened; callers that
/// only want the list use [`RecommendationService::get_personalized_recommendations`].
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    db::{DestinationStore, ProfileStore},
    error::AppResult,
    models::{
        Confidence, Country, Destination, DestinationRecommendation, ModelResponse, Prediction,
    },
    services::{
        features::{FeatureMappings, FeatureRequestBuilder, DEFAULT_TARGET_DESTINATION},
        scoring::ScoringModel,
    },
};

/// Destinations ranked by the simulated response, best first
pub const SIMULATED_DESTINATIONS: [&str; 10] = [
    "Paris",
    "Tokyo",
    "New York",
    "London",
    "Barcelona",
    "Rome",
    "Amsterdam",
    "Sydney",
    "Dubai",
    "Bangkok",
];

const SIMULATED_TOP_PROBABILITY: f64 = 0.9;
const SIMULATED_PROBABILITY_STEP: f64 = 0.08;
const SIMULATED_EXPLANATION: &str =
    "Recommended based on your travel preferences, demographic data, and similar user patterns.";
const SIMULATED_MODEL_NAME: &str = "Travel Destination Recommender v1.0";
const SIMULATED_MODEL_ACCURACY: f64 = 0.87;

const FALLBACK_EXPLANATION: &str = "Recommended based on your travel preferences and profile data.";
const FALLBACK_BASE_PROBABILITY: f64 = 0.5;
const FALLBACK_PROBABILITY_SPREAD: f64 = 0.3;

/// Rating reported when the rating lookup itself fails
const RATING_ON_ERROR: f64 = 4.5;

/// Why a non-empty result did not come straight from the model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DegradeReason {
    /// Health check failed, simulated response used
    ServiceUnavailable,
    /// Model answered with a non-success status, simulated response used
    ScoringFailed(String),
    /// Predictions missing or undecodable, all-destinations fallback used
    MalformedResponse(String),
}

/// Why the result is empty
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum EmptyReason {
    UserNotFound,
    StoreFailure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    Ok(Vec<DestinationRecommendation>),
    Degraded(Vec<DestinationRecommendation>, DegradeReason),
    Empty(EmptyReason),
}

impl RecommendationOutcome {
    /// Short label for logs and diagnostics
    pub fn source(&self) -> &'static str {
        match self {
            RecommendationOutcome::Ok(_) => "model",
            RecommendationOutcome::Degraded(..) => "degraded",
            RecommendationOutcome::Empty(_) => "empty",
        }
    }

    pub fn recommendations(&self) -> &[DestinationRecommendation] {
        match self {
            RecommendationOutcome::Ok(list) | RecommendationOutcome::Degraded(list, _) => list,
            RecommendationOutcome::Empty(_) => &[],
        }
    }

    pub fn into_recommendations(self) -> Vec<DestinationRecommendation> {
        match self {
            RecommendationOutcome::Ok(list) | RecommendationOutcome::Degraded(list, _) => list,
            RecommendationOutcome::Empty(_) => Vec::new(),
        }
    }
}

/// Orchestrates stores, feature building and the scoring model
#[derive(Clone)]
pub struct RecommendationService {
    profiles: Arc<dyn ProfileStore>,
    destinations: Arc<dyn DestinationStore>,
    model: Arc<dyn ScoringModel>,
    mappings: Arc<FeatureMappings>,
}

impl RecommendationService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        destinations: Arc<dyn DestinationStore>,
        model: Arc<dyn ScoringModel>,
        mappings: Arc<FeatureMappings>,
    ) -> Self {
        Self {
            profiles,
            destinations,
            model,
            mappings,
        }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    pub async fn model_available(&self) -> bool {
        self.model.is_available().await
    }

    /// Ranked recommendations for a user, empty on any unrecoverable failure
    pub async fn get_personalized_recommendations(
        &self,
        user_id: i32,
    ) -> Vec<DestinationRecommendation> {
        self.recommend(user_id).await.into_recommendations()
    }

    /// Runs the pipeline and reports which path produced the result
    #[tracing::instrument(skip(self))]
    pub async fn recommend(&self, user_id: i32) -> RecommendationOutcome {
        let outcome = match self.try_recommend(user_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(user_id, error = %e, "Store failure while building recommendations");
                RecommendationOutcome::Empty(EmptyReason::StoreFailure(e.to_string()))
            }
        };

        tracing::info!(
            user_id,
            source = outcome.source(),
            count = outcome.recommendations().len(),
            "Generated recommendations"
        );

        outcome
    }

    async fn try_recommend(&self, user_id: i32) -> AppResult<RecommendationOutcome> {
        let Some(user) = self.profiles.find_user(user_id).await? else {
            tracing::warn!(user_id, "User not found");
            return Ok(RecommendationOutcome::Empty(EmptyReason::UserNotFound));
        };

        let preference = self.profiles.find_preference_by_user(user_id).await?;
        if preference.is_none() {
            tracing::info!(user_id, "No stored preference, using defaults");
        }

        let features = FeatureRequestBuilder::new(&self.mappings).build(
            &user,
            preference.as_ref(),
            Some(DEFAULT_TARGET_DESTINATION),
        );

        let (response, degraded) = if !self.model.is_available().await {
            tracing::warn!(model = self.model.name(), "Scoring model unavailable, using simulated response");
            (simulated_response(), Some(DegradeReason::ServiceUnavailable))
        } else {
            let response = self.model.predict(&features).await;
            if response.is_success() {
                (response, None)
            } else {
                let message = response
                    .message_text()
                    .unwrap_or_else(|| format!("status {:?}", response.status));
                tracing::warn!(error = %message, "Scoring model failed, using simulated response");
                (simulated_response(), Some(DegradeReason::ScoringFailed(message)))
            }
        };

        match response.decode_predictions() {
            Ok(predictions) => {
                let recommendations = self.merge_predictions(predictions).await?;
                Ok(match degraded {
                    Some(reason) => RecommendationOutcome::Degraded(recommendations, reason),
                    None => RecommendationOutcome::Ok(recommendations),
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Malformed scoring response, recommending all destinations");
                let recommendations = self.all_destinations_fallback().await?;
                Ok(RecommendationOutcome::Degraded(
                    recommendations,
                    DegradeReason::MalformedResponse(e.to_string()),
                ))
            }
        }
    }

    /// Joins predictions with stored destinations, dropping unknown names
    async fn merge_predictions(
        &self,
        predictions: Vec<Prediction>,
    ) -> AppResult<Vec<DestinationRecommendation>> {
        let mut recommendations = Vec::with_capacity(predictions.len());

        for prediction in &predictions {
            let Some(destination) = self
                .destinations
                .find_destination_by_name(&prediction.destination)
                .await?
            else {
                tracing::warn!(destination = %prediction.destination, "Predicted destination not found, skipping");
                continue;
            };

            let country = self.destinations.find_country(destination.country_id).await?;
            let rating = self.average_rating(destination.id).await;

            recommendations.push(DestinationRecommendation::from_prediction(
                destination,
                country.as_ref(),
                rating,
                prediction,
            ));
        }

        recommendations.sort_by_key(|r| r.rank);

        Ok(recommendations)
    }

    async fn all_destinations_fallback(&self) -> AppResult<Vec<DestinationRecommendation>> {
        let destinations = self.destinations.all_destinations().await?;

        let mut resolved = Vec::with_capacity(destinations.len());
        for destination in destinations {
            let country = self.destinations.find_country(destination.country_id).await?;
            let rating = self.average_rating(destination.id).await;
            resolved.push((destination, country, rating));
        }

        Ok(randomized_recommendations(resolved))
    }

    /// Stored mean rounded to one decimal, a stable per-destination default
    /// when unrated, 4.5 when the lookup fails
    async fn average_rating(&self, destination_id: i32) -> f64 {
        match self.destinations.average_rating(destination_id).await {
            Ok(Some(average)) if average > 0.0 => round_to(average, 1),
            Ok(_) => round_to(4.0 + (destination_id.rem_euclid(10)) as f64 * 0.1, 1),
            Err(e) => {
                tracing::warn!(destination_id, error = %e, "Failed to load average rating");
                RATING_ON_ERROR
            }
        }
    }
}

/// Deterministic response used when the model cannot be consulted
pub fn simulated_response() -> ModelResponse {
    let predictions: Vec<Prediction> = SIMULATED_DESTINATIONS
        .iter()
        .enumerate()
        .map(|(i, destination)| {
            let probability = round_to(
                SIMULATED_TOP_PROBABILITY - SIMULATED_PROBABILITY_STEP * i as f64,
                4,
            );
            Prediction {
                rank: i as u32 + 1,
                destination: destination.to_string(),
                probability,
                confidence: Some(Confidence::from_probability(probability)),
                explanation: SIMULATED_EXPLANATION.to_string(),
                shap_details: json!({
                    "budget_impact": 0.3,
                    "climate_preference": 0.2,
                    "travel_style": 0.25,
                    "demographics": 0.25
                }),
            }
        })
        .collect();

    ModelResponse::success(
        &predictions,
        Some(json!({
            "name": SIMULATED_MODEL_NAME,
            "test_accuracy": SIMULATED_MODEL_ACCURACY
        })),
    )
}

/// Scores every destination uniformly in [0.5, 0.8) and shuffles the result
fn randomized_recommendations(
    resolved: Vec<(Destination, Option<Country>, f64)>,
) -> Vec<DestinationRecommendation> {
    let mut rng = rand::thread_rng();

    let mut recommendations: Vec<DestinationRecommendation> = resolved
        .into_iter()
        .enumerate()
        .map(|(i, (destination, country, rating))| {
            let probability =
                FALLBACK_BASE_PROBABILITY + rng.gen_range(0.0..FALLBACK_PROBABILITY_SPREAD);
            let prediction = Prediction {
                rank: i as u32 + 1,
                destination: destination.name.clone(),
                probability,
                confidence: Some(Confidence::from_probability(probability)),
                explanation: FALLBACK_EXPLANATION.to_string(),
                shap_details: Value::Null,
            };
            DestinationRecommendation::from_prediction(destination, country.as_ref(), rating, &prediction)
        })
        .collect();

    recommendations.shuffle(&mut rng);
    recommendations
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
