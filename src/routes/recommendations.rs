use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::DestinationRecommendation,
    routes::AppState,
    services::RecommendationOutcome,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(rename = "userId")]
    pub user_id: i32,
}

impl RecommendationQuery {
    fn from_extracted(query: Result<Query<Self>, QueryRejection>) -> AppResult<i32> {
        let Query(query) = query.map_err(|e| AppError::InvalidInput(e.body_text()))?;
        if query.user_id <= 0 {
            return Err(AppError::InvalidInput(format!(
                "userId must be a positive integer, got {}",
                query.user_id
            )));
        }
        Ok(query.user_id)
    }
}

/// Outcome of one pipeline run, including which fallback produced it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationReport {
    pub user_id: i32,
    pub source: &'static str,
    pub reason: Value,
    pub recommendations: Vec<DestinationRecommendation>,
}

impl RecommendationReport {
    fn new(user_id: i32, outcome: RecommendationOutcome) -> Self {
        let source = outcome.source();
        let (recommendations, reason) = match outcome {
            RecommendationOutcome::Ok(list) => (list, Value::Null),
            RecommendationOutcome::Degraded(list, reason) => {
                (list, serde_json::to_value(reason).unwrap_or(Value::Null))
            }
            RecommendationOutcome::Empty(reason) => {
                (Vec::new(), serde_json::to_value(reason).unwrap_or(Value::Null))
            }
        };

        Self {
            user_id,
            source,
            reason,
            recommendations,
        }
    }
}

/// `GET /recommendations?userId=`
pub async fn personalized(
    State(state): State<AppState>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<Vec<DestinationRecommendation>>> {
    let user_id = RecommendationQuery::from_extracted(query)?;
    let recommendations = state
        .recommendations
        .get_personalized_recommendations(user_id)
        .await;
    Ok(Json(recommendations))
}

/// `GET /recommendations/details?userId=`
pub async fn details(
    State(state): State<AppState>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationReport>> {
    let user_id = RecommendationQuery::from_extracted(query)?;
    let outcome = state.recommendations.recommend(user_id).await;
    Ok(Json(RecommendationReport::new(user_id, outcome)))
}

/// `GET /recommendations/model/health`
pub async fn model_health(State(state): State<AppState>) -> Json<Value> {
    let available = state.recommendations.model_available().await;
    Json(json!({
        "available": available,
        "model": state.recommendations.model_name(),
    }))
}
