/// Scoring model abstraction
///
/// The recommendation pipeline only needs two things from a model: whether it
/// is reachable, and a scored response for a feature request. Neither call
/// fails; transport and decoding problems surface as an error-status
/// [`ModelResponse`] so the caller can fall back instead of aborting.
use crate::models::{FeatureRequest, ModelResponse};

pub mod http;

pub use http::HttpScoringClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ScoringModel: Send + Sync {
    /// Health check, `false` on any failure
    async fn is_available(&self) -> bool;

    /// Score a feature request
    async fn predict(&self, features: &FeatureRequest) -> ModelResponse;

    /// Short identifier used in logs and health output
    fn name(&self) -> &'static str;
}
