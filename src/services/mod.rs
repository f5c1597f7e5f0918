pub mod features;
pub mod recommendations;
pub mod scoring;
pub mod validation;

pub use features::{FeatureMappings, FeatureRequestBuilder};
pub use recommendations::{
    DegradeReason, EmptyReason, RecommendationOutcome, RecommendationService,
};
pub use scoring::{HttpScoringClient, ScoringModel};
