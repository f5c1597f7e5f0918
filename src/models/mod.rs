pub mod destination;
pub mod preference;
pub mod scoring;
pub mod user;

pub use destination::{Destination, DestinationRecommendation};
pub use preference::{AccommodationType, Climate, Preference, Season, TransportType};
pub use scoring::{
    Confidence, FeatureRequest, ModelResponse, Prediction, PredictionDecodeError,
};
pub use user::{Country, Gender, User};
