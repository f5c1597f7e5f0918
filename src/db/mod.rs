/// Read-side storage for the recommendation pipeline
///
/// The pipeline only ever reads: profiles and preferences on one side,
/// destinations with their country and rating data on the other. Both seams
/// are traits so the PostgreSQL store and the in-memory store are
/// interchangeable.
use crate::{
    error::AppResult,
    models::{Country, Destination, Preference, User},
};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::{create_pool, PgStore};
pub use seed::seed_demo_data;

/// Lookup of users and their stored travel preferences
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a user with their citizenships (primary citizenship first)
    async fn find_user(&self, user_id: i32) -> AppResult<Option<User>>;

    /// Fetch the preference record belonging to a user, if one exists
    async fn find_preference_by_user(&self, user_id: i32) -> AppResult<Option<Preference>>;
}

/// Lookup of destinations and the data merged into recommendations
#[async_trait::async_trait]
pub trait DestinationStore: Send + Sync {
    /// Exact, case-sensitive name match
    async fn find_destination_by_name(&self, name: &str) -> AppResult<Option<Destination>>;

    /// Every stored destination, ordered by id
    async fn all_destinations(&self) -> AppResult<Vec<Destination>>;

    /// Fetch a country together with its continent name
    async fn find_country(&self, country_id: i32) -> AppResult<Option<Country>>;

    /// Mean travel-history rating of a destination, `None` when unrated
    async fn average_rating(&self, destination_id: i32) -> AppResult<Option<f64>>;
}
