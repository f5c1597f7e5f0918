use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::{DestinationStore, ProfileStore},
    error::AppResult,
    models::{Country, Destination, Preference, User},
};

/// In-memory store used for demo mode and tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

/// Inner state that can be modified
#[derive(Default)]
struct MemoryStoreInner {
    users: HashMap<i32, User>,
    /// Keyed by user id
    preferences: HashMap<i32, Preference>,
    destinations: BTreeMap<i32, Destination>,
    countries: HashMap<i32, Country>,
    /// Travel-history ratings keyed by destination id
    ratings: HashMap<i32, Vec<i32>>,
}

impl MemoryStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user);
    }

    /// Stores a preference, replacing any previous one for the same user
    pub async fn insert_preference(&self, preference: Preference) {
        let mut inner = self.inner.write().await;
        inner.preferences.insert(preference.user_id, preference);
    }

    pub async fn insert_country(&self, country: Country) {
        let mut inner = self.inner.write().await;
        inner.countries.insert(country.id, country);
    }

    pub async fn insert_destination(&self, destination: Destination) {
        let mut inner = self.inner.write().await;
        inner.destinations.insert(destination.id, destination);
    }

    /// Records a 1..5 star travel-history rating
    pub async fn add_rating(&self, destination_id: i32, rating: i32) {
        let mut inner = self.inner.write().await;
        inner.ratings.entry(destination_id).or_default().push(rating);
    }

    pub async fn destination_count(&self) -> usize {
        self.inner.read().await.destinations.len()
    }

    pub async fn country_by_name(&self, name: &str) -> Option<Country> {
        let inner = self.inner.read().await;
        inner.countries.values().find(|c| c.name == name).cloned()
    }
}

#[async_trait::async_trait]
impl ProfileStore for MemoryStore {
    async fn find_user(&self, user_id: i32) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&user_id).cloned())
    }

    async fn find_preference_by_user(&self, user_id: i32) -> AppResult<Option<Preference>> {
        let inner = self.inner.read().await;
        Ok(inner.preferences.get(&user_id).cloned())
    }
}

#[async_trait::async_trait]
impl DestinationStore for MemoryStore {
    async fn find_destination_by_name(&self, name: &str) -> AppResult<Option<Destination>> {
        let inner = self.inner.read().await;
        Ok(inner.destinations.values().find(|d| d.name == name).cloned())
    }

    async fn all_destinations(&self) -> AppResult<Vec<Destination>> {
        let inner = self.inner.read().await;
        Ok(inner.destinations.values().cloned().collect())
    }

    async fn find_country(&self, country_id: i32) -> AppResult<Option<Country>> {
        let inner = self.inner.read().await;
        Ok(inner.countries.get(&country_id).cloned())
    }

    async fn average_rating(&self, destination_id: i32) -> AppResult<Option<f64>> {
        let inner = self.inner.read().await;
        let average = inner
            .ratings
            .get(&destination_id)
            .filter(|ratings| !ratings.is_empty())
            .map(|ratings| ratings.iter().sum::<i32>() as f64 / ratings.len() as f64);
        Ok(average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(id: i32, name: &str) -> Destination {
        Destination {
            id,
            name: name.to_string(),
            description: None,
            country_id: 1,
            climate: None,
            popular_activities: vec![],
            image_url: None,
            travel_advisory: None,
            latitude: None,
            longitude: None,
        }
    }

    #[tokio::test]
    async fn test_find_destination_by_name_is_exact() {
        let store = MemoryStore::new();
        store.insert_destination(destination(1, "Paris")).await;

        assert!(store.find_destination_by_name("Paris").await.unwrap().is_some());
        assert!(store.find_destination_by_name("paris").await.unwrap().is_none());
        assert!(store.find_destination_by_name("Paris ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_all_destinations_ordered_by_id() {
        let store = MemoryStore::new();
        store.insert_destination(destination(3, "Rome")).await;
        store.insert_destination(destination(1, "Paris")).await;
        store.insert_destination(destination(2, "Tokyo")).await;

        let names: Vec<String> = store
            .all_destinations()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Paris", "Tokyo", "Rome"]);
    }

    #[tokio::test]
    async fn test_average_rating() {
        let store = MemoryStore::new();
        assert_eq!(store.average_rating(1).await.unwrap(), None);

        store.add_rating(1, 4).await;
        store.add_rating(1, 5).await;
        assert_eq!(store.average_rating(1).await.unwrap(), Some(4.5));
    }

    #[tokio::test]
    async fn test_preference_replaced_per_user() {
        let store = MemoryStore::new();
        store
            .insert_preference(Preference {
                id: 1,
                user_id: 9,
                avg_travel_duration: Some(5),
                ..Default::default()
            })
            .await;
        store
            .insert_preference(Preference {
                id: 2,
                user_id: 9,
                avg_travel_duration: Some(12),
                ..Default::default()
            })
            .await;

        let preference = store.find_preference_by_user(9).await.unwrap().unwrap();
        assert_eq!(preference.avg_travel_duration, Some(12));
    }

    #[test]
    fn test_country_by_name() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store
                .insert_country(Country {
                    id: 4,
                    name: "Japan".to_string(),
                    country_code: "JPN".to_string(),
                    continent_id: 3,
                    continent_name: Some("Asia".to_string()),
                })
                .await;

            assert_eq!(store.country_by_name("Japan").await.unwrap().id, 4);
            assert!(store.country_by_name("Nippon").await.is_none());
        });
    }
}
