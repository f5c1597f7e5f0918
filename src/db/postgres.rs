use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};

use crate::{
    db::{DestinationStore, ProfileStore},
    error::AppResult,
    models::{Country, Destination, Preference, User},
};

/// Creates a PostgreSQL connection pool and applies pending migrations
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// PostgreSQL-backed store for users, preferences and destinations
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Citizenships of a user in the order they were added
    async fn load_citizenships(&self, user_id: i32) -> AppResult<Vec<Country>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name, c.country_code, c.continent_id, ct.name AS continent_name
            FROM user_citizenships uc
            JOIN countries c ON c.id = uc.country_id
            LEFT JOIN continents ct ON ct.id = c.continent_id
            WHERE uc.user_id = $1
            ORDER BY uc.position, c.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(country_from_row).collect()
    }

    async fn load_activities(&self, destination_id: i32) -> AppResult<Vec<String>> {
        let activities = sqlx::query_scalar::<_, String>(
            r#"
            SELECT activity
            FROM destination_activities
            WHERE destination_id = $1
            ORDER BY activity
            "#,
        )
        .bind(destination_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    async fn hydrate_destination(&self, row: &PgRow) -> AppResult<Destination> {
        let mut destination = destination_from_row(row)?;
        destination.popular_activities = self.load_activities(destination.id).await?;
        Ok(destination)
    }
}

/// Parses an optional TEXT enum column, ignoring values this build doesn't know
fn parse_enum<T: std::str::FromStr>(row: &PgRow, column: &str) -> AppResult<Option<T>> {
    let raw: Option<String> = row.try_get(column)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

fn country_from_row(row: &PgRow) -> AppResult<Country> {
    Ok(Country {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        country_code: row.try_get("country_code")?,
        continent_id: row.try_get("continent_id")?,
        continent_name: row.try_get("continent_name")?,
    })
}

fn destination_from_row(row: &PgRow) -> AppResult<Destination> {
    Ok(Destination {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        country_id: row.try_get("country_id")?,
        climate: parse_enum(row, "climate")?,
        popular_activities: Vec::new(),
        image_url: row.try_get("image_url")?,
        travel_advisory: row.try_get("travel_advisory")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
    })
}

fn preference_from_row(row: &PgRow) -> AppResult<Preference> {
    Ok(Preference {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        accommodation_budget: row.try_get("accommodation_budget")?,
        transportation_budget: row.try_get("transportation_budget")?,
        total_budget: row.try_get("total_budget")?,
        preferred_climate: parse_enum(row, "preferred_climate")?,
        preferred_travel_season: parse_enum(row, "preferred_travel_season")?,
        preferred_accommodation: parse_enum(row, "preferred_accommodation")?,
        avg_travel_duration: row.try_get("avg_travel_duration")?,
        transport_preference: parse_enum(row, "transport_preference")?,
        data_sharing: row.try_get("data_sharing")?,
    })
}

const DESTINATION_COLUMNS: &str = "id, name, description, country_id, climate, image_url, \
     travel_advisory, latitude, longitude";

#[async_trait::async_trait]
impl ProfileStore for PgStore {
    async fn find_user(&self, user_id: i32) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, gender, date_of_birth
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let citizenships = self.load_citizenships(user_id).await?;

        Ok(Some(User {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            gender: parse_enum(&row, "gender")?,
            dob: row.try_get("date_of_birth")?,
            citizenships,
        }))
    }

    async fn find_preference_by_user(&self, user_id: i32) -> AppResult<Option<Preference>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, accommodation_budget, transportation_budget, total_budget,
                   preferred_climate, preferred_travel_season, preferred_accommodation,
                   avg_travel_duration, transport_preference, data_sharing
            FROM preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(preference_from_row).transpose()
    }
}

#[async_trait::async_trait]
impl DestinationStore for PgStore {
    async fn find_destination_by_name(&self, name: &str) -> AppResult<Option<Destination>> {
        let query = format!(
            "SELECT {} FROM destinations WHERE name = $1 ORDER BY id LIMIT 1",
            DESTINATION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate_destination(&row).await?)),
            None => Ok(None),
        }
    }

    async fn all_destinations(&self) -> AppResult<Vec<Destination>> {
        let query = format!("SELECT {} FROM destinations ORDER BY id", DESTINATION_COLUMNS);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut destinations = Vec::with_capacity(rows.len());
        for row in &rows {
            destinations.push(self.hydrate_destination(row).await?);
        }

        tracing::debug!(count = destinations.len(), "Loaded all destinations");

        Ok(destinations)
    }

    async fn find_country(&self, country_id: i32) -> AppResult<Option<Country>> {
        let row = sqlx::query(
            r#"
            SELECT c.id, c.name, c.country_code, c.continent_id, ct.name AS continent_name
            FROM countries c
            LEFT JOIN continents ct ON ct.id = c.continent_id
            WHERE c.id = $1
            "#,
        )
        .bind(country_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(country_from_row).transpose()
    }

    async fn average_rating(&self, destination_id: i32) -> AppResult<Option<f64>> {
        let average = sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT AVG(rating)::float8
            FROM travel_history
            WHERE destination_id = $1 AND rating IS NOT NULL
            "#,
        )
        .bind(destination_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn test_store() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        PgStore::new(create_pool(&url, 2).await.expect("Failed to connect"))
    }

    async fn insert_country(pool: &PgPool, continent_id: i32, name: &str, code: &str) -> i32 {
        sqlx::query_scalar(
            "INSERT INTO countries (name, country_code, continent_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(name)
        .bind(code)
        .bind(continent_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_citizenships_follow_position() {
        let store = test_store().await;
        let pool = &store.pool;
        let tag = Uuid::new_v4().simple().to_string();

        let europe: i32 =
            sqlx::query_scalar("INSERT INTO continents (name) VALUES ('Europe') RETURNING id")
                .fetch_one(pool)
                .await
                .unwrap();
        let france = insert_country(pool, europe, "France", "FRA").await;
        let italy = insert_country(pool, europe, "Italy", "ITA").await;

        let user_id: i32 = sqlx::query_scalar(
            "INSERT INTO users (first_name, last_name, email, gender, date_of_birth) \
             VALUES ('Ana', 'Rossi', $1, 'FEMALE', '1990-04-02') RETURNING id",
        )
        .bind(format!("{}@example.com", tag))
        .fetch_one(pool)
        .await
        .unwrap();

        // Lower country id goes second
        for (country_id, position) in [(france, 1), (italy, 0)] {
            sqlx::query("INSERT INTO user_citizenships (user_id, country_id, position) VALUES ($1, $2, $3)")
                .bind(user_id)
                .bind(country_id)
                .bind(position)
                .execute(pool)
                .await
                .unwrap();
        }

        let user = store.find_user(user_id).await.unwrap().unwrap();
        let names: Vec<&str> = user.citizenships.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Italy", "France"]);
        assert_eq!(user.primary_citizenship().unwrap().continent_name.as_deref(), Some("Europe"));
        assert_eq!(user.dob, chrono::NaiveDate::from_ymd_opt(1990, 4, 2));

        assert!(store.find_user(-1).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_average_rating_skips_unrated_trips() {
        let store = test_store().await;
        let pool = &store.pool;
        let tag = Uuid::new_v4().simple().to_string();

        let asia: i32 =
            sqlx::query_scalar("INSERT INTO continents (name) VALUES ('Asia') RETURNING id")
                .fetch_one(pool)
                .await
                .unwrap();
        let japan = insert_country(pool, asia, "Japan", "JPN").await;

        let mut destination_ids = Vec::new();
        for name in ["Kyoto", "Nara"] {
            let id: i32 = sqlx::query_scalar(
                "INSERT INTO destinations (name, country_id, climate) VALUES ($1, $2, 'CONTINENTAL') RETURNING id",
            )
            .bind(format!("{} {}", name, tag))
            .bind(japan)
            .fetch_one(pool)
            .await
            .unwrap();
            destination_ids.push(id);
        }
        let (rated, unrated) = (destination_ids[0], destination_ids[1]);

        let user_id: i32 = sqlx::query_scalar(
            "INSERT INTO users (first_name, last_name, email) VALUES ('Ken', 'Sato', $1) RETURNING id",
        )
        .bind(format!("{}@example.com", tag))
        .fetch_one(pool)
        .await
        .unwrap();

        for (destination_id, rating) in [(rated, Some(4)), (rated, Some(5)), (rated, None), (unrated, None)] {
            sqlx::query(
                "INSERT INTO travel_history (user_id, destination_id, visit_start_date, visit_end_date, rating) \
                 VALUES ($1, $2, '2024-03-01', '2024-03-08', $3)",
            )
            .bind(user_id)
            .bind(destination_id)
            .bind(rating)
            .execute(pool)
            .await
            .unwrap();
        }

        assert_eq!(store.average_rating(rated).await.unwrap(), Some(4.5));
        assert_eq!(store.average_rating(unrated).await.unwrap(), None);

        let kyoto = store
            .find_destination_by_name(&format!("Kyoto {}", tag))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kyoto.id, rated);
        assert_eq!(kyoto.climate, Some(crate::models::Climate::Continental));
        assert!(store.find_destination_by_name(&format!("kyoto {}", tag)).await.unwrap().is_none());
    }
}
