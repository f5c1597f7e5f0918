use chrono::NaiveDate;

use crate::{
    db::MemoryStore,
    error::{AppError, AppResult},
    models::{Climate, Country, Destination, Gender, Preference, Season, TransportType, User},
    services::validation::{
        validate_budget_range, validate_business_rule, validate_email_format, BusinessRule,
    },
};

const CONTINENTS: &[(i32, &str)] = &[
    (1, "North America"),
    (2, "Europe"),
    (3, "Asia"),
    (4, "Africa"),
    (5, "South America"),
    (6, "Oceania"),
    (7, "Antarctica"),
];

/// (id, name, ISO code, continent id)
const COUNTRIES: &[(i32, &str, &str, i32)] = &[
    (1, "United States", "USA", 1),
    (2, "Canada", "CAN", 1),
    (3, "Mexico", "MEX", 1),
    (4, "United Kingdom", "GBR", 2),
    (5, "France", "FRA", 2),
    (6, "Germany", "DEU", 2),
    (7, "Italy", "ITA", 2),
    (8, "Spain", "ESP", 2),
    (9, "Netherlands", "NLD", 2),
    (10, "Japan", "JPN", 3),
    (11, "China", "CHN", 3),
    (12, "India", "IND", 3),
    (13, "Thailand", "THA", 3),
    (14, "United Arab Emirates", "ARE", 3),
    (15, "Australia", "AUS", 6),
];

struct DestinationSeed {
    name: &'static str,
    country: &'static str,
    description: &'static str,
    climate: Climate,
    activities: &'static [&'static str],
    coordinates: (f64, f64),
    ratings: &'static [i32],
}

const DESTINATIONS: &[DestinationSeed] = &[
    DestinationSeed {
        name: "New York City",
        country: "United States",
        description: "The city that never sleeps, famous for its skyline, Broadway shows, and cultural diversity.",
        climate: Climate::Continental,
        activities: &["Broadway", "Museums", "Central Park"],
        coordinates: (40.7128, -74.0060),
        ratings: &[5, 4, 4],
    },
    DestinationSeed {
        name: "Los Angeles",
        country: "United States",
        description: "City of Angels, home to Hollywood and beautiful beaches.",
        climate: Climate::Mediterranean,
        activities: &["Beaches", "Studio Tours"],
        coordinates: (34.0522, -118.2437),
        ratings: &[],
    },
    DestinationSeed {
        name: "Paris",
        country: "France",
        description: "The City of Light, famous for its art, fashion, and cuisine.",
        climate: Climate::Continental,
        activities: &["Museums", "Cafes", "River Cruises"],
        coordinates: (48.8566, 2.3522),
        ratings: &[5, 4],
    },
    DestinationSeed {
        name: "Tokyo",
        country: "Japan",
        description: "Modern metropolis blending traditional culture with cutting-edge technology.",
        climate: Climate::Continental,
        activities: &["Temples", "Food Markets", "Shopping"],
        coordinates: (35.6762, 139.6503),
        ratings: &[5, 5, 4],
    },
    DestinationSeed {
        name: "London",
        country: "United Kingdom",
        description: "Historic capital on the Thames with royal palaces and world-class theatre.",
        climate: Climate::Continental,
        activities: &["Theatre", "Museums"],
        coordinates: (51.5074, -0.1278),
        ratings: &[4],
    },
    DestinationSeed {
        name: "Barcelona",
        country: "Spain",
        description: "Seaside city known for Gaudi's architecture and lively tapas bars.",
        climate: Climate::Mediterranean,
        activities: &["Architecture", "Beaches", "Tapas"],
        coordinates: (41.3874, 2.1686),
        ratings: &[],
    },
    DestinationSeed {
        name: "Rome",
        country: "Italy",
        description: "The Eternal City, layered with ancient ruins, piazzas, and trattorias.",
        climate: Climate::Mediterranean,
        activities: &["Ancient Sites", "Food Tours"],
        coordinates: (41.9028, 12.4964),
        ratings: &[5, 3],
    },
    DestinationSeed {
        name: "Amsterdam",
        country: "Netherlands",
        description: "Canal-lined city of bicycles, gabled houses, and Dutch masters.",
        climate: Climate::Continental,
        activities: &["Canals", "Cycling", "Museums"],
        coordinates: (52.3676, 4.9041),
        ratings: &[],
    },
    DestinationSeed {
        name: "Sydney",
        country: "Australia",
        description: "Harbour city with an iconic opera house and golden surf beaches.",
        climate: Climate::Mediterranean,
        activities: &["Surfing", "Harbour Cruises"],
        coordinates: (-33.8688, 151.2093),
        ratings: &[4, 5],
    },
    DestinationSeed {
        name: "Dubai",
        country: "United Arab Emirates",
        description: "Desert metropolis of record-breaking towers and luxury shopping.",
        climate: Climate::Arid,
        activities: &["Desert Safari", "Shopping"],
        coordinates: (25.2048, 55.2708),
        ratings: &[],
    },
    DestinationSeed {
        name: "Bangkok",
        country: "Thailand",
        description: "Vibrant capital of ornate temples, floating markets, and street food.",
        climate: Climate::Tropical,
        activities: &["Temples", "Street Food", "Markets"],
        coordinates: (13.7563, 100.5018),
        ratings: &[3, 4],
    },
];

/// Loads the demo dataset into an in-memory store
///
/// Skipped when the store already holds destinations. Profiles are validated
/// before they are stored, so a bad fixture fails loudly instead of producing
/// odd feature requests later.
pub async fn seed_demo_data(store: &MemoryStore) -> AppResult<()> {
    if store.destination_count().await > 0 {
        tracing::info!("Demo data already present, skipping seed");
        return Ok(());
    }

    tracing::info!("Loading demo data...");

    for &(id, name, code, continent_id) in COUNTRIES {
        let continent_name = CONTINENTS
            .iter()
            .find(|(continent, _)| *continent == continent_id)
            .map(|(_, name)| name.to_string());

        store
            .insert_country(Country {
                id,
                name: name.to_string(),
                country_code: code.to_string(),
                continent_id,
                continent_name,
            })
            .await;
    }

    for (index, seed) in DESTINATIONS.iter().enumerate() {
        let id = index as i32 + 1;
        let country = store.country_by_name(seed.country).await.ok_or_else(|| {
            AppError::Internal(format!("demo destination {} has unknown country {}", seed.name, seed.country))
        })?;

        store
            .insert_destination(Destination {
                id,
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                country_id: country.id,
                climate: Some(seed.climate),
                popular_activities: seed.activities.iter().map(|a| a.to_string()).collect(),
                image_url: None,
                travel_advisory: None,
                latitude: Some(seed.coordinates.0),
                longitude: Some(seed.coordinates.1),
            })
            .await;

        for &rating in seed.ratings {
            store.add_rating(id, rating).await;
        }
    }

    let usa = store
        .country_by_name("United States")
        .await
        .ok_or_else(|| AppError::Internal("demo country United States missing".to_string()))?;

    let john = User {
        id: 1,
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "test@example.com".to_string(),
        gender: Some(Gender::Male),
        dob: NaiveDate::from_ymd_opt(1990, 1, 1),
        citizenships: vec![usa.clone()],
    };
    let jane = User {
        id: 2,
        first_name: "Jane".to_string(),
        last_name: "Smith".to_string(),
        email: "jane@example.com".to_string(),
        gender: Some(Gender::Female),
        dob: NaiveDate::from_ymd_opt(1985, 5, 15),
        citizenships: vec![usa],
    };

    for (preference_id, user) in [(1, john), (2, jane)] {
        let preference = demo_preference(preference_id, user.id);
        check_profile(&user, &preference)?;

        tracing::info!(user_id = user.id, email = %user.email, "Created demo user");
        store.insert_user(user).await;
        store.insert_preference(preference).await;
    }

    tracing::info!(
        countries = COUNTRIES.len(),
        destinations = DESTINATIONS.len(),
        "Demo data loaded"
    );

    Ok(())
}

fn demo_preference(id: i32, user_id: i32) -> Preference {
    Preference {
        id,
        user_id,
        accommodation_budget: Some(2000),
        transportation_budget: Some(1500),
        total_budget: Some(5000),
        preferred_climate: Some(Climate::Mediterranean),
        preferred_travel_season: Some(Season::Spring),
        preferred_accommodation: None,
        avg_travel_duration: Some(7),
        transport_preference: Some(TransportType::Flights),
        data_sharing: true,
    }
}

fn check_profile(user: &User, preference: &Preference) -> AppResult<()> {
    if !validate_email_format(&user.email) {
        return Err(AppError::InvalidInput(format!("invalid email: {}", user.email)));
    }

    if let Some(dob) = user.dob {
        if !validate_business_rule(BusinessRule::Age(dob)) {
            return Err(AppError::InvalidInput(format!("user {} is outside the supported age range", user.id)));
        }
    }

    if let Some(total) = preference.total_budget {
        let spent = preference.accommodation_budget.unwrap_or(0)
            + preference.transportation_budget.unwrap_or(0);
        if !validate_budget_range(spent, total) {
            return Err(AppError::InvalidInput(format!(
                "budgets for user {} exceed the total of {}",
                user.id, total
            )));
        }
    }

    if let Some(days) = preference.avg_travel_duration {
        if !validate_business_rule(BusinessRule::TripDuration(days)) {
            return Err(AppError::InvalidInput(format!("invalid trip duration: {}", days)));
        }
    }

    Ok(())
}
