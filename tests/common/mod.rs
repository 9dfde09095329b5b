#![allow(dead_code)]

use std::sync::Mutex;

use actix_web::{web, App};
use bson::{oid::ObjectId, DateTime};
use chrono::NaiveDate;

use vacation_planner_api::{
    db::{Store, StoreError},
    middleware::auth::AuthConfig,
    models::{
        community::PublicTripRow,
        review::Review,
        trip::{Trip, TripChanges},
        user::{User, UserProfile},
    },
    routes,
};

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "password123";

#[derive(Default)]
struct State {
    users: Vec<User>,
    trips: Vec<Trip>,
    reviews: Vec<Review>,
}

/// In-memory stand-in for MongoDB with the same unique constraints,
/// sort orders and joins.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    offline: bool,
    without_unique_indexes: bool,
}

impl MemoryStore {
    /// A store whose ping fails, for health checks.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    /// A store that accepts duplicate (user, trip) reviews, as a database
    /// whose indexes were never created would.
    pub fn without_unique_indexes() -> Self {
        Self {
            without_unique_indexes: true,
            ..Default::default()
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn trip(&self, id: &ObjectId) -> Option<Trip> {
        self.state().trips.iter().find(|t| t.id.as_ref() == Some(id)).cloned()
    }

    pub fn trip_count(&self) -> usize {
        self.state().trips.len()
    }

    pub fn review_count(&self) -> usize {
        self.state().reviews.len()
    }
}

fn profile(user: &User) -> Option<UserProfile> {
    Some(UserProfile {
        id: user.id?,
        name: user.name.clone(),
        image: user.image.clone(),
    })
}

/// Newest first. Equal timestamps fall back to reverse insertion order.
fn newest_first<T>(items: Vec<T>, created_at: impl Fn(&T) -> Option<DateTime>) -> Vec<T> {
    let mut items: Vec<T> = items.into_iter().rev().collect();
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Backend("offline".to_string()));
        }
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<ObjectId, StoreError> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateKey);
        }
        let id = ObjectId::new();
        let mut user = user.clone();
        user.id = Some(id);
        state.users.push(user);
        Ok(id)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.state().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_profiles(&self, ids: &[ObjectId]) -> Result<Vec<UserProfile>, StoreError> {
        Ok(self
            .state()
            .users
            .iter()
            .filter(|u| u.id.is_some_and(|id| ids.contains(&id)))
            .filter_map(profile)
            .collect())
    }

    async fn insert_trip(&self, trip: &Trip) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        let mut trip = trip.clone();
        trip.id = Some(id);
        self.state().trips.push(trip);
        Ok(id)
    }

    async fn find_trip(&self, id: &ObjectId) -> Result<Option<Trip>, StoreError> {
        Ok(self.trip(id))
    }

    async fn find_trips_by_owner(&self, owner_id: &ObjectId) -> Result<Vec<Trip>, StoreError> {
        let mut trips: Vec<Trip> = self
            .state()
            .trips
            .iter()
            .filter(|t| t.is_owned_by(owner_id))
            .cloned()
            .collect();
        trips.sort_by_key(|t| t.start_date);
        Ok(trips)
    }

    async fn update_trip(
        &self,
        id: &ObjectId,
        owner_id: &ObjectId,
        changes: &TripChanges,
    ) -> Result<Option<Trip>, StoreError> {
        let mut state = self.state();
        let Some(trip) = state
            .trips
            .iter_mut()
            .find(|t| t.id.as_ref() == Some(id) && t.is_owned_by(owner_id))
        else {
            return Ok(None);
        };

        if let Some(destination) = &changes.destination {
            trip.destination = destination.clone();
        }
        if let Some(start_date) = changes.start_date {
            trip.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            trip.end_date = end_date;
        }
        if let Some(people_count) = changes.people_count {
            trip.people_count = people_count as u32;
        }
        if let Some(hotels) = &changes.hotels {
            trip.hotels = hotels.clone();
        }
        if let Some(itinerary) = &changes.itinerary {
            trip.itinerary = itinerary.clone();
        }
        if let Some(is_public) = changes.is_public {
            trip.is_public = is_public;
        }
        if let Some(status) = &changes.status {
            trip.status = status.clone();
        }
        trip.updated_at = Some(DateTime::now());

        Ok(Some(trip.clone()))
    }

    async fn find_public_trips(
        &self,
        destination: Option<&str>,
        limit: i64,
    ) -> Result<Vec<PublicTripRow>, StoreError> {
        let state = self.state();
        let needle = destination.map(str::to_lowercase);

        let matching: Vec<Trip> = state
            .trips
            .iter()
            .filter(|t| t.is_public)
            .filter(|t| {
                needle
                    .as_ref()
                    .map_or(true, |n| t.destination.to_lowercase().contains(n.as_str()))
            })
            .cloned()
            .collect();

        Ok(newest_first(matching, |t| t.created_at)
            .into_iter()
            .take(limit as usize)
            .filter_map(|trip| {
                let owner = state
                    .users
                    .iter()
                    .find(|u| u.id == Some(trip.user_id))
                    .and_then(profile)?;
                let ratings = state
                    .reviews
                    .iter()
                    .filter(|r| Some(r.trip_id) == trip.id)
                    .map(|r| r.rating)
                    .collect();
                Some(PublicTripRow {
                    trip,
                    owner,
                    ratings,
                })
            })
            .collect())
    }

    async fn insert_review(&self, review: &Review) -> Result<ObjectId, StoreError> {
        let mut state = self.state();
        if !self.without_unique_indexes
            && state
                .reviews
                .iter()
                .any(|r| r.user_id == review.user_id && r.trip_id == review.trip_id)
        {
            return Err(StoreError::DuplicateKey);
        }
        let id = ObjectId::new();
        let mut review = review.clone();
        review.id = Some(id);
        state.reviews.push(review);
        Ok(id)
    }

    async fn find_review(
        &self,
        user_id: &ObjectId,
        trip_id: &ObjectId,
    ) -> Result<Option<Review>, StoreError> {
        Ok(self
            .state()
            .reviews
            .iter()
            .find(|r| &r.user_id == user_id && &r.trip_id == trip_id)
            .cloned())
    }

    async fn find_reviews_for_trip(&self, trip_id: &ObjectId) -> Result<Vec<Review>, StoreError> {
        let reviews: Vec<Review> = self
            .state()
            .reviews
            .iter()
            .filter(|r| &r.trip_id == trip_id)
            .cloned()
            .collect();
        Ok(newest_first(reviews, |r| r.created_at))
    }
}

pub struct TestUser {
    pub id: ObjectId,
    pub email: String,
    pub name: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

pub struct TestApp {
    pub store: web::Data<MemoryStore>,
    pub auth: web::Data<AuthConfig>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::default())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self {
            store: web::Data::new(store),
            auth: web::Data::new(AuthConfig::new(TEST_SECRET, 1)),
        }
    }

    pub fn create_app(&self) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.store.clone())
            .app_data(self.auth.clone())
            .configure(routes::configure::<MemoryStore>)
    }

    /// Inserts a user straight into the store and signs a token for them.
    pub async fn seed_user(&self, name: &str, email: &str) -> TestUser {
        let now = DateTime::now();
        let user = User {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
            password: bcrypt::hash(TEST_PASSWORD, 4).unwrap(),
            image: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let id = self.store.insert_user(&user).await.unwrap();
        let token = self.auth.issue_token(&id, email, name).unwrap();

        TestUser {
            id,
            email: email.to_string(),
            name: name.to_string(),
            token,
        }
    }

    pub async fn seed_trip(&self, owner: &TestUser, destination: &str, is_public: bool) -> ObjectId {
        let mut trip = Trip::new(
            owner.id,
            destination.to_string(),
            Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
            Some(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()),
            2,
            DateTime::now(),
        );
        trip.is_public = is_public;
        self.store.insert_trip(&trip).await.unwrap()
    }

    pub async fn seed_review(&self, author: &TestUser, trip_id: ObjectId, rating: i32) {
        let now = DateTime::now();
        let review = Review {
            id: None,
            user_id: author.id,
            trip_id,
            rating,
            comment: "Seeded".to_string(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.store.insert_review(&review).await.unwrap();
    }
}
