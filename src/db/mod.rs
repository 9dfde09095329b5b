use bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use thiserror::Error;

use crate::models::{
    community::PublicTripRow,
    review::Review,
    trip::{Trip, TripChanges},
    user::{User, UserProfile},
};

pub mod mongo;

/// Mongo's duplicate key error code.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("duplicate key")]
    DuplicateKey,
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. }))
                if *code == DUPLICATE_KEY_CODE =>
            {
                StoreError::DuplicateKey
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<bson::de::Error> for StoreError {
    fn from(err: bson::de::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Persistence seam for users, trips and reviews.
///
/// Implementations must enforce unique emails and a unique (user, trip) pair
/// per review, reporting violations as [`StoreError::DuplicateKey`].
pub trait Store {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert_user(&self, user: &User) -> Result<ObjectId, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Profiles only, credentials are never loaded. Unknown ids are skipped.
    async fn find_user_profiles(&self, ids: &[ObjectId]) -> Result<Vec<UserProfile>, StoreError>;

    async fn insert_trip(&self, trip: &Trip) -> Result<ObjectId, StoreError>;
    async fn find_trip(&self, id: &ObjectId) -> Result<Option<Trip>, StoreError>;
    /// Ascending by start date; trips without one come first.
    async fn find_trips_by_owner(&self, owner_id: &ObjectId) -> Result<Vec<Trip>, StoreError>;
    /// Atomically sets every present field and bumps `updatedAt`, but only when
    /// `owner_id` owns the trip. `None` when nothing matched.
    async fn update_trip(
        &self,
        id: &ObjectId,
        owner_id: &ObjectId,
        changes: &TripChanges,
    ) -> Result<Option<Trip>, StoreError>;
    /// Public trips, newest first, at most `limit`, optionally filtered by a
    /// case-insensitive destination substring. Trips whose owner no longer
    /// exists are dropped.
    async fn find_public_trips(
        &self,
        destination: Option<&str>,
        limit: i64,
    ) -> Result<Vec<PublicTripRow>, StoreError>;

    async fn insert_review(&self, review: &Review) -> Result<ObjectId, StoreError>;
    async fn find_review(
        &self,
        user_id: &ObjectId,
        trip_id: &ObjectId,
    ) -> Result<Option<Review>, StoreError>;
    /// Newest first.
    async fn find_reviews_for_trip(&self, trip_id: &ObjectId) -> Result<Vec<Review>, StoreError>;
}
