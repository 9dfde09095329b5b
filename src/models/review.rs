use bson::{oid::ObjectId, DateTime};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::user::UserProfile;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// One reviewer's rating of one trip. (userId, tripId) is unique.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub trip_id: ObjectId,
    pub rating: i32,
    pub comment: String,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Debug, Deserialize)]
pub struct NewReview {
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: String,
    pub trip_id: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: Option<chrono::DateTime<Utc>>,
    pub user: Option<UserProfile>,
}

impl ReviewView {
    pub fn new(review: Review, user: Option<UserProfile>) -> Self {
        Self {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            trip_id: review.trip_id.to_hex(),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at.map(|at| at.to_chrono()),
            user,
        }
    }
}
