use serde::{Deserialize, Serialize};

use super::{
    trip::{Trip, TripView},
    user::UserProfile,
};

/// One joined row of the public feed, before rating aggregation:
/// the trip, its owner's public profile and the raw review ratings.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicTripRow {
    pub trip: Trip,
    pub owner: UserProfile,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

/// Query string of `GET /trips/public`. Kept as raw strings so a malformed
/// `minRating` is ignored instead of rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityFilter {
    pub search: Option<String>,
    pub min_rating: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    #[serde(flatten)]
    pub trip: TripView,
    pub user: UserProfile,
    pub average_rating: f64,
    pub review_count: usize,
}
