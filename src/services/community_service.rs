use crate::{
    db::Store,
    error::ApiError,
    models::{
        community::{CommunityFilter, PublicTripRow, TripSummary},
        trip::TripView,
    },
};

/// Most recent public trips considered per feed request.
pub const PUBLIC_FEED_LIMIT: i64 = 50;

pub async fn list_public_trips<S: Store>(
    store: &S,
    filter: &CommunityFilter,
    requester: Option<&bson::oid::ObjectId>,
) -> Result<Vec<TripSummary>, ApiError> {
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let min_rating = filter.min_rating.as_deref().and_then(parse_min_rating);

    let rows = store.find_public_trips(search, PUBLIC_FEED_LIMIT).await?;
    log::debug!(
        "Community feed: {} public trips matched search {:?}",
        rows.len(),
        search
    );

    Ok(summarize(rows, min_rating, requester))
}

/// A usable rating threshold: finite and above zero. Anything else means "no filter".
pub fn parse_min_rating(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// Arithmetic mean of the ratings, 0 when there are none.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    sum as f64 / ratings.len() as f64
}

/// Attaches the rating aggregate to every row and drops rows below `min_rating`.
/// Input order (newest first) is preserved.
pub fn summarize(
    rows: Vec<PublicTripRow>,
    min_rating: Option<f64>,
    requester: Option<&bson::oid::ObjectId>,
) -> Vec<TripSummary> {
    rows.into_iter()
        .filter_map(|row| {
            let average = average_rating(&row.ratings);
            if min_rating.is_some_and(|min| average < min) {
                return None;
            }
            Some(TripSummary {
                review_count: row.ratings.len(),
                average_rating: average,
                user: row.owner,
                trip: TripView::new(row.trip, requester),
            })
        })
        .collect()
}
