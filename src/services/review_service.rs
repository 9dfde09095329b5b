use std::collections::HashMap;

use bson::{oid::ObjectId, DateTime};

use crate::{
    db::{Store, StoreError},
    error::ApiError,
    middleware::auth_context::Session,
    models::review::{NewReview, Review, ReviewView, MAX_RATING, MIN_RATING},
};

/// A whole number of stars within bounds.
pub fn parse_rating(raw: Option<f64>) -> Result<i32, ApiError> {
    let invalid = || {
        ApiError::validation(format!(
            "Rating must be a whole number between {} and {}",
            MIN_RATING, MAX_RATING
        ))
    };
    let value = raw.ok_or_else(invalid)?;
    if value.fract() != 0.0 || value < f64::from(MIN_RATING) || value > f64::from(MAX_RATING) {
        return Err(invalid());
    }
    Ok(value as i32)
}

fn already_reviewed() -> ApiError {
    ApiError::Conflict("You have already reviewed this trip".to_string())
}

pub async fn add_review<S: Store>(
    store: &S,
    session: &Session,
    trip_id: &ObjectId,
    input: NewReview,
) -> Result<ReviewView, ApiError> {
    let rating = parse_rating(input.rating)?;
    let comment = input
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::validation("Comment is required"))?;

    let trip = store
        .find_trip(trip_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Trip not found"))?;
    if trip.is_owned_by(&session.user_id) {
        return Err(ApiError::Forbidden(
            "You cannot review your own trip".to_string(),
        ));
    }

    let reviewer = store
        .find_user_profiles(&[session.user_id])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if store.find_review(&session.user_id, trip_id).await?.is_some() {
        return Err(already_reviewed());
    }

    let now = DateTime::now();
    let mut review = Review {
        id: None,
        user_id: session.user_id,
        trip_id: *trip_id,
        rating,
        comment,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let id = store.insert_review(&review).await.map_err(|err| match err {
        // lost a race with a concurrent review by the same user
        StoreError::DuplicateKey => already_reviewed(),
        other => other.into(),
    })?;
    review.id = Some(id);

    log::info!("User {} reviewed trip {} ({} stars)", session.user_id, trip_id, rating);
    Ok(ReviewView::new(review, Some(reviewer)))
}

/// Reviews of a trip, newest first, each with its author's profile when the
/// author still exists.
pub async fn list_reviews<S: Store>(
    store: &S,
    trip_id: &ObjectId,
) -> Result<Vec<ReviewView>, ApiError> {
    let reviews = store.find_reviews_for_trip(trip_id).await?;

    let mut author_ids: Vec<ObjectId> = reviews.iter().map(|r| r.user_id).collect();
    author_ids.sort();
    author_ids.dedup();

    let profiles: HashMap<ObjectId, _> = store
        .find_user_profiles(&author_ids)
        .await?
        .into_iter()
        .map(|profile| (profile.id, profile))
        .collect();

    Ok(reviews
        .into_iter()
        .map(|review| {
            let author = profiles.get(&review.user_id).cloned();
            ReviewView::new(review, author)
        })
        .collect())
}
