use bson::{oid::ObjectId, DateTime};
use chrono::NaiveDate;

use crate::{
    db::Store,
    error::ApiError,
    middleware::auth_context::Session,
    models::{
        hotel::HotelSelection,
        itinerary::{self, Activity, NewActivity},
        trip::{NewTrip, Trip, TripChanges, TripView, DEFAULT_PEOPLE_COUNT},
    },
};

const TRIP_NOT_FOUND: &str = "Trip not found";

fn trip_not_found() -> ApiError {
    ApiError::not_found(TRIP_NOT_FOUND)
}

pub async fn list_trips_for_owner<S: Store>(
    store: &S,
    session: &Session,
) -> Result<Vec<TripView>, ApiError> {
    let trips = store.find_trips_by_owner(&session.user_id).await?;
    Ok(trips
        .into_iter()
        .map(|trip| TripView::new(trip, Some(&session.user_id)))
        .collect())
}

pub async fn create_trip<S: Store>(
    store: &S,
    session: &Session,
    input: NewTrip,
) -> Result<TripView, ApiError> {
    let destination = input.destination.trim().to_string();
    if destination.is_empty() {
        return Err(ApiError::validation("Destination is required"));
    }

    let people_count = input
        .people_count
        .filter(|count| *count > 0)
        .and_then(|count| u32::try_from(count).ok())
        .unwrap_or(DEFAULT_PEOPLE_COUNT);

    let mut trip = Trip::new(
        session.user_id,
        destination,
        input.start_date,
        input.end_date,
        people_count,
        DateTime::now(),
    );
    let id = store.insert_trip(&trip).await?;
    trip.id = Some(id);

    log::info!("User {} created trip {}", session.user_id, id);
    Ok(TripView::new(trip, Some(&session.user_id)))
}

/// Owners always see their trip. Anyone else, signed in or not, only sees public ones.
pub async fn get_trip<S: Store>(
    store: &S,
    trip_id: &ObjectId,
    requester: Option<&ObjectId>,
) -> Result<TripView, ApiError> {
    let trip = store.find_trip(trip_id).await?.ok_or_else(trip_not_found)?;

    let is_owner = requester.is_some_and(|id| trip.is_owned_by(id));
    if !is_owner && !trip.is_public {
        return Err(ApiError::Forbidden("This trip is private".to_string()));
    }

    Ok(TripView::new(trip, requester))
}

/// Field-level merge: every field present in `changes` replaces the stored
/// value wholesale. Concurrent writers to the same field: last write wins.
pub async fn update_trip<S: Store>(
    store: &S,
    session: &Session,
    trip_id: &ObjectId,
    changes: TripChanges,
) -> Result<TripView, ApiError> {
    load_owned_trip(store, session, trip_id).await?;
    let changes = validate_changes(changes)?;
    apply_changes(store, session, trip_id, &changes).await
}

pub async fn add_hotel<S: Store>(
    store: &S,
    session: &Session,
    trip_id: &ObjectId,
    selection: HotelSelection,
) -> Result<TripView, ApiError> {
    let trip = load_owned_trip(store, session, trip_id).await?;

    let booking = selection.into_booking();
    booking.validate().map_err(ApiError::Validation)?;

    let mut hotels = trip.hotels;
    hotels.push(booking);

    let changes = TripChanges {
        hotels: Some(hotels),
        ..Default::default()
    };
    apply_changes(store, session, trip_id, &changes).await
}

/// Out-of-range indexes leave the trip untouched.
pub async fn remove_hotel<S: Store>(
    store: &S,
    session: &Session,
    trip_id: &ObjectId,
    index: usize,
) -> Result<TripView, ApiError> {
    let trip = load_owned_trip(store, session, trip_id).await?;
    if index >= trip.hotels.len() {
        return Ok(TripView::new(trip, Some(&session.user_id)));
    }

    let mut hotels = trip.hotels;
    hotels.remove(index);

    let changes = TripChanges {
        hotels: Some(hotels),
        ..Default::default()
    };
    apply_changes(store, session, trip_id, &changes).await
}

pub async fn add_activity<S: Store>(
    store: &S,
    session: &Session,
    trip_id: &ObjectId,
    input: NewActivity,
) -> Result<TripView, ApiError> {
    let trip = load_owned_trip(store, session, trip_id).await?;

    let date = input
        .date
        .ok_or_else(|| ApiError::validation("Activity date is required"))?;
    let activity = Activity::new(input.time, input.description.trim().to_string(), input.cost);
    activity.validate().map_err(ApiError::Validation)?;

    let mut days = trip.itinerary;
    itinerary::add_activity(&mut days, date, activity);

    let changes = TripChanges {
        itinerary: Some(days),
        ..Default::default()
    };
    apply_changes(store, session, trip_id, &changes).await
}

/// Unknown day or index leaves the trip untouched.
pub async fn remove_activity<S: Store>(
    store: &S,
    session: &Session,
    trip_id: &ObjectId,
    date: NaiveDate,
    index: usize,
) -> Result<TripView, ApiError> {
    let mut trip = load_owned_trip(store, session, trip_id).await?;
    if !itinerary::remove_activity(&mut trip.itinerary, date, index) {
        return Ok(TripView::new(trip, Some(&session.user_id)));
    }

    let changes = TripChanges {
        itinerary: Some(trip.itinerary),
        ..Default::default()
    };
    apply_changes(store, session, trip_id, &changes).await
}

async fn load_owned_trip<S: Store>(
    store: &S,
    session: &Session,
    trip_id: &ObjectId,
) -> Result<Trip, ApiError> {
    let trip = store.find_trip(trip_id).await?.ok_or_else(trip_not_found)?;
    if !trip.is_owned_by(&session.user_id) {
        log::warn!("User {} tried to modify trip {}", session.user_id, trip_id);
        return Err(ApiError::Forbidden("Only the owner can modify this trip".to_string()));
    }
    Ok(trip)
}

async fn apply_changes<S: Store>(
    store: &S,
    session: &Session,
    trip_id: &ObjectId,
    changes: &TripChanges,
) -> Result<TripView, ApiError> {
    // The owner filter is re-applied by the store, so a trip that vanished
    // between load and write surfaces as 404 rather than a silent no-op.
    let trip = store
        .update_trip(trip_id, &session.user_id, changes)
        .await?
        .ok_or_else(trip_not_found)?;
    Ok(TripView::new(trip, Some(&session.user_id)))
}

/// Rejects malformed fields and brings the embedded arrays back to their
/// invariants: one day per date, activities sorted by time.
pub fn validate_changes(mut changes: TripChanges) -> Result<TripChanges, ApiError> {
    if let Some(destination) = changes.destination.as_mut() {
        *destination = destination.trim().to_string();
        if destination.is_empty() {
            return Err(ApiError::validation("Destination cannot be empty"));
        }
    }

    if let Some(count) = changes.people_count {
        if count < 1 || count > i64::from(u32::MAX) {
            return Err(ApiError::validation("peopleCount must be at least 1"));
        }
    }

    if let Some(status) = changes.status.as_mut() {
        *status = status.trim().to_string();
        if status.is_empty() {
            return Err(ApiError::validation("Status cannot be empty"));
        }
    }

    if let Some(hotels) = changes.hotels.as_ref() {
        for hotel in hotels {
            hotel.validate().map_err(ApiError::Validation)?;
        }
    }

    if let Some(days) = changes.itinerary.take() {
        let days = itinerary::normalize(days);
        for activity in days.iter().flat_map(|day| day.activities.iter()) {
            activity.validate().map_err(ApiError::Validation)?;
        }
        changes.itinerary = Some(days);
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes(json: &str) -> TripChanges {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_validate_changes_normalizes_itinerary() {
        let validated = validate_changes(changes(
            r#"{"itinerary":[
                {"date":"2025-03-02","activities":[{"time":"09:00","description":"Museum"}]},
                {"date":"2025-03-02T10:00:00Z","activities":[{"time":"07:00","description":"Breakfast"}]}
            ]}"#,
        ))
        .unwrap();

        let days = validated.itinerary.unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].activities[0].description, "Breakfast");
        assert_eq!(days[0].activities[1].description, "Museum");
    }

    #[test]
    fn test_validate_changes_rejects_bad_input() {
        assert!(validate_changes(changes(r#"{"destination":"  "}"#)).is_err());
        assert!(validate_changes(changes(r#"{"peopleCount":0}"#)).is_err());
        assert!(validate_changes(changes(r#"{"hotels":[{"name":""}]}"#)).is_err());
        assert!(validate_changes(changes(
            r#"{"itinerary":[{"date":"2025-03-02","activities":[{"time":"9am","description":"x"}]}]}"#
        ))
        .is_err());
    }

    #[test]
    fn test_validate_changes_leaves_absent_fields_absent() {
        let validated = validate_changes(changes(r#"{"isPublic":true}"#)).unwrap();
        assert_eq!(validated.is_public, Some(true));
        assert!(validated.hotels.is_none());
        assert!(validated.itinerary.is_none());
        assert!(validated.destination.is_none());
    }
}
