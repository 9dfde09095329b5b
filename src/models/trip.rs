use bson::{oid::ObjectId, DateTime};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    calendar::{deserialize_date_change, deserialize_optional_date},
    hotel::{hotels_cost, HotelBooking},
    itinerary::{activities_cost, ItineraryDay},
    nullable::deserialize_null_as_empty,
};

pub const DEFAULT_STATUS: &str = "planning";
pub const DEFAULT_PEOPLE_COUNT: u32 = 1;
/// Upper bound on the generated day list, so a typo'd year can't explode a response.
pub const MAX_LISTED_DAYS: usize = 366;

fn default_people_count() -> u32 {
    DEFAULT_PEOPLE_COUNT
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

/// The trip aggregate: the stored document with its embedded hotels and itinerary.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub destination: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_people_count")]
    pub people_count: u32,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub hotels: Vec<HotelBooking>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_trip_id: Option<ObjectId>,
    #[serde(default = "default_status")]
    pub status: String,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

impl Trip {
    pub fn new(
        owner_id: ObjectId,
        destination: String,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        people_count: u32,
        now: DateTime,
    ) -> Self {
        Self {
            id: None,
            user_id: owner_id,
            destination,
            start_date,
            end_date,
            people_count,
            hotels: Vec::new(),
            itinerary: Vec::new(),
            is_public: false,
            original_trip_id: None,
            status: default_status(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        &self.user_id == user_id
    }

    /// Every calendar day of the trip, inclusive. Reversed dates are swapped.
    pub fn days(&self) -> Vec<NaiveDate> {
        let (Some(start), Some(end)) = (self.start_date, self.end_date) else {
            return Vec::new();
        };
        let (first, last) = if start <= end { (start, end) } else { (end, start) };
        first
            .iter_days()
            .take_while(|day| *day <= last)
            .take(MAX_LISTED_DAYS)
            .collect()
    }

    pub fn budget(&self) -> TripBudget {
        let hotels = hotels_cost(&self.hotels);
        let activities = activities_cost(&self.itinerary);
        TripBudget {
            hotels,
            activities,
            total: hotels + activities,
        }
    }

    /// A private, freshly-timestamped copy owned by `owner_id`, pointing back at `source_id`.
    pub fn saved_copy(&self, source_id: ObjectId, owner_id: ObjectId, now: DateTime) -> Trip {
        Trip {
            id: None,
            user_id: owner_id,
            is_public: false,
            original_trip_id: Some(source_id),
            status: default_status(),
            created_at: Some(now),
            updated_at: Some(now),
            ..self.clone()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    #[serde(default)]
    pub destination: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    pub people_count: Option<i64>,
}

/// A partial update. Every present field replaces the stored one wholesale;
/// absent fields are left alone. Serializes straight into a `$set` document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_date_change",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "deserialize_date_change",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotels: Option<Vec<HotelBooking>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<Vec<ItineraryDay>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripBudget {
    pub hotels: f64,
    pub activities: f64,
    pub total: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripView {
    pub id: String,
    pub user_id: String,
    pub destination: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub people_count: u32,
    pub hotels: Vec<HotelBooking>,
    pub itinerary: Vec<ItineraryDay>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_trip_id: Option<String>,
    pub status: String,
    pub created_at: Option<chrono::DateTime<Utc>>,
    pub updated_at: Option<chrono::DateTime<Utc>>,
    pub days: Vec<NaiveDate>,
    pub budget: TripBudget,
    pub is_owner: bool,
}

impl TripView {
    pub fn new(trip: Trip, requester: Option<&ObjectId>) -> Self {
        let days = trip.days();
        let budget = trip.budget();
        let is_owner = requester.is_some_and(|id| trip.is_owned_by(id));

        Self {
            id: trip.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: trip.user_id.to_hex(),
            destination: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            people_count: trip.people_count,
            hotels: trip.hotels,
            itinerary: trip.itinerary,
            is_public: trip.is_public,
            original_trip_id: trip.original_trip_id.map(|id| id.to_hex()),
            status: trip.status,
            created_at: trip.created_at.map(|at| at.to_chrono()),
            updated_at: trip.updated_at.map(|at| at.to_chrono()),
            days,
            budget,
            is_owner,
        }
    }
}
