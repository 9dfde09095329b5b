use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::deserialize_optional_date;

pub const DEFAULT_CURRENCY: &str = "PLN";
pub const MAX_HOTEL_RATING: f64 = 5.0;

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// A hotel stay embedded in a trip. `price` is the total for the whole stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBooking {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_in: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_out: Option<NaiveDate>,
}

impl HotelBooking {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Hotel name is required".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("Hotel price must be >= 0 for {}", self.name));
        }
        if !(0.0..=MAX_HOTEL_RATING).contains(&self.rating) {
            return Err(format!("Hotel rating must be between 0 and 5 for {}", self.name));
        }
        Ok(())
    }
}

/// A priced search result the owner picked, with optional stay dates.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSelection {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub price_per_night: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub check_in: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub check_out: Option<NaiveDate>,
}

impl HotelSelection {
    /// Nights between check-in and check-out, order-insensitive.
    pub fn nights(&self) -> Option<i64> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some((check_out - check_in).num_days().abs()),
            _ => None,
        }
    }

    /// Total price: nightly rate x max(1, nights), or the bare rate when dates are missing.
    pub fn total_price(&self) -> f64 {
        match self.nights() {
            Some(nights) => self.price_per_night * nights.max(1) as f64,
            None => self.price_per_night,
        }
    }

    pub fn into_booking(self) -> HotelBooking {
        let price = self.total_price();
        HotelBooking {
            name: self.name,
            address: self.address,
            price,
            currency: self.currency,
            rating: self.rating,
            image: self.image,
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }
}

pub fn hotels_cost(hotels: &[HotelBooking]) -> f64 {
    hotels.iter().map(|hotel| hotel.price).sum()
}
