use rand::Rng;
use serde::Serialize;

use crate::models::hotel::DEFAULT_CURRENCY;

/// A generated search hit. Prices are nightly rates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelOffer {
    pub id: String,
    pub name: String,
    pub address: String,
    pub price_per_night: f64,
    pub currency: String,
    pub rating: f64,
    pub image: String,
    pub amenities: Vec<String>,
}

struct OfferTemplate {
    id: &'static str,
    name: fn(&str) -> String,
    address: fn(&str) -> String,
    base_price: u32,
    price_spread: u32,
    rating: f64,
    image: &'static str,
    amenities: &'static [&'static str],
}

const TEMPLATES: &[OfferTemplate] = &[
    OfferTemplate {
        id: "h1",
        name: |city| format!("Grand Hotel {}", city),
        address: |city| format!("City Center 15, {}", city),
        base_price: 300,
        price_spread: 500,
        rating: 5.0,
        image: "https://images.unsplash.com/photo-1566073771259-6a8506099945?auto=format&fit=crop&q=80&w=800",
        amenities: &["Spa", "Pool", "WiFi", "Restaurant"],
    },
    OfferTemplate {
        id: "h2",
        name: |city| format!("{} City Hostel", city),
        address: |city| format!("Side Street 4, {}", city),
        base_price: 50,
        price_spread: 150,
        rating: 3.0,
        image: "https://images.unsplash.com/photo-1555854743-e3c2f6a581ad?auto=format&fit=crop&q=80&w=800",
        amenities: &["WiFi", "Shared Kitchen", "Lockers"],
    },
    OfferTemplate {
        id: "h3",
        name: |city| format!("{} View Apartments", city),
        address: |city| format!("Main Square 2, {}", city),
        base_price: 200,
        price_spread: 300,
        rating: 4.5,
        image: "https://images.unsplash.com/photo-1582719508461-905c673771fd?auto=format&fit=crop&q=80&w=800",
        amenities: &["WiFi", "Breakfast", "Parking"],
    },
    OfferTemplate {
        id: "h4",
        name: |_| "Rose Garden Hotel".to_string(),
        address: |city| format!("Quiet Lane 5, {}", city),
        base_price: 100,
        price_spread: 400,
        rating: 4.0,
        image: "https://images.unsplash.com/photo-1542314831-068cd1dbfeeb?auto=format&fit=crop&q=80&w=800",
        amenities: &["Garden", "WiFi", "Concierge"],
    },
];

/// Stub search: there is no real provider behind this, offers are generated
/// from the query. A blank query yields nothing.
pub fn search_hotels(query: &str) -> Vec<HotelOffer> {
    let city = query.trim();
    if city.is_empty() {
        return Vec::new();
    }

    log::debug!("Generating hotel offers for {}", city);
    let mut rng = rand::thread_rng();

    TEMPLATES
        .iter()
        .map(|template| HotelOffer {
            id: template.id.to_string(),
            name: (template.name)(city),
            address: (template.address)(city),
            price_per_night: f64::from(template.base_price + rng.gen_range(0..template.price_spread)),
            currency: DEFAULT_CURRENCY.to_string(),
            rating: template.rating,
            image: template.image.to_string(),
            amenities: template.amenities.iter().map(|a| a.to_string()).collect(),
        })
        .collect()
}
