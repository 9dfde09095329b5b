pub mod calendar;
pub mod community;
pub mod hotel;
pub mod itinerary;
pub mod nullable;
pub mod review;
pub mod trip;
pub mod user;
