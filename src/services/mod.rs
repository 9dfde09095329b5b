pub mod account_service;
pub mod community_service;
pub mod copy_service;
pub mod hotel_search_service;
pub mod review_service;
pub mod trip_service;
