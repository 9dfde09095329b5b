use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, HttpRequest,
};
use bson::oid::ObjectId;

use crate::{db::Store, error::ApiError, middleware::auth::AuthMiddleware};

pub mod community;
pub mod health;
pub mod hotels;
pub mod reviews;
pub mod sessions;
pub mod trips;
pub mod users;

/// Registers every route against the store type `S`. Expects `web::Data<S>`
/// and `web::Data<AuthConfig>` to be present on the app.
pub fn configure<S: Store + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/health", web::get().to(health::health_check::<S>))
        .route("/users", web::post().to(users::register::<S>))
        .route("/sessions", web::post().to(sessions::login::<S>))
        .service(
            web::scope("/hotels")
                .wrap(AuthMiddleware)
                .route("/search", web::get().to(hotels::search)),
        )
        .service(
            web::scope("/trips")
                .route("", web::get().to(trips::list::<S>))
                .route("", web::post().to(trips::create::<S>))
                // must precede /{id}
                .route("/public", web::get().to(community::list_public::<S>))
                .route("/{id}", web::get().to(trips::get_by_id::<S>))
                .route("/{id}", web::put().to(trips::update::<S>))
                .route("/{id}/save", web::post().to(trips::save::<S>))
                .route("/{id}/hotels", web::post().to(trips::add_hotel::<S>))
                .route(
                    "/{id}/hotels/{index}",
                    web::delete().to(trips::remove_hotel::<S>),
                )
                .route("/{id}/itinerary", web::post().to(trips::add_activity::<S>))
                .route(
                    "/{id}/itinerary/{date}/{index}",
                    web::delete().to(trips::remove_activity::<S>),
                )
                .route("/{id}/reviews", web::get().to(reviews::list::<S>))
                .route("/{id}/reviews", web::post().to(reviews::create::<S>)),
        );
}

/// Unparseable ids can never match a stored document.
pub(crate) fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::not_found(format!("{} not found", what)))
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected request body: {}", err);
    ApiError::validation(format!("Invalid request body: {}", err)).into()
}

/// A path segment of the wrong type can never name an existing resource.
fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected path: {}", err);
    ApiError::not_found("Resource not found").into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected query string: {}", err);
    ApiError::validation(format!("Invalid query string: {}", err)).into()
}
