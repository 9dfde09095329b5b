use actix_web::{web, HttpResponse};

use crate::{
    db::Store, error::ApiError, middleware::auth_context::OptionalSession,
    models::community::CommunityFilter, services::community_service,
};

/*
    GET /trips/public?search=&minRating=
*/
pub async fn list_public<S: Store>(
    store: web::Data<S>,
    session: OptionalSession,
    filter: web::Query<CommunityFilter>,
) -> Result<HttpResponse, ApiError> {
    let trips =
        community_service::list_public_trips(store.get_ref(), &filter, session.user_id()).await?;
    Ok(HttpResponse::Ok().json(trips))
}
