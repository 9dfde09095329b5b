use actix_web::{web, HttpResponse};

use super::parse_object_id;
use crate::{
    db::Store, error::ApiError, middleware::auth_context::Session, models::review::NewReview,
    services::review_service,
};

/*
    GET /trips/{id}/reviews
*/
pub async fn list<S: Store>(
    store: web::Data<S>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    // an unknown trip simply has no reviews
    let Ok(trip_id) = parse_object_id(&path, "Trip") else {
        return Ok(HttpResponse::Ok().json(Vec::<()>::new()));
    };
    let reviews = review_service::list_reviews(store.get_ref(), &trip_id).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/*
    POST /trips/{id}/reviews
*/
pub async fn create<S: Store>(
    store: web::Data<S>,
    session: Session,
    path: web::Path<String>,
    input: web::Json<NewReview>,
) -> Result<HttpResponse, ApiError> {
    let trip_id = parse_object_id(&path, "Trip")?;
    let review =
        review_service::add_review(store.get_ref(), &session, &trip_id, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(review))
}
