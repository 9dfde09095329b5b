use actix_web::{web, HttpResponse};

use super::parse_object_id;
use crate::{
    db::Store,
    error::ApiError,
    middleware::auth_context::{MaybeSession, Session},
    models::{
        calendar::parse_calendar_date,
        hotel::HotelSelection,
        itinerary::NewActivity,
        trip::{NewTrip, TripChanges},
    },
    services::{copy_service, trip_service},
};

/*
    GET /trips
*/
pub async fn list<S: Store>(store: web::Data<S>, session: Session) -> Result<HttpResponse, ApiError> {
    let trips = trip_service::list_trips_for_owner(store.get_ref(), &session).await?;
    Ok(HttpResponse::Ok().json(trips))
}

/*
    POST /trips
*/
pub async fn create<S: Store>(
    store: web::Data<S>,
    session: Session,
    input: web::Json<NewTrip>,
) -> Result<HttpResponse, ApiError> {
    let trip = trip_service::create_trip(store.get_ref(), &session, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(trip))
}

/*
    GET /trips/{id}
*/
pub async fn get_by_id<S: Store>(
    store: web::Data<S>,
    session: MaybeSession,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let trip_id = parse_object_id(&path, "Trip")?;
    let trip = trip_service::get_trip(store.get_ref(), &trip_id, session.user_id()).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    PUT /trips/{id}
*/
pub async fn update<S: Store>(
    store: web::Data<S>,
    session: Session,
    path: web::Path<String>,
    input: web::Json<TripChanges>,
) -> Result<HttpResponse, ApiError> {
    let trip_id = parse_object_id(&path, "Trip")?;
    let trip =
        trip_service::update_trip(store.get_ref(), &session, &trip_id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    POST /trips/{id}/save
*/
pub async fn save<S: Store>(
    store: web::Data<S>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let source_id = parse_object_id(&path, "Trip")?;
    let copy = copy_service::save_trip(store.get_ref(), &session, &source_id).await?;
    Ok(HttpResponse::Created().json(copy))
}

/*
    POST /trips/{id}/hotels
*/
pub async fn add_hotel<S: Store>(
    store: web::Data<S>,
    session: Session,
    path: web::Path<String>,
    input: web::Json<HotelSelection>,
) -> Result<HttpResponse, ApiError> {
    let trip_id = parse_object_id(&path, "Trip")?;
    let trip =
        trip_service::add_hotel(store.get_ref(), &session, &trip_id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    DELETE /trips/{id}/hotels/{index}
*/
pub async fn remove_hotel<S: Store>(
    store: web::Data<S>,
    session: Session,
    path: web::Path<(String, usize)>,
) -> Result<HttpResponse, ApiError> {
    let (id, index) = path.into_inner();
    let trip_id = parse_object_id(&id, "Trip")?;
    let trip = trip_service::remove_hotel(store.get_ref(), &session, &trip_id, index).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    POST /trips/{id}/itinerary
*/
pub async fn add_activity<S: Store>(
    store: web::Data<S>,
    session: Session,
    path: web::Path<String>,
    input: web::Json<NewActivity>,
) -> Result<HttpResponse, ApiError> {
    let trip_id = parse_object_id(&path, "Trip")?;
    let trip =
        trip_service::add_activity(store.get_ref(), &session, &trip_id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    DELETE /trips/{id}/itinerary/{date}/{index}
*/
pub async fn remove_activity<S: Store>(
    store: web::Data<S>,
    session: Session,
    path: web::Path<(String, String, usize)>,
) -> Result<HttpResponse, ApiError> {
    let (id, date, index) = path.into_inner();
    let trip_id = parse_object_id(&id, "Trip")?;
    let date = parse_calendar_date(&date)
        .ok_or_else(|| ApiError::validation(format!("Invalid date `{}`", date)))?;
    let trip =
        trip_service::remove_activity(store.get_ref(), &session, &trip_id, date, index).await?;
    Ok(HttpResponse::Ok().json(trip))
}
