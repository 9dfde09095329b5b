use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::{middleware::auth::Claims, services::hotel_search_service};

#[derive(Debug, Deserialize)]
pub struct HotelQuery {
    #[serde(default)]
    pub query: String,
}

/*
    GET /hotels/search?query=
*/
pub async fn search(claims: web::ReqData<Claims>, params: web::Query<HotelQuery>) -> impl Responder {
    log::debug!("Hotel search by {} for {:?}", claims.user_id, params.query);
    let results = hotel_search_service::search_hotels(&params.query);
    HttpResponse::Ok().json(json!({ "results": results }))
}
