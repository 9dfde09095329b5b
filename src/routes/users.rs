use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{db::Store, error::ApiError, models::user::RegisterRequest, services::account_service};

/*
    POST /users
*/
pub async fn register<S: Store>(
    store: web::Data<S>,
    input: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    account_service::register(store.get_ref(), input.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({ "message": "User registered successfully" })))
}
