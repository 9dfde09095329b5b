use actix_web::{web, HttpResponse};

use crate::{
    db::Store,
    error::ApiError,
    middleware::auth::AuthConfig,
    models::user::{LoginRequest, TokenResponse},
    services::account_service,
};

/*
    POST /sessions
*/
pub async fn login<S: Store>(
    store: web::Data<S>,
    auth: web::Data<AuthConfig>,
    input: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let auth_token = account_service::login(store.get_ref(), &auth, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { auth_token }))
}
