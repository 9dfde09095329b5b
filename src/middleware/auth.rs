use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, HttpMessage, HttpRequest,
};
use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // subject (email)
    pub exp: usize,  // expiration time
    pub iat: usize,  // issued at
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
}

/// Signing settings shared through `web::Data`.
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    pub fn issue_token(
        &self,
        user_id: &ObjectId,
        email: &str,
        name: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp().max(0) as usize,
            exp: (now + self.token_ttl).timestamp().max(0) as usize,
            user_id: user_id.to_hex(),
            name: name.to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

/// `Ok(None)` when no Authorization header was sent at all.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| Some(token.trim()))
        .ok_or_else(|| ApiError::Authentication("Invalid authorization header".to_string()))
}

/// Resolves the caller's claims: claims already verified by [`AuthMiddleware`]
/// win, otherwise the bearer token is decoded. `Ok(None)` for anonymous calls.
pub fn authenticate(req: &HttpRequest) -> Result<Option<Claims>, ApiError> {
    if let Some(claims) = req.extensions().get::<Claims>() {
        return Ok(Some(claims.clone()));
    }

    let Some(token) = bearer_token(req.headers())? else {
        return Ok(None);
    };

    let config = req.app_data::<web::Data<AuthConfig>>().ok_or_else(|| {
        log::error!("AuthConfig missing from app data");
        ApiError::Dependency("Authentication unavailable".to_string())
    })?;

    config.decode_token(token).map(Some).map_err(|err| {
        log::debug!("Rejected token: {}", err);
        ApiError::Authentication("Invalid token".to_string())
    })
}

/// Rejects every request in the wrapped scope that lacks a valid bearer token.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let rejection = match authenticate(req.request()) {
            Ok(Some(claims)) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
            }
            Ok(None) => ApiError::Authentication("No authorization header".to_string()),
            Err(err) => err,
        };

        let response = req.error_response(rejection).map_into_right_body();
        Box::pin(ready(Ok(response)))
    }
}
