use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use bson::oid::ObjectId;

use crate::{
    error::ApiError,
    middleware::auth::{authenticate, Claims},
};

/// The authenticated caller, passed explicitly into every service call.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: ObjectId,
    pub email: String,
    pub name: String,
}

impl TryFrom<Claims> for Session {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = ObjectId::parse_str(&claims.user_id)
            .map_err(|_| ApiError::Authentication("Invalid token subject".to_string()))?;
        Ok(Session {
            user_id,
            email: claims.sub,
            name: claims.name,
        })
    }
}

impl FromRequest for Session {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = authenticate(req).and_then(|claims| {
            claims
                .ok_or_else(|| ApiError::Authentication("User not authenticated".to_string()))
                .and_then(Session::try_from)
        });
        ready(session)
    }
}

/// A session when the caller sent one. A present but invalid token is still a 401.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
    pub fn user_id(&self) -> Option<&ObjectId> {
        self.0.as_ref().map(|session| &session.user_id)
    }
}

impl FromRequest for MaybeSession {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = authenticate(req)
            .and_then(|claims| claims.map(Session::try_from).transpose())
            .map(MaybeSession);
        ready(session)
    }
}

/// A session when the caller sent a valid one. A token that fails to verify
/// reads as anonymous. For public reads where identity only decorates the response.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<Session>);

impl OptionalSession {
    pub fn user_id(&self) -> Option<&ObjectId> {
        self.0.as_ref().map(|session| &session.user_id)
    }
}

impl FromRequest for OptionalSession {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = match authenticate(req) {
            Ok(claims) => claims.and_then(|claims| Session::try_from(claims).ok()),
            Err(err) => {
                log::debug!("Ignoring unusable credentials on public read: {}", err);
                None
            }
        };
        ready(Ok(OptionalSession(session)))
    }
}
