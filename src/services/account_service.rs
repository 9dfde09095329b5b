use std::sync::OnceLock;

use bson::DateTime;
use regex::Regex;

use crate::{
    db::{Store, StoreError},
    error::ApiError,
    middleware::auth::AuthConfig,
    models::user::{LoginRequest, RegisterRequest, User},
};

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
        )
        .expect("valid email regex")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

fn required(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Emails are matched case-insensitively, so they are stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register<S: Store>(store: &S, input: RegisterRequest) -> Result<(), ApiError> {
    let (Some(name), Some(email), Some(password)) = (
        required(input.name),
        required(input.email).map(|email| normalize_email(&email)),
        input.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation("Name, email and password are required"));
    };

    if !is_valid_email(&email) {
        return Err(ApiError::validation("Invalid email address"));
    }

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::validation("A user with this email already exists"));
    }

    let password = bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|err| {
        log::error!("Password hashing failed: {}", err);
        ApiError::Dependency("Failed to create account".to_string())
    })?;

    let now = DateTime::now();
    let user = User {
        id: None,
        name,
        email,
        password,
        image: None,
        created_at: Some(now),
        updated_at: Some(now),
    };

    match store.insert_user(&user).await {
        Ok(id) => {
            log::info!("Registered user {}", id);
            Ok(())
        }
        // lost a race with a concurrent registration
        Err(StoreError::DuplicateKey) => {
            Err(ApiError::validation("A user with this email already exists"))
        }
        Err(err) => Err(err.into()),
    }
}

/// Checks credentials and issues a bearer token. Unknown email and wrong
/// password are indistinguishable to the caller.
pub async fn login<S: Store>(
    store: &S,
    auth: &AuthConfig,
    input: LoginRequest,
) -> Result<String, ApiError> {
    let invalid = || ApiError::Authentication("Invalid credentials".to_string());

    let (Some(email), Some(password)) = (
        required(input.email).map(|email| normalize_email(&email)),
        input.password,
    ) else {
        return Err(invalid());
    };

    let Some(user) = store.find_user_by_email(&email).await? else {
        log::debug!("Sign-in for unknown email");
        return Err(invalid());
    };

    if !bcrypt::verify(&password, &user.password).unwrap_or(false) {
        log::warn!("Failed sign-in for user {:?}", user.id);
        return Err(invalid());
    }

    let user_id = user
        .id
        .ok_or_else(|| ApiError::Dependency("Stored user has no id".to_string()))?;

    auth.issue_token(&user_id, &user.email, &user.name)
        .map_err(|err| {
            log::error!("Token generation failed: {}", err);
            ApiError::Dependency("Token generation failed".to_string())
        })
}
