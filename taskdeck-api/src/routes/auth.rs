/// Authentication endpoints
///
/// Registration and login with an opaque per-user token. The token is a
/// deterministic placeholder (`mock-token-{id}`); requests are not otherwise
/// authenticated.
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get a token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::models::user::{CreateUser, User};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Public user shape embedded in auth responses
#[derive(Debug, Serialize)]
pub struct AuthUser {
    /// User ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,
}

/// Auth response: the user plus an opaque token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Authenticated user
    pub user: AuthUser,

    /// Opaque token derived from the user id
    pub token: String,
}

fn token_for(user_id: i64) -> String {
    format!("mock-token-{user_id}")
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Ana Souza",
///   "email": "ana@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: token_for(user.id),
            user: AuthUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

/// Login with email and password
///
/// # Errors
///
/// - `401 Unauthorized` ("Invalid credentials") for an unknown email or a
///   wrong password — the two cases are indistinguishable on purpose
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if user.password != req.password {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    Ok(Json(AuthResponse {
        token: token_for(user.id),
        user: AuthUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}
