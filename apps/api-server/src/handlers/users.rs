//! Registration, login and the caller's own account.

use actix_web::{HttpResponse, web};

use circle_core::domain::User;
use circle_core::error::RepoError;
use circle_core::ports::AuthError;
use circle_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use super::validated;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    Ok(AuthResponse {
        token: state.tokens.generate_token(user.id)?,
        token_type: "x-auth-token".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/users/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body)?;
    let email = normalize_email(&req.email);

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = User::new(req.name.trim().to_string(), email, password_hash);

    // A concurrent registration may still win the unique email index.
    let user = state.users.create(user).await.map_err(|e| match e {
        RepoError::Constraint(_) => AppError::Conflict("User already exists".to_string()),
        other => other.into(),
    })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(auth_response(&state, &user)?))
}

/// POST /api/users/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body)?;

    let user = state
        .users
        .find_by_email(&normalize_email(&req.email))
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    Ok(HttpResponse::Ok().json(auth_response(&state, &user)?))
}

/// GET /api/users
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id.to_string(),
        name: user.name,
        email: user.email,
        avatar: user.avatar,
        created_at: user.created_at.to_rfc3339(),
    }))
}
