// SPDX-License-Identifier: MIT

//! Login/logout routes.
//!
//! Credentials are matched verbatim against the stored record (no
//! hashing in this design); the comparison itself is constant-time.

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::routes::users::UserResponse;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Authenticate by email (case-insensitive) and password (verbatim).
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    if payload.email.trim().is_empty() {
        return Err(AppError::BadRequest("Please enter your email".to_string()));
    }
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Please enter your password".to_string()));
    }

    let user = state
        .store
        .find_user_by_email(&payload.email)
        .await
        .ok_or_else(|| AppError::BadRequest("User not found with this email".to_string()))?;

    if !user.is_active {
        return Err(AppError::Forbidden(
            "This user account is inactive".to_string(),
        ));
    }

    let matches: bool = user
        .password
        .as_bytes()
        .ct_eq(payload.password.as_bytes())
        .into();
    if !matches {
        return Err(AppError::BadRequest("Incorrect password".to_string()));
    }

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;
    tracing::info!(user_id = %user.id, "User logged in");

    let jar = jar.add(session_cookie(token.clone()));
    Ok((
        jar,
        Json(LoginResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (jar, Json(serde_json::json!({ "success": true })))
}
