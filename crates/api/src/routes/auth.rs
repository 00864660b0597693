//! Authentication routes for login and token refresh.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, response::internal_error};
use miosaas_core::auth::verify_password;
use miosaas_db::{CompanyRepository, SessionRepository, UserRepository};
use miosaas_shared::auth::{LoginRequest, LoginResponse, RefreshRequest, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "code": "INVALID_CREDENTIALS",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

/// POST /auth/login - Authenticate user and return tokens.
#[allow(clippy::too_many_lines)]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "code": "ACCOUNT_DISABLED",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    // Pick the default company for the token: the first active membership.
    let company_repo = CompanyRepository::new((*state.db).clone());
    let companies = match company_repo.list_for_user(user.id).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to list user companies");
            return internal_error();
        }
    };

    let Some(company) = companies.first() else {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "code": "NO_COMPANY",
                "message": "User is not a member of any company"
            })),
        )
            .into_response();
    };

    let role = match company_repo.find_membership(company.id, user.id).await {
        Ok(Some(m)) => m.role.as_str().to_string(),
        Ok(None) => {
            error!(user_id = %user.id, company_id = %company.id, "Membership vanished during login");
            return internal_error();
        }
        Err(e) => {
            error!(error = %e, "Database error resolving membership");
            return internal_error();
        }
    };

    let access_token = match state
        .jwt_service
        .generate_access_token(user.id, company.id, &role)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };

    let refresh_token = match state
        .jwt_service
        .generate_refresh_token(user.id, company.id, &role)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return internal_error();
        }
    };

    // Track the refresh token server-side so it can be revoked.
    let session_repo = SessionRepository::new((*state.db).clone());
    let expires_at = chrono::Utc::now() + chrono::Duration::days(7);
    if let Err(e) = session_repo
        .create(user.id, company.id, &refresh_token, expires_at, None, None)
        .await
    {
        error!(error = %e, "Failed to persist session");
        return internal_error();
    }

    info!(user_id = %user.id, company_id = %company.id, "User logged in");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            company_id: company.id,
            role,
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/refresh - Exchange a refresh token for a new access token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    // The token must validate AND match an unrevoked session row.
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(c) => c,
        Err(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "code": "INVALID_TOKEN",
                    "message": "Invalid or expired refresh token"
                })),
            )
                .into_response();
        }
    };

    let session_repo = SessionRepository::new((*state.db).clone());
    match session_repo.find_by_token(&payload.refresh_token).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            info!(user_id = %claims.user_id(), "Refresh with unknown or revoked token");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "code": "INVALID_TOKEN",
                    "message": "Invalid or expired refresh token"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during refresh");
            return internal_error();
        }
    }

    let access_token = match state.jwt_service.generate_access_token(
        claims.user_id(),
        claims.company_id(),
        &claims.role,
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "access_token": access_token,
            "expires_in": state.jwt_service.access_token_expires_in()
        })),
    )
        .into_response()
}

/// POST /auth/logout - Revoke the session behind a refresh token.
///
/// Idempotent: revoking an unknown or already-revoked token still
/// returns 204, so clients can always discard their copy.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());
    match session_repo.revoke_by_token(&payload.refresh_token).await {
        Ok(revoked) => {
            if revoked {
                info!("Session revoked on logout");
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error during logout");
            internal_error()
        }
    }
}
