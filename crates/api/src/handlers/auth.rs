//! Handlers for the `/auth` resource (sign-up, email verification, login).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use talentforge_core::error::CoreError;
use talentforge_core::roles::ROLE_TALENT;
use talentforge_core::types::DbId;
use talentforge_db::models::user::CreateUser;
use talentforge_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_email_token, hash_email_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Minimum password length enforced at sign-up.
const MIN_PASSWORD_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/sign-up`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub password: String,
}

/// Response body for a successful sign-up: the public profile only.
#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Query parameters for `GET /auth/verify-email`.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailParams {
    pub token: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/sign-up
///
/// Register a new account. The account starts unverified; a verification
/// link is emailed (delivery is best-effort and never fails the request).
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<SignUpResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // Only the hash is stored; the plaintext goes into the email link.
    let (verification_token, verification_token_hash) = generate_email_token();

    let create_dto = CreateUser {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        password_hash: hashed,
        role: ROLE_TALENT.to_string(),
        verification_token_hash: Some(verification_token_hash),
    };
    let user = UserRepo::create(&state.pool, &create_dto).await?;

    if let Err(err) = state
        .mailer
        .send_verification(&user.email, &user.first_name, &verification_token)
        .await
    {
        tracing::warn!(error = %err, email = %user.email, "Failed to send verification email");
    }

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }),
    ))
}

/// GET /api/v1/auth/verify-email?token=...
///
/// Confirm an email address using the token from the verification link.
pub async fn verify_email(
    State(state): State<AppState>,
    Query(params): Query<VerifyEmailParams>,
) -> AppResult<Json<serde_json::Value>> {
    let token_hash = hash_email_token(&params.token);

    let user = UserRepo::find_by_verification_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation("Invalid verification token".into()))
        })?;

    UserRepo::mark_verified(&state.pool, user.id).await?;

    Ok(Json(serde_json::json!({
        "message": "Email verified successfully",
        "user": {
            "id": user.id,
            "email": user.email,
            "is_verified": true,
        },
    })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Find user by email. Unknown emails get the same error as bad
    //    passwords so login does not leak which addresses are registered.
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    // 2. Unverified accounts cannot log in.
    if !user.is_verified {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Email {} is not verified",
            user.email
        ))));
    }

    // 3. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    // 4. Issue the access token.
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(Json(AuthResponse {
        access_token,
        expires_in,
        user: UserInfo {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
        },
    }))
}
