//! Authentication handlers
//!
//! Login is gated by the per-address attempt limiter before credentials are
//! consulted; a locked address never reaches password verification.

use crate::dto::auth::{LoginRequest, LoginResponse, LogoutResponse, MeResponse, RegisterRequest};
use crate::dto::ApiResponse;
use crate::handlers::current_user;
use actix_web::{cookie::Cookie, web, HttpRequest, HttpResponse};
use chrono::{Duration, TimeZone, Utc};
use simledger_auth::{AdminUser, AuthenticatedUser, JwtService, LoginAttemptLimiter, PasswordService};
use simledger_cache::RedisCounterStore;
use simledger_core::models::{User, UserRole};
use simledger_core::traits::UserRepository;
use simledger_core::AppError;
use simledger_db::PgUserRepository;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

/// Client address used as the limiter key
fn client_address(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Login endpoint
///
/// POST /api/v1/auth/login
#[instrument(skip_all)]
pub async fn login(
    pool: web::Data<PgPool>,
    jwt_service: web::Data<Arc<JwtService>>,
    password_service: web::Data<Arc<PasswordService>>,
    limiter: web::Data<Arc<LoginAttemptLimiter<RedisCounterStore>>>,
    http_req: HttpRequest,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Login validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let address = client_address(&http_req);

    // Lockout check comes before any credential work
    limiter.check(&address).await?;

    let username = req.username.trim();
    let password = &req.password;

    debug!(username = %username, "Processing login request");

    let user_repo = PgUserRepository::new(pool.get_ref().clone());
    let user = user_repo.find_by_username(username).await?;

    // Verify against a found user; an unknown username is the same failure
    let password_valid = match &user {
        Some(user) => password_service
            .verify_password(password, &user.password_hash)
            .map_err(|e| {
                error!("Password verification error: {}", e);
                AppError::Internal("Password verification failed".to_string())
            })?,
        None => false,
    };

    let user = match user {
        Some(user) if password_valid => user,
        _ => {
            let state = limiter.record_outcome(&address, false).await?;
            info!(
                username = %username,
                failures = state.failures,
                locked = state.locked,
                "Login failed"
            );
            return Err(AppError::InvalidCredentials);
        }
    };

    limiter.record_outcome(&address, true).await?;

    if let Err(e) = user_repo.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    let token = jwt_service.create_token_for_user(&user.username, user.role)?;
    let expires_in = jwt_service.expiration_secs();

    info!(username = %username, role = ?user.role, "Login successful");

    let response = LoginResponse::new(token.clone(), expires_in, user.info());

    let cookie = Cookie::build("token", token)
        .path("/")
        .http_only(true)
        .max_age(actix_web::cookie::time::Duration::seconds(expires_in))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(response)))
}

/// Logout endpoint
///
/// POST /api/v1/auth/logout
#[instrument(skip_all, fields(username = %user.username))]
pub async fn logout(user: AuthenticatedUser) -> HttpResponse {
    info!(username = %user.username, "User logged out");

    let cookie = Cookie::build("token", "")
        .path("/")
        .http_only(true)
        .max_age(actix_web::cookie::time::Duration::seconds(0))
        .finish();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(LogoutResponse::default()))
}

/// Get current user info
///
/// GET /api/v1/auth/me
#[instrument(skip_all, fields(username = %user.username))]
pub async fn me(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let db_user = current_user(&pool, &user.username).await?;

    let token_expires_at = Utc
        .timestamp_opt(user.claims.exp, 0)
        .single()
        .unwrap_or_else(|| Utc::now() + Duration::seconds(0));

    let response = MeResponse {
        user: db_user.info(),
        token_expires_at,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Register new user (admin only)
///
/// POST /api/v1/auth/register
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn register(
    pool: web::Data<PgPool>,
    password_service: web::Data<Arc<PasswordService>>,
    admin: AdminUser,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Register validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(username = %req.username, "Processing registration request");

    let role = UserRole::from_str(&req.role).unwrap_or(UserRole::Staff);
    let password_hash = password_service.hash_password(&req.password)?;

    let new_user = User {
        id: 0, // Set by database
        username: req.username.clone(),
        password_hash,
        role,
        created_at: Utc::now(),
        last_login: None,
    };

    let user_repo = PgUserRepository::new(pool.get_ref().clone());
    let created = user_repo.create(&new_user).await?;

    info!(
        username = %created.username,
        id = %created.id,
        admin = %admin.username,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        created.info(),
        "User created successfully",
    )))
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me))
            .route("/register", web::post().to(register)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid_req = LoginRequest {
            username: "maria".to_string(),
            password: "password".to_string(),
        };
        assert!(valid_req.validate().is_ok());

        let invalid_req = LoginRequest {
            username: "".to_string(),
            password: "".to_string(),
        };
        assert!(invalid_req.validate().is_err());
    }
}
