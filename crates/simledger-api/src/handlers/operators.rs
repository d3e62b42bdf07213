//! Operator endpoints

use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use simledger_auth::AuthenticatedUser;
use simledger_core::traits::PrefixRepository;
use simledger_core::AppError;
use simledger_db::PgPrefixRepository;
use sqlx::PgPool;
use tracing::instrument;

/// List all operators
///
/// GET /api/v1/operators
#[instrument(skip_all)]
pub async fn list_operators(
    pool: web::Data<PgPool>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let operators = PgPrefixRepository::new(pool.get_ref().clone())
        .list_operators()
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(operators)))
}

/// Configure operator routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/operators", web::get().to(list_operators));
}
