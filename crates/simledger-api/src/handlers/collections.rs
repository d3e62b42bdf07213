//! Collections endpoint
//!
//! Lists the user's numbers due on a collection day with their derived
//! balances. Without an explicit day the listing covers today (UTC).

use crate::dto::number::{CollectionsQuery, CollectionsResponse, NumberDetailResponse};
use crate::dto::ApiResponse;
use crate::handlers::current_user;
use actix_web::{web, HttpResponse};
use chrono::{Datelike, Utc};
use simledger_auth::AuthenticatedUser;
use simledger_core::models::CollectionDay;
use simledger_core::AppError;
use simledger_db::{PgLedgerRepository, PgNumberRepository};
use simledger_services::CollectionsService;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument};

fn resolve_day(day: Option<&str>) -> Result<CollectionDay, AppError> {
    match day {
        None => Ok(CollectionDay::from_weekday(Utc::now().weekday())),
        Some(day) => CollectionDay::from_str(day)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown collection day: {}", day))),
    }
}

/// Numbers due for collection
///
/// GET /api/v1/collections?day=&all=
#[instrument(skip_all, fields(username = %user.username))]
pub async fn list_collections(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    query: web::Query<CollectionsQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let day = resolve_day(query.day.as_deref())?;

    let service = CollectionsService::new(
        Arc::new(PgNumberRepository::new(pool.get_ref().clone())),
        Arc::new(PgLedgerRepository::new(pool.get_ref().clone())),
    );

    let due = service.due(user_id, day, query.all).await?;
    debug!(count = due.len(), %day, "Listed collections");

    let response = CollectionsResponse {
        day: day.to_string(),
        items: due
            .into_iter()
            .map(|d| NumberDetailResponse {
                number: d.number,
                balance: d.balance,
            })
            .collect(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Configure collections routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/collections", web::get().to(list_collections));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_day_parses_explicit_weekday() {
        assert_eq!(resolve_day(Some("friday")).unwrap(), CollectionDay::Friday);
        assert!(matches!(
            resolve_day(Some("payday")),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_day_defaults_to_today() {
        let today = CollectionDay::from_weekday(Utc::now().weekday());
        assert_eq!(resolve_day(None).unwrap(), today);
    }
}
