//! Number endpoints
//!
//! Intake, search, edit, and the per-number ledger surfaces: appending
//! invoice/payment rows, the unified history table, and statements.

use crate::dto::ledger::{CreateInvoiceRequest, CreatePaymentRequest};
use crate::dto::number::{
    CreateNumberRequest, HistoryPageResponse, HistoryQuery, NumberDetailResponse,
    NumberSearchQuery, StatementQuery, UpdateNumberRequest,
};
use crate::dto::ApiResponse;
use crate::handlers::{current_user, owned_client, owned_number};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use simledger_auth::AuthenticatedUser;
use simledger_core::config::BillingConfig;
use simledger_core::models::{CollectionDay, Invoice, Payment, SimStatus};
use simledger_core::traits::LedgerRepository;
use simledger_core::AppError;
use simledger_db::{PgLedgerRepository, PgNumberRepository, PgPrefixRepository};
use simledger_services::history::SortKey;
use simledger_services::statement::parse_range;
use simledger_services::{HistoryService, NewNumber, NumberEdit, NumberService, StatementService};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

fn number_service(
    pool: &PgPool,
) -> NumberService<PgNumberRepository, PgPrefixRepository, PgLedgerRepository> {
    NumberService::new(
        Arc::new(PgNumberRepository::new(pool.clone())),
        Arc::new(PgPrefixRepository::new(pool.clone())),
        Arc::new(PgLedgerRepository::new(pool.clone())),
    )
}

fn parse_sim_status(s: Option<&str>) -> Result<SimStatus, AppError> {
    match s {
        None => Ok(SimStatus::default()),
        Some(s) => SimStatus::from_str(s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown SIM status: {}", s))),
    }
}

fn parse_collection_day(s: &str) -> Result<CollectionDay, AppError> {
    CollectionDay::from_str(s)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown collection day: {}", s)))
}

/// Intake a new number
///
/// POST /api/v1/numbers
///
/// The operator is resolved from the value's prefix before anything is
/// written; an unknown prefix rejects the whole request.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn create_number(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    req: web::Json<CreateNumberRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Number validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let user_id = current_user(&pool, &user.username).await?.id;
    owned_client(&pool, req.client_id, user_id).await?;

    let new = NewNumber {
        value: req.value.clone(),
        sim_status: parse_sim_status(req.sim_status.as_deref())?,
        client_id: req.client_id,
        handler_id: req.handler_id,
        collection_day: parse_collection_day(&req.collection_day)?,
    };

    let created = number_service(&pool).create(new).await?;

    info!(number_id = %created.id, "Number created");
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

/// Search the user's numbers across all clients
///
/// GET /api/v1/numbers?q=
#[instrument(skip_all, fields(username = %user.username))]
pub async fn search_numbers(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    query: web::Query<NumberSearchQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;

    let numbers = number_service(&pool)
        .search_for_user(user_id, query.q.as_deref().unwrap_or(""))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(numbers)))
}

/// List one client's numbers, optionally filtered
///
/// GET /api/v1/clients/{id}/numbers?q=&operator_id=
#[instrument(skip_all, fields(username = %user.username))]
pub async fn list_client_numbers(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    query: web::Query<NumberSearchQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let client = owned_client(&pool, path.into_inner(), user_id).await?;

    let numbers = number_service(&pool)
        .search_for_client(client.id, query.q.as_deref(), query.operator_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(numbers)))
}

/// Fetch one number with its derived balance
///
/// GET /api/v1/numbers/{id}
#[instrument(skip_all, fields(username = %user.username))]
pub async fn get_number(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let number = owned_number(&pool, path.into_inner(), user_id).await?;

    let (number, balance) = number_service(&pool).detail(number.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(NumberDetailResponse { number, balance })))
}

/// Edit a number's status, handler, or collection day
///
/// PUT /api/v1/numbers/{id}
#[instrument(skip_all, fields(username = %user.username))]
pub async fn update_number(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateNumberRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Number validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let user_id = current_user(&pool, &user.username).await?.id;
    let number = owned_number(&pool, path.into_inner(), user_id).await?;

    let edit = NumberEdit {
        sim_status: parse_sim_status(Some(&req.sim_status))?,
        handler_id: req.handler_id,
        collection_day: parse_collection_day(&req.collection_day)?,
    };

    let updated = number_service(&pool).edit(number.id, edit).await?;

    info!(number_id = %updated.id, "Number updated");
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

/// Delete a number and its ledger rows
///
/// DELETE /api/v1/numbers/{id}
#[instrument(skip_all, fields(username = %user.username))]
pub async fn delete_number(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let number = owned_number(&pool, path.into_inner(), user_id).await?;

    number_service(&pool).delete(number.id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Append an invoice row to a number's ledger
///
/// POST /api/v1/numbers/{id}/invoices
#[instrument(skip_all, fields(username = %user.username))]
pub async fn create_invoice(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Invoice validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let user_id = current_user(&pool, &user.username).await?.id;
    let number = owned_number(&pool, path.into_inner(), user_id).await?;

    let invoice = Invoice {
        id: 0, // Set by database
        number_id: number.id,
        time: req.time.unwrap_or_else(Utc::now),
        added_load: req.added_load,
        balance: req.balance,
        reference_number: req.reference_number.trim().to_string(),
    };

    let created = PgLedgerRepository::new(pool.get_ref().clone())
        .add_invoice(&invoice)
        .await?;

    info!(invoice_id = created.id, number_id = %number.id, "Invoice appended");
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

/// Append a payment row to a number's ledger
///
/// POST /api/v1/numbers/{id}/payments
#[instrument(skip_all, fields(username = %user.username))]
pub async fn create_payment(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let number = owned_number(&pool, path.into_inner(), user_id).await?;

    let payment = Payment {
        id: 0, // Set by database
        number_id: number.id,
        time: req.time.unwrap_or_else(Utc::now),
        paid_amount: req.paid_amount,
    };

    let created = PgLedgerRepository::new(pool.get_ref().clone())
        .add_payment(&payment)
        .await?;

    info!(payment_id = created.id, number_id = %number.id, "Payment appended");
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

/// One page of a number's unified invoice/payment history
///
/// GET /api/v1/numbers/{id}/history?search=&sort=&page=
#[instrument(skip_all, fields(username = %user.username))]
pub async fn number_history(
    pool: web::Data<PgPool>,
    billing: web::Data<BillingConfig>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let number = owned_number(&pool, path.into_inner(), user_id).await?;

    let sort = SortKey::parse(&query.sort);
    let service = HistoryService::with_page_size(
        Arc::new(PgLedgerRepository::new(pool.get_ref().clone())),
        billing.history_page_size,
    );
    let page = service
        .page(number.id, &query.search, sort, query.page)
        .await?;

    let response = HistoryPageResponse {
        items: page.items,
        page_number: page.page_number,
        total_pages: page.total_pages,
        has_previous: page.has_previous,
        has_next: page.has_next,
        sort: sort.as_str().to_string(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Statement data for a number over an inclusive date range
///
/// GET /api/v1/numbers/{id}/statement?start=&end=
#[instrument(skip_all, fields(username = %user.username))]
pub async fn number_statement(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    query: web::Query<StatementQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let number = owned_number(&pool, path.into_inner(), user_id).await?;

    let (start, end) = parse_range(&query.start, &query.end)?;

    let service =
        StatementService::new(Arc::new(PgLedgerRepository::new(pool.get_ref().clone())));
    let statement = service.assemble(number.id, start, end).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(statement)))
}

/// Configure number routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/numbers")
            .route("", web::get().to(search_numbers))
            .route("", web::post().to(create_number))
            .route("/{id}", web::get().to(get_number))
            .route("/{id}", web::put().to(update_number))
            .route("/{id}", web::delete().to(delete_number))
            .route("/{id}/invoices", web::post().to(create_invoice))
            .route("/{id}/payments", web::post().to(create_payment))
            .route("/{id}/history", web::get().to(number_history))
            .route("/{id}/statement", web::get().to(number_statement)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sim_status() {
        assert_eq!(parse_sim_status(None).unwrap(), SimStatus::Active);
        assert_eq!(
            parse_sim_status(Some("disabled")).unwrap(),
            SimStatus::Disabled
        );
        assert!(matches!(
            parse_sim_status(Some("broken")),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_collection_day() {
        assert_eq!(
            parse_collection_day("tuesday").unwrap(),
            CollectionDay::Tuesday
        );
        assert!(matches!(
            parse_collection_day("someday"),
            Err(AppError::InvalidInput(_))
        ));
    }
}
