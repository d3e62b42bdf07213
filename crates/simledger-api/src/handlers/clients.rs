//! Client and handler endpoints
//!
//! All routes operate on the calling user's own clients; ids belonging to
//! other users read as missing.

use crate::dto::client::{
    ClientDetailResponse, ClientListQuery, CreateClientRequest, HandlerRequest,
    UpdateClientRequest,
};
use crate::dto::ApiResponse;
use crate::handlers::{current_user, owned_client};
use actix_web::{web, HttpResponse};
use simledger_auth::AuthenticatedUser;
use simledger_core::models::{Client, ClientStatus, Handler};
use simledger_core::traits::{ClientRepository, Repository};
use simledger_core::AppError;
use simledger_db::{PgClientRepository, PgLedgerRepository, PgNumberRepository, PgPrefixRepository};
use simledger_services::NumberService;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

fn parse_status(s: Option<&str>) -> Result<ClientStatus, AppError> {
    match s {
        None => Ok(ClientStatus::default()),
        Some(s) => ClientStatus::from_str(s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown client status: {}", s))),
    }
}

/// List or search the user's clients
///
/// GET /api/v1/clients?q=
#[instrument(skip_all, fields(username = %user.username))]
pub async fn list_clients(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    query: web::Query<ClientListQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let repo = PgClientRepository::new(pool.get_ref().clone());

    let clients = match query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => repo.search_by_name(user_id, q).await?,
        None => repo.list_for_user(user_id).await?,
    };

    debug!(count = clients.len(), "Listed clients");
    Ok(HttpResponse::Ok().json(ApiResponse::success(clients)))
}

/// Create a client
///
/// POST /api/v1/clients
#[instrument(skip_all, fields(username = %user.username))]
pub async fn create_client(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    req: web::Json<CreateClientRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Client validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let user_id = current_user(&pool, &user.username).await?.id;

    let client = Client {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        trade_name: req.trade_name.trim().to_string(),
        contact_number: req.contact_number.trim().to_string(),
        status: parse_status(req.status.as_deref())?,
        primary_address_id: None,
        application_date: req
            .application_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive()),
        user_id,
    };

    let created = PgClientRepository::new(pool.get_ref().clone())
        .create(&client)
        .await?;

    info!(client_id = %created.id, "Client created");
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

/// Fetch one client with its inventory totals
///
/// GET /api/v1/clients/{id}
#[instrument(skip_all, fields(username = %user.username))]
pub async fn get_client(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let client = owned_client(&pool, path.into_inner(), user_id).await?;

    let numbers = NumberService::new(
        Arc::new(PgNumberRepository::new(pool.get_ref().clone())),
        Arc::new(PgPrefixRepository::new(pool.get_ref().clone())),
        Arc::new(PgLedgerRepository::new(pool.get_ref().clone())),
    );
    let (numbers_count, total_balance) = numbers.client_totals(client.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(ClientDetailResponse {
        client,
        numbers_count,
        total_balance,
    })))
}

/// Update a client
///
/// PUT /api/v1/clients/{id}
#[instrument(skip_all, fields(username = %user.username))]
pub async fn update_client(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateClientRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Client validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let user_id = current_user(&pool, &user.username).await?.id;
    let mut client = owned_client(&pool, path.into_inner(), user_id).await?;

    client.name = req.name.trim().to_string();
    client.trade_name = req.trade_name.trim().to_string();
    client.contact_number = req.contact_number.trim().to_string();
    if req.status.is_some() {
        client.status = parse_status(req.status.as_deref())?;
    }
    if let Some(address_id) = req.primary_address_id {
        client.primary_address_id = Some(address_id);
    }

    let updated = PgClientRepository::new(pool.get_ref().clone())
        .update(&client)
        .await?;

    info!(client_id = %updated.id, "Client updated");
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

/// Delete a client and (via storage cascade) its numbers and ledgers
///
/// DELETE /api/v1/clients/{id}
#[instrument(skip_all, fields(username = %user.username))]
pub async fn delete_client(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let client = owned_client(&pool, path.into_inner(), user_id).await?;

    PgClientRepository::new(pool.get_ref().clone())
        .delete(client.id)
        .await?;

    info!(client_id = %client.id, "Client deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// List a client's handlers
///
/// GET /api/v1/clients/{id}/handlers
#[instrument(skip_all, fields(username = %user.username))]
pub async fn list_handlers(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user(&pool, &user.username).await?.id;
    let client = owned_client(&pool, path.into_inner(), user_id).await?;

    let handlers = PgClientRepository::new(pool.get_ref().clone())
        .handlers_for_client(client.id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(handlers)))
}

/// Attach a handler to a client
///
/// POST /api/v1/clients/{id}/handlers
#[instrument(skip_all, fields(username = %user.username))]
pub async fn create_handler(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<HandlerRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Handler validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let user_id = current_user(&pool, &user.username).await?.id;
    let client = owned_client(&pool, path.into_inner(), user_id).await?;

    let handler = Handler {
        id: 0, // Set by database
        name: req.name.trim().to_string(),
        contact: req.contact.trim().to_string(),
        client_id: client.id,
    };

    let created = PgClientRepository::new(pool.get_ref().clone())
        .create_handler(&handler)
        .await?;

    info!(handler_id = created.id, client_id = %client.id, "Handler created");
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

/// Update one of a client's handlers
///
/// PUT /api/v1/clients/{id}/handlers/{handler_id}
#[instrument(skip_all, fields(username = %user.username))]
pub async fn update_handler(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, i32)>,
    req: web::Json<HandlerRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Handler validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let (client_id, handler_id) = path.into_inner();
    let user_id = current_user(&pool, &user.username).await?.id;
    let client = owned_client(&pool, client_id, user_id).await?;

    let repo = PgClientRepository::new(pool.get_ref().clone());

    // The handler must already belong to this client
    let existing = repo
        .handlers_for_client(client.id)
        .await?
        .into_iter()
        .find(|h| h.id == handler_id)
        .ok_or_else(|| AppError::NotFound("Handler not found".to_string()))?;

    let handler = Handler {
        id: existing.id,
        name: req.name.trim().to_string(),
        contact: req.contact.trim().to_string(),
        client_id: client.id,
    };

    let updated = repo.update_handler(&handler).await?;

    info!(handler_id = updated.id, "Handler updated");
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

/// Configure client routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .route("", web::get().to(list_clients))
            .route("", web::post().to(create_client))
            .route("/{id}", web::get().to(get_client))
            .route("/{id}", web::put().to(update_client))
            .route("/{id}", web::delete().to(delete_client))
            .route(
                "/{id}/numbers",
                web::get().to(crate::handlers::numbers::list_client_numbers),
            )
            .route("/{id}/handlers", web::get().to(list_handlers))
            .route("/{id}/handlers", web::post().to(create_handler))
            .route("/{id}/handlers/{handler_id}", web::put().to(update_handler)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(None).unwrap(), ClientStatus::Active);
        assert_eq!(
            parse_status(Some("inactive")).unwrap(),
            ClientStatus::Inactive
        );
        assert!(matches!(
            parse_status(Some("gone")),
            Err(AppError::InvalidInput(_))
        ));
    }
}
