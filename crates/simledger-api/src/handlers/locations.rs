//! Location and address endpoints
//!
//! Read-only cascading dropdown data (region down to barangay) plus address
//! creation. Hierarchy consistency is checked against the resolved rows
//! before anything is written.

use crate::dto::location::CreateAddressRequest;
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use simledger_auth::AuthenticatedUser;
use simledger_core::models::{Address, Barangay, Municipality, Province};
use simledger_core::traits::LocationRepository;
use simledger_core::AppError;
use simledger_db::PgLocationRepository;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use validator::Validate;

/// List all regions
///
/// GET /api/v1/locations/regions
#[instrument(skip_all)]
pub async fn list_regions(
    pool: web::Data<PgPool>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let regions = PgLocationRepository::new(pool.get_ref().clone())
        .regions()
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(regions)))
}

/// List a region's provinces
///
/// GET /api/v1/locations/regions/{id}/provinces
#[instrument(skip_all)]
pub async fn list_provinces(
    pool: web::Data<PgPool>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let provinces = PgLocationRepository::new(pool.get_ref().clone())
        .provinces_by_region(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(provinces)))
}

/// List a province's municipalities
///
/// GET /api/v1/locations/provinces/{id}/municipalities
#[instrument(skip_all)]
pub async fn list_municipalities(
    pool: web::Data<PgPool>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let municipalities = PgLocationRepository::new(pool.get_ref().clone())
        .municipalities_by_province(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(municipalities)))
}

/// List a municipality's barangays
///
/// GET /api/v1/locations/municipalities/{id}/barangays
#[instrument(skip_all)]
pub async fn list_barangays(
    pool: web::Data<PgPool>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let barangays = PgLocationRepository::new(pool.get_ref().clone())
        .barangays_by_municipality(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(barangays)))
}

async fn resolve_province(
    repo: &PgLocationRepository,
    id: Option<i32>,
) -> Result<Option<Province>, AppError> {
    match id {
        None => Ok(None),
        Some(id) => repo
            .find_province(id)
            .await?
            .map(Some)
            .ok_or_else(|| AppError::NotFound(format!("Province {} not found", id))),
    }
}

async fn resolve_municipality(
    repo: &PgLocationRepository,
    id: Option<i32>,
) -> Result<Option<Municipality>, AppError> {
    match id {
        None => Ok(None),
        Some(id) => repo
            .find_municipality(id)
            .await?
            .map(Some)
            .ok_or_else(|| AppError::NotFound(format!("Municipality {} not found", id))),
    }
}

async fn resolve_barangay(
    repo: &PgLocationRepository,
    id: Option<i32>,
) -> Result<Option<Barangay>, AppError> {
    match id {
        None => Ok(None),
        Some(id) => repo
            .find_barangay(id)
            .await?
            .map(Some)
            .ok_or_else(|| AppError::NotFound(format!("Barangay {} not found", id))),
    }
}

/// Create an address from the hierarchy selections
///
/// POST /api/v1/locations/addresses
#[instrument(skip_all, fields(username = %user.username))]
pub async fn create_address(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    req: web::Json<CreateAddressRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Address validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgLocationRepository::new(pool.get_ref().clone());

    let province = resolve_province(&repo, req.province_id).await?;
    let municipality = resolve_municipality(&repo, req.municipality_id).await?;
    let barangay = resolve_barangay(&repo, req.barangay_id).await?;

    Address::validate_links(
        province.as_ref(),
        municipality.as_ref(),
        barangay.as_ref(),
        req.region_id,
    )?;

    let address = Address {
        id: 0, // Set by database
        region_id: req.region_id,
        province_id: req.province_id,
        municipality_id: req.municipality_id,
        barangay_id: req.barangay_id,
        house_number_street: req.house_number_street.trim().to_string(),
    };

    let created = repo.create_address(&address).await?;

    info!(address_id = created.id, "Address created");
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

/// Configure location routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/locations")
            .route("/regions", web::get().to(list_regions))
            .route("/regions/{id}/provinces", web::get().to(list_provinces))
            .route(
                "/provinces/{id}/municipalities",
                web::get().to(list_municipalities),
            )
            .route(
                "/municipalities/{id}/barangays",
                web::get().to(list_barangays),
            )
            .route("/addresses", web::post().to(create_address)),
    );
}
