//! SimLedger Backend Server
//!
//! Back-office for a SIM/number reseller: clients, number inventory,
//! invoice/payment ledgers, collections, and statements.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use simledger_api::{
    configure_auth, configure_clients, configure_collections, configure_locations,
    configure_numbers, configure_operators,
};
use simledger_auth::{JwtService, LoginAttemptLimiter, PasswordService};
use simledger_cache::RedisCounterStore;
use simledger_core::config::AppConfig;
use simledger_core::traits::PrefixRepository;
use simledger_db::{create_pool, PgPrefixRepository};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Operators and their known prefixes, applied idempotently at startup
const OPERATOR_SEED: &[(&str, &[&str])] = &[
    ("Globe", &["905", "906", "915", "916", "917", "926", "927", "935", "936", "945", "955", "956", "965", "966", "967", "975", "976", "977", "995", "997"]),
    ("TM", &["9175", "9176", "9178", "9253", "9255", "9256", "9257", "9258"]),
    ("Smart", &["908", "918", "919", "920", "921", "928", "929", "939", "946", "947", "949", "951", "961", "998", "999"]),
    ("TNT", &["907", "909", "910", "912", "930", "938", "948", "950", "963", "989"]),
    ("DITO", &["895", "896", "897", "898", "991", "992", "993", "994"]),
];

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "simledger",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))
            // Auth endpoints
            .configure(configure_auth)
            // Client and handler endpoints
            .configure(configure_clients)
            // Number, ledger, history, and statement endpoints
            .configure(configure_numbers)
            // Collection-day listings
            .configure(configure_collections)
            // Operator reference data
            .configure(configure_operators)
            // Cascading location dropdowns and addresses
            .configure(configure_locations),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "simledger={},simledger_api={},simledger_db={},simledger_services={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting SimLedger Backend v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Auth services
    let jwt_service = Arc::new(JwtService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_minutes * 60,
    ));
    let password_service = Arc::new(PasswordService::new());

    info!(
        "JWT service configured with {} minute token expiration",
        config.auth.jwt_expiration_minutes
    );

    info!("Connecting to database...");
    let pool = create_pool(&config.database).await?;
    info!(
        "Database connection established with {} max connections",
        config.database.max_connections
    );

    // Static operator/prefix reference data; safe to re-apply on every start
    PgPrefixRepository::new(pool.clone())
        .seed_operators(OPERATOR_SEED)
        .await?;

    info!("Connecting to Redis...");
    let counter_store = Arc::new(RedisCounterStore::new(&config.redis.url).await?);
    let login_limiter = Arc::new(LoginAttemptLimiter::new(
        counter_store,
        config.auth.lockout_threshold,
        config.auth.lockout_window_secs,
    ));
    info!(
        "Login limiter configured: {} failures per {} second window",
        config.auth.lockout_threshold, config.auth.lockout_window_secs
    );

    // CORS configuration
    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let bind_addr = config.server_addr();
    let workers = config.server.workers;
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    if config.auth.jwt_secret.len() < 32 {
        warn!("JWT secret is shorter than 32 bytes");
    }

    let jwt_service_clone = jwt_service.clone();
    let password_service_clone = password_service.clone();
    let login_limiter_clone = login_limiter.clone();
    let billing_config = config.billing.clone();

    HttpServer::new(move || {
        // Clone cors_origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
                header::COOKIE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(jwt_service_clone.clone()))
            .app_data(web::Data::new(password_service_clone.clone()))
            .app_data(web::Data::new(login_limiter_clone.clone()))
            .app_data(web::Data::new(billing_config.clone()))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_query",
                        "message": error_message
                    })),
                )
                .into()
            }))
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
