mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use config::Settings;
use core::{KeywordExtractor, Matcher};
use routes::advisor::AppState;
use services::{CatalogStore, ChatExplainer, SessionStore};
use std::sync::Arc;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Vehicle Advisor service...");

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!("Configuration loaded successfully");

    // Load the vehicle catalog. A missing or unreadable catalog is fatal:
    // the service never fabricates one.
    let catalog = CatalogStore::load(&settings.catalog.path).map_err(|e| {
        error!("Failed to load vehicle catalog: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    })?;
    let catalog = Arc::new(catalog);

    info!("Catalog loaded ({} vehicles)", catalog.len());

    // Initialize the explanation client
    let explainer = ChatExplainer::new(
        settings.explainer.base_url.clone(),
        settings.explainer.api_key.clone(),
        settings.explainer.model.clone(),
        settings.explainer.timeout_secs,
    )
    .map_err(|e| {
        error!("Failed to create explainer client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Explainer client initialized (model: {})", settings.explainer.model);

    // Initialize the session store
    let sessions = Arc::new(SessionStore::new(
        settings.session.max_sessions,
        settings.session.ttl_secs,
    ));

    info!(
        "Session store initialized (max: {}, TTL: {}s)",
        settings.session.max_sessions, settings.session.ttl_secs
    );

    // Initialize matcher with configured weights
    let weights = settings.scoring.build_weights();
    let matcher = Matcher::new(
        weights,
        settings.matching.slack_multiplier,
        settings.matching.default_budget_ceiling,
    );

    info!(
        "Matcher initialized (slack: {}, default ceiling: {})",
        settings.matching.slack_multiplier, settings.matching.default_budget_ceiling
    );

    // Build application state
    let app_state = AppState {
        catalog,
        sessions,
        explainer: Arc::new(explainer),
        extractor: Arc::new(KeywordExtractor),
        matcher,
        field_order: settings.matching.field_order(),
        completion_threshold: settings.matching.completion_threshold(),
        default_top_n: settings.matching.default_top_n,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
