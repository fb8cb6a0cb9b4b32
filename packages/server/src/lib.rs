#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the worker dashboard.
//!
//! Serves the dashboard's aggregate views, the worker map and globe
//! markers, and per-worker profiles. All data comes from a [`Gateway`];
//! the server itself holds no state beyond the lookup tables.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use worker_dashboard_avatar::AvatarPalette;
use worker_dashboard_gateway::Gateway;
use worker_dashboard_geography::PostcodeResolver;
use worker_dashboard_globe::GlobeProjector;

/// Shared application state.
pub struct AppState {
    /// Store the dashboard reads from.
    pub gateway: Arc<dyn Gateway>,
    /// Postcode lookup for profile place names.
    pub resolver: PostcodeResolver<'static>,
    pub projector: GlobeProjector<'static>,
    pub avatars: &'static AvatarPalette,
}

impl AppState {
    /// State over `gateway` with the built-in lookup tables.
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            resolver: PostcodeResolver::default(),
            projector: GlobeProjector::default(),
            avatars: AvatarPalette::standard(),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/dashboard")
                    .route("/summary", web::get().to(handlers::summary))
                    .route("/workers", web::get().to(handlers::workers))
                    .route("/employers", web::get().to(handlers::employers))
                    .route("/map-data", web::get().to(handlers::map_data))
                    .route("/alerts", web::get().to(handlers::alerts))
                    .route("/alerts", web::patch().to(handlers::update_alert))
                    .route("/activity", web::get().to(handlers::activity))
                    .route("/workers-map", web::get().to(handlers::workers_map))
                    .route("/globe-points", web::get().to(handlers::globe_points))
                    .route("/worker-profile", web::get().to(handlers::worker_profile))
                    .route("/worker/{phone}", web::get().to(handlers::worker_detail)),
            ),
    );
}

/// Starts the worker dashboard API server on `bind_addr:port`.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(bind_addr: &str, port: u16, state: AppState) -> std::io::Result<()> {
    let state = web::Data::new(state);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
