use std::net::SocketAddr;
use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use scheduling_cell::models::{ConflictScope, SchedulePolicy};
use scheduling_cell::services::booking::AppointmentBookingService;
use shared_config::AppConfig;
use shared_store::MemoryAppointmentStore;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting medical appointment scheduler API server");

    // Load configuration
    let config = AppConfig::from_env();

    let mut policy = SchedulePolicy::default();
    if config.scope_is_per_professional() {
        policy.scope = ConflictScope::PerProfessional;
    }

    // One booking service per process: its write lock is the serialization
    // point for every mutating request.
    let store = Arc::new(MemoryAppointmentStore::new());
    let booking_service = Arc::new(AppointmentBookingService::with_policy(store, policy));

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(booking_service)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::new(
        config.host.parse().expect("invalid SCHEDULER_HOST"),
        config.port,
    );
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .await
        .unwrap();
}
