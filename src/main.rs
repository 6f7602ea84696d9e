use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum::error_handling::HandleErrorLayer;
use axum::{BoxError, Router};
use dotenvy::dotenv;
use http::StatusCode;
use tokio::signal;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use fleetflow::api::create_api_router;
use fleetflow::config::environment::EnvironmentConfig;
use fleetflow::database;
use fleetflow::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use fleetflow::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚚 FleetFlow - Gestión de flota y despacho de viajes");
    info!("====================================================");

    let config = EnvironmentConfig::from_env()?;

    let pool = match database::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };
    database::run_migrations(&pool).await?;

    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(&config.cors_origins)
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .nest("/api", create_api_router())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   POST /api/vehicles - Crear vehículo");
    info!("   GET  /api/vehicles - Listar vehículos");
    info!("   GET  /api/vehicles/:id - Obtener vehículo");
    info!("   POST /api/drivers - Crear conductor");
    info!("   GET  /api/drivers - Listar conductores");
    info!("   GET  /api/drivers/:id - Obtener conductor");
    info!("   POST /api/trips - Crear viaje (Draft)");
    info!("   GET  /api/trips - Listar viajes (?status=)");
    info!("   GET  /api/trips/active - Viajes activos");
    info!("   GET  /api/trips/:id - Obtener viaje");
    info!("   POST /api/trips/:id/dispatch - Despachar viaje");
    info!("   POST /api/trips/:id/start-transit - Iniciar tránsito");
    info!("   POST /api/trips/:id/complete - Completar viaje");
    info!("   POST /api/trips/:id/cancel - Cancelar viaje");
    info!("   POST /api/maintenance - Programar mantenimiento");
    info!("   GET  /api/maintenance - Listar mantenimientos (?vehicle_id=)");
    info!("   GET  /api/maintenance/:id - Obtener mantenimiento");
    info!("   POST /api/maintenance/:id/start - Iniciar mantenimiento");
    info!("   POST /api/maintenance/:id/complete - Completar mantenimiento");
    info!("   POST /api/maintenance/:id/cancel - Cancelar mantenimiento");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

async fn handle_timeout(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            "Request timed out".to_string(),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", err),
        )
    }
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
