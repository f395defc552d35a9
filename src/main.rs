use ambulance_core::constants::{APPOINTMENTS_COLLECTION, LOCATIONS_COLLECTION, USERS_COLLECTION};
use ambulance_core::{
    seed_fixtures, Appointment, Location, MongoConfig, MongoConnection, MongoStore, ServiceConfig,
    User,
};
use api_rest::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the ambulance appointments service
///
/// Resolves configuration, connects to MongoDB, seeds fixture data on an empty database and
/// serves the REST API until Ctrl-C or SIGTERM. Stores are disconnected after the server stops.
///
/// # Environment Variables
/// - `AMBULANCE_API_PORT`: listen port (default: 8080)
/// - `AMBULANCE_API_ENVIRONMENT`: `production` selects quieter, uncoloured logging
/// - `AMBULANCE_API_MONGODB_*`: host, port, username, password, database, timeout
/// - `RUST_LOG`: overrides the default log filter
///
/// # Errors
/// Returns an error if:
/// - configuration values are invalid,
/// - the MongoDB client cannot be configured,
/// - the listen address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let service_cfg = ServiceConfig::from_env()?;
    init_tracing(service_cfg.is_production())?;

    let addr = service_cfg.listen_addr();
    tracing::info!("++ Starting ambulance API on {}", addr);

    let mongo_cfg = MongoConfig::from_env()?;
    let connection = MongoConnection::connect(&mongo_cfg).await?;

    let appointments: MongoStore<Appointment> = connection.store(APPOINTMENTS_COLLECTION);
    let users: MongoStore<User> = connection.store(USERS_COLLECTION);
    let locations: MongoStore<Location> = connection.store(LOCATIONS_COLLECTION);

    if let Err(e) = appointments.ensure_id_index().await {
        tracing::warn!("could not ensure appointment id index: {e}");
    }
    if let Err(e) = users.ensure_id_index().await {
        tracing::warn!("could not ensure user id index: {e}");
    }
    if let Err(e) = locations.ensure_id_index().await {
        tracing::warn!("could not ensure location id index: {e}");
    }

    seed_fixtures(&users, &locations).await;

    let state = AppState::new(Arc::new(appointments), Arc::new(users), Arc::new(locations));
    let app = api_rest::router(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.disconnect().await;
    tracing::info!("-- Ambulance API stopped");

    served?;
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise development logs at debug level with colours and
/// production at info level without.
fn init_tracing(production: bool) -> anyhow::Result<()> {
    let level = if production { "info" } else { "debug" };
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::try_new(format!(
            "ambulance_run={level},ambulance_core={level},api_rest={level},tower_http={level}"
        ))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(!production))
        .init();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
