use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use sea_orm_migration::MigratorTrait;
use snackshop_api::{
    app_router,
    config::{init_tracing, load_config},
    db::{check_connection, establish_connection_with_config, DbConfig},
    events::{process_events, EventSender},
    handlers::AppServices,
    migrator::Migrator,
    notifications::TelegramDispatcher,
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    init_tracing(config.log_level(), config.log_json);
    info!(
        environment = %config.environment,
        port = config.port,
        "Starting snackshop API"
    );

    let db = establish_connection_with_config(DbConfig::from_app_config(&config))
        .await
        .context("failed to connect to database")?;
    check_connection(&db).await.context("database ping failed")?;

    if config.auto_migrate {
        info!("Running database migrations");
        Migrator::up(&db, None)
            .await
            .context("failed to run migrations")?;
    }
    let db = Arc::new(db);

    // Notification pipeline: services push events, the processor dispatches.
    let (tx, rx) = mpsc::channel(config.event_channel_capacity);
    let event_sender = EventSender::new(tx);
    let dispatcher = TelegramDispatcher::new(
        config.telegram_bot_token.clone(),
        config.telegram_admin_chat_id.clone(),
        Duration::from_secs(config.notify_timeout_secs),
    );
    if !dispatcher.is_enabled() {
        warn!("Telegram credentials not configured; admin notifications disabled");
    }
    tokio::spawn(process_events(rx, dispatcher));

    let services = AppServices::new(db.clone(), event_sender.clone(), &config);
    services
        .uploads
        .ensure_dirs()
        .await
        .context("failed to create upload directories")?;
    services
        .auth
        .ensure_bootstrap_admin(
            &config.bootstrap_admin_username,
            &config.bootstrap_admin_password,
        )
        .await
        .context("failed to seed bootstrap admin")?;

    let state = AppState {
        db,
        config: config.clone(),
        event_sender,
        services,
    };

    let cors = match config.cors_allowed_origins.as_deref() {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        }
        None => CorsLayer::permissive(),
    };

    let app = app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
