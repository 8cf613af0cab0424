use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskflow::api::{create_router, AppState};
use taskflow::config::Config;
use taskflow::infrastructure::supabase::SupabaseClient;
use taskflow::session::AuthEvent;
use taskflow::stores::SupabaseBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,taskflow=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TaskFlow v{}...", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(Config::from_env()?);

    let http_client = reqwest::Client::new();
    let client = SupabaseClient::from_config(http_client, &config);
    let backend = Arc::new(SupabaseBackend::new(client));
    let state = AppState::new(backend, Arc::clone(&config));

    let mut events = state.session.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            match event {
                AuthEvent::SignedIn(session) => {
                    tracing::info!(user_id = session.user.id.as_str(), "User signed in");
                }
                AuthEvent::SignedOut => tracing::info!("User signed out"),
            }
        }
    });

    let app = create_router(state, &config);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("TaskFlow listening on http://{}", addr);
    tracing::info!("Backend: {}", config.supabase_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("TaskFlow shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
