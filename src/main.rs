use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hwlicense::config::Config;
use hwlicense::db::{AppState, create_pool, init_db, queries};
use hwlicense::handlers;

#[derive(Parser, Debug)]
#[command(name = "hwlicense")]
#[command(about = "Hardware-bound license validation server")]
struct Cli {
    /// Insert the demo licenses (dev mode only)
    #[arg(long)]
    seed: bool,
}

fn seed_demo_data(state: &AppState) {
    let conn = state.db.get().expect("Failed to get db connection for seeding");
    match queries::seed_demo_licenses(&conn) {
        Ok(0) => tracing::info!("Demo licenses already present, skipping seed"),
        Ok(count) => {
            tracing::info!("Seeded {} demo license(s)", count);
            tracing::info!("  DEMO-1234-5678-ABCD  (1 machine)");
            tracing::info!("  PROD-9876-5432-ZYXW  (3 machines)");
            tracing::info!("  EXPIRED-LITE-LICENSE (expired)");
        }
        Err(e) => tracing::warn!("Failed to seed demo licenses: {}", e),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hwlicense=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    let db_pool =
        create_pool(&config.database_path, &config.db).expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }
    tracing::info!("Using database: {}", config.database_path);

    if config.api_key.is_none() {
        tracing::warn!("API_KEY is not set: admin endpoints will reject every request");
    }

    let state = AppState::new(db_pool, config.api_key.clone());

    if cli.seed {
        if !config.dev_mode {
            tracing::warn!("--seed flag ignored: not in dev mode (set HWLICENSE_ENV=dev)");
        } else {
            seed_demo_data(&state);
        }
    }

    let app = handlers::app(state, Some(config.rate_limit));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("hwlicense server listening on {}", addr);

    // Peer addresses are needed for per-IP rate limiting
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
