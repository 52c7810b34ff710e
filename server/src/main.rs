use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use eventnet_server::config::{Config, StoreBackend};
use eventnet_server::pagination::EventsPageLinks;
use eventnet_server::routes::create_routes;
use eventnet_server::state::AppState;
use eventnet_server::store::{EventStore, MemoryEventStore, PgEventStore};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let store: Arc<dyn EventStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await
                .expect("Failed to connect to database");

            tracing::info!("Successfully connected to database");

            sqlx::migrate!()
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            tracing::info!("Migrations run successfully");

            Arc::new(PgEventStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory event store; data is lost on restart");
            let store = match &config.seed_file {
                Some(path) => {
                    let seed = std::fs::read_to_string(path).expect("Failed to read seed file");
                    let store =
                        MemoryEventStore::from_seed_json(&seed).expect("Invalid seed file");
                    tracing::info!(path = %path, "Seeded in-memory event store");
                    store
                }
                None => MemoryEventStore::new(),
            };
            Arc::new(store)
        }
    };

    let state = AppState::new(
        store,
        Arc::new(EventsPageLinks::new(config.public_base_url.clone())),
    );
    let app: Router = create_routes(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
