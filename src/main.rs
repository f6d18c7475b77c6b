use floodguard::{bot, config::Settings, db};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Floodguard");

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    let stores = match &settings.database_url {
        Some(database_url) => {
            let pool = match db::pool::create_pool(database_url).await {
                Ok(p) => p,
                Err(e) => {
                    error!("Failed to create database pool: {}", e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = db::pool::run_migrations(&pool).await {
                error!("Failed to run migrations: {}", e);
                std::process::exit(1);
            }

            info!("Database initialized successfully");
            db::Stores::postgres(pool)
        }
        None => {
            warn!("DATABASE_URL not set, flood settings are kept in memory only");
            db::Stores::in_memory()
        }
    };

    if let Err(e) = bot::framework::run(settings, stores).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}
