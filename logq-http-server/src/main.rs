use log::{error, info};
use logq_database::{config::DbConfig, core::setup, LogStore, MongoLogStore};
pub(crate) mod config;
pub(crate) mod router;

use std::{env, sync::Arc};

use actix_web::{middleware::Logger, web, App, HttpServer};

use crate::config::ServerConfig;

fn config_error(e: impl std::fmt::Display) -> std::io::Error {
    error!("Invalid database configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Logger initialized at log level: {}", log_level);

    let db_config = DbConfig::from_env().map_err(config_error)?;
    let client = setup::setup(&db_config).await.map_err(config_error)?;

    // The server still starts when the database is down; queries answer 500 until it is back.
    if let Err(e) = setup::db_health_check(&client).await {
        error!("MongoDB connection error: {}", e);
    }

    let store: Arc<dyn LogStore> = Arc::new(MongoLogStore::new(client, &db_config));
    let store_data = web::Data::from(store.clone());

    let ServerConfig { host, port } = ServerConfig::from_env();
    info!("Server is running on http://{}:{}", host, port);

    let result = HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();
        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(store_data.clone())
            .service(router::health)
            .configure(router::logs::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    info!("Server stopped, closing database connection");
    store.shutdown().await;
    result
}
