use log::info;
use mongodb::{bson::doc, options::ClientOptions, Client};

use crate::config::DbConfig;

pub async fn db_health_check(client: &Client) -> mongodb::error::Result<()> {
    // Ping the server to see if you can connect to the cluster
    client
        .database("admin")
        .run_command(doc! {"ping": 1}, None)
        .await?;
    info!("Connected to MongoDB");

    Ok(())
}

/**
 * Build a MongoDB client from the configuration. No connection is made until the first operation.
 *
 * # Arguments
 * @param config: &DbConfig - The database configuration
 *
 * # Returns
 * @return mongodb::error::Result<Client> - The client handle
 */
pub async fn setup(config: &DbConfig) -> mongodb::error::Result<Client> {
    let mut client_options = ClientOptions::parse(&config.database_url).await?;

    client_options.app_name = Some("logq".to_string());
    client_options.server_selection_timeout = Some(config.timeout);
    client_options.connect_timeout = Some(config.timeout);

    // Get a handle to the cluster
    let client = Client::with_options(client_options)?;

    Ok(client)
}
