pub mod config;
pub mod core;
pub mod database;
pub mod models;

pub use database::{memory::MemoryLogStore, mongo::MongoLogStore, LogStore};

/**
 * Load variables from a `.env` file into the environment, if one exists
 *
 * # Returns
 * @return () - The result of the operation
 */
pub fn init() {
    dotenv::dotenv().ok();
}
