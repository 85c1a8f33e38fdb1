use logq_database::config::{get_env_var_or_default, parse_env_var_or_default};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: get_env_var_or_default("HOST", DEFAULT_HOST),
            port: parse_env_var_or_default("PORT", DEFAULT_PORT),
        }
    }
}
