use config::{Config, ConfigError, Environment};
use secrecy::SecretString;
use serde::Deserialize;

/// Runtime configuration, read from `TRIVIA_*` environment variables
/// (a `.env` file is honoured).
#[derive(Deserialize)]
pub struct Settings {
    pub database_url: SecretString,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_env(environment())
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("max_connections", 5)?
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("TRIVIA")
        .prefix_separator("_")
        .try_parsing(true)
}
