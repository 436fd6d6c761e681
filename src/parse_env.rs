use std::{collections::HashMap, env};
use thiserror::Error;

type EnvHashMap = HashMap<String, String>;

#[derive(Debug, Error)]
enum EnvError {
    #[error("missing env: '{0}'")]
    NotFound(String),
}

#[derive(Debug, Clone)]
pub struct AppEnv {
    pub location_logs: String,
    pub log_level: tracing::Level,
    pub pg_database: String,
    pub pg_host: String,
    pub pg_pass: String,
    pub pg_port: u16,
    pub pg_user: String,
}

impl AppEnv {
    /// Parse "true" or "false" to bool, else false
    fn parse_boolean(key: &str, map: &EnvHashMap) -> bool {
        map.get(key).is_some_and(|value| value == "true")
    }

    /// Parse debug and/or trace into tracing level
    fn parse_log(map: &EnvHashMap) -> tracing::Level {
        if Self::parse_boolean("LOG_TRACE", map) {
            tracing::Level::TRACE
        } else if Self::parse_boolean("LOG_DEBUG", map) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Parse string to u16, else return 1
    fn parse_number(key: &str, map: &EnvHashMap) -> Result<u16, EnvError> {
        let default = 1;
        map.get(key).map_or_else(
            || Err(EnvError::NotFound(key.into())),
            |data| data.parse::<u16>().map_or(Ok(default), Ok),
        )
    }

    fn parse_string(key: &str, map: &EnvHashMap) -> Result<String, EnvError> {
        map.get(key).map_or_else(
            || Err(EnvError::NotFound(key.into())),
            |value| Ok(value.into()),
        )
    }

    /// Build from an already collected map of env keys
    fn from_map(env_map: &EnvHashMap) -> Result<Self, EnvError> {
        Ok(Self {
            location_logs: Self::parse_string("LOCATION_LOGS", env_map)?,
            log_level: Self::parse_log(env_map),
            pg_database: Self::parse_string("PG_DATABASE", env_map)?,
            pg_host: Self::parse_string("PG_HOST", env_map)?,
            pg_pass: Self::parse_string("PG_PASS", env_map)?,
            pg_port: Self::parse_number("PG_PORT", env_map)?,
            pg_user: Self::parse_string("PG_USER", env_map)?,
        })
    }

    /// Load, and parse .env file, return AppEnv
    fn generate() -> Result<Self, EnvError> {
        let env_map = env::vars().collect::<EnvHashMap>();
        Self::from_map(&env_map)
    }

    pub fn get_env() -> Self {
        let local_env = ".env";
        let app_env = "/app_env/.api.env";

        let env_path = if std::fs::metadata(app_env).is_ok() {
            app_env
        } else if std::fs::metadata(local_env).is_ok() {
            local_env
        } else {
            println!("\n\x1b[31mUnable to load env file\x1b[0m\n");
            std::process::exit(1);
        };

        dotenvy::from_path(env_path).ok();
        match Self::generate() {
            Ok(s) => s,
            Err(e) => {
                println!("\n\x1b[31m{e}\x1b[0m\n");
                std::process::exit(1);
            }
        }
    }
}
