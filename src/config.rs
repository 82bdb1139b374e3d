use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub completions_url: String,
    pub completions_model: String,
    pub completions_max_tokens: u32,
    /// Missing key disables the recipe suggester instead of failing startup.
    pub completions_key: Option<String>,
    /// Missing URL disables the auth pass-through routes.
    pub identity_url: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PANTRY_PORT", "8080"),
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379"),
            completions_url: try_load(
                "COMPLETIONS_URL",
                "https://api.openai.com/v1/completions",
            ),
            completions_model: try_load("COMPLETIONS_MODEL", "gpt-3.5-turbo-instruct"),
            completions_max_tokens: try_load("COMPLETIONS_MAX_TOKENS", "150"),
            completions_key: try_read_secret("COMPLETIONS_API_KEY"),
            identity_url: var("IDENTITY_URL").ok(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn try_read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
}
