use std::path::PathBuf;

use anyhow::{bail, Result};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
const DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_DATABASE_PATH: &str = "data/processed/nyc_311.db";

/// Runtime configuration, read from the environment (a `.env` file is
/// honored when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub database_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Missing .env is fine; real environment variables still apply.
        dotenvy::dotenv().ok();

        let api_key = match std::env::var("DEEPSEEK_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => bail!("DEEPSEEK_API_KEY environment variable is required"),
        };

        let base_url =
            std::env::var("DEEPSEEK_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH));

        Ok(Self {
            api_key,
            base_url,
            model,
            database_path,
        })
    }
}
