//! Process configuration read from the environment

use crate::llm::DEFAULT_MODEL;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for the relay server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub gemini_api_key: String,
    pub gemini_model: String,
    /// Override for the Gemini API host (tests, proxies)
    pub gemini_base_url: Option<String>,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    /// Run turns for the same session one at a time
    pub serialize_sessions: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_path = var("INTERVIEW_DB_PATH")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("INTERVIEW_DB_PATH"))?;
        let gemini_api_key = var("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let serialize_sessions = match var("INTERVIEW_SERIALIZE_SESSIONS") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                name: "INTERVIEW_SERIALIZE_SESSIONS",
                value: raw,
            })?,
            None => false,
        };

        let allowed_origins = var("ALLOWED_ORIGINS").map_or_else(
            || vec![DEFAULT_ORIGIN.to_string()],
            |raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            },
        );

        Ok(Self {
            db_path,
            gemini_api_key,
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL"),
            allowed_origins,
            port,
            serialize_sessions,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
