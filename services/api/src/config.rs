//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use notes_quiz_core::PromptTemplates;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

/// File in the prompts directory overriding the quiz system instruction.
pub const QUIZ_SYSTEM_PROMPT_FILE: &str = "quiz_system.txt";
/// File in the prompts directory overriding the quiz user template.
pub const QUIZ_USER_PROMPT_FILE: &str = "quiz_user.txt";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error("Could not read prompt file {0}: {1}")]
    PromptFile(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub log_level: Level,
    pub prompts_path: PathBuf,
    pub openai_api_key: Option<String>,
    pub quiz_model: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server and Database Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string(), e.to_string())
            })?,
            None => 5,
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = lookup("PROMPTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./prompts"));

        // --- Model Settings ---
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());
        let quiz_model = lookup("QUIZ_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());

        Ok(Self {
            bind_address,
            database_url,
            database_max_connections,
            log_level,
            prompts_path,
            openai_api_key,
            quiz_model,
        })
    }

    /// Loads the quiz prompt templates, falling back to the built-in text for any
    /// file missing from `prompts_path`.
    pub fn load_prompt_templates(&self) -> Result<PromptTemplates, ConfigError> {
        let defaults = PromptTemplates::default();
        let templates = PromptTemplates {
            system: read_prompt(&self.prompts_path, QUIZ_SYSTEM_PROMPT_FILE)?
                .unwrap_or(defaults.system),
            user: read_prompt(&self.prompts_path, QUIZ_USER_PROMPT_FILE)?
                .unwrap_or(defaults.user),
        };

        let missing = templates.missing_placeholders();
        if !missing.is_empty() {
            return Err(ConfigError::InvalidValue(
                "PROMPTS_PATH".to_string(),
                format!("{} is missing {}", QUIZ_USER_PROMPT_FILE, missing.join(", ")),
            ));
        }
        Ok(templates)
    }
}

fn read_prompt(dir: &Path, file: &str) -> Result<Option<String>, ConfigError> {
    let path = dir.join(file);
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            info!("Loaded prompt override from {}", path.display());
            Ok(Some(text.trim_end().to_string()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::PromptFile(path.display().to_string(), e.to_string())),
    }
}
