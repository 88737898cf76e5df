use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Admin front-ends permitted to call the API from a browser.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://bmbp-admin.vercel.app",
    "https://bmbp-admin-bhavya-singhals-projects.vercel.app",
    "https://bmbp-admin-git-main-bhavya-singhals-projects.vercel.app",
    "http://localhost:3000",
    "http://localhost:3001",
];

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub cors: CorsConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// When set, spans are exported to this OTLP collector.
    pub otlp_endpoint: Option<String>,
}

impl BookingConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let allowed_origins = match env::var("ALLOWED_ORIGINS") {
            Ok(raw) => parse_origins(&raw),
            Err(_) if is_prod => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "ALLOWED_ORIGINS is required in production but not set"
                )))
            }
            Err(_) => CorsConfig::default().allowed_origins,
        };

        Ok(BookingConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", None, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("bookmybirthdayparty"), is_prod)?,
            },
            cors: CorsConfig { allowed_origins },
            observability: ObservabilityConfig {
                log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|e| !e.is_empty()),
            },
        })
    }
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
