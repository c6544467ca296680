use log::{info, warn};
use std::{env, fmt::Display, str::FromStr};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "TravelPlanner";
const DEV_JWT_SECRET: &str = "dev_only_secret";
const TOKEN_TTL_HOURS: i64 = 24;
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";
const GENERATION_API_URL: &str = "https://router.huggingface.co/v1/chat/completions";
const GENERATION_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";
const GENERATION_TIMEOUT_SECS: u64 = 60;
const GENERATION_MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_url: String,
    pub model: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: GENERATION_API_URL.to_string(),
            model: GENERATION_MODEL.to_string(),
            api_token: None,
            timeout_secs: GENERATION_TIMEOUT_SECS,
            max_tokens: GENERATION_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub database: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub admin_username: String,
    pub admin_password: String,
    pub generation: GenerationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            mongo_uri: "mongodb://localhost:27017".to_string(),
            database: DATABASE.to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_hours: TOKEN_TTL_HOURS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
            generation: GenerationConfig::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, message } => write!(f, "Invalid {} value: {}", key, message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults
    /// for everything except the database URI (and the JWT secret in release builds).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mongo_uri = env::var("MONGODB_URI").map_err(|_| ConfigError::Missing("MONGODB_URI"))?;
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                warn!("JWT_SECRET not set, using development secret");
                defaults.jwt_secret
            }
            Err(_) => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", defaults.port)?,
            mongo_uri,
            database: env::var("MONGODB_DATABASE").unwrap_or(defaults.database),
            jwt_secret,
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", defaults.token_ttl_hours)?,
            bcrypt_cost: parse_or("BCRYPT_COST", defaults.bcrypt_cost)?,
            admin_username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            generation: GenerationConfig {
                api_url: env::var("GENERATION_API_URL").unwrap_or(defaults.generation.api_url),
                model: env::var("GENERATION_MODEL").unwrap_or(defaults.generation.model),
                api_token: env::var("HUGGINGFACEHUB_API_TOKEN").ok(),
                timeout_secs: parse_or(
                    "GENERATION_TIMEOUT_SECS",
                    defaults.generation.timeout_secs,
                )?,
                max_tokens: parse_or("GENERATION_MAX_TOKENS", defaults.generation.max_tokens)?,
            },
        })
    }
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        Err(_) => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
