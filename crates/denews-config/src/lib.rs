//! Gateway configuration loaded from environment variables.
//!
//! [`Config::from_env`] reads the process environment; [`Config::from_lookup`]
//! takes any key lookup so tests never touch global state.

use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var} ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] =
    &["https://denews-web3.netlify.app", "http://localhost:5173"];
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud";
pub const DEFAULT_PINATA_GATEWAY_URL: &str = "https://gateway.pinata.cloud";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_PHOTO_BUCKET: &str = "user-photos";
pub const DEFAULT_USERS_TABLE: &str = "users";

// ─────────────────────────────────────────────────────────────────────────────
// Config Structs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Upper bound on a request body, multipart uploads included.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinataConfig {
    pub api_key: String,
    pub secret_api_key: String,
    pub api_url: String,
    pub gateway_url: String,
}

impl PinataConfig {
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_api_key.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub photo_bucket: String,
    pub users_table: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub pinata: PinataConfig,
    pub gemini: GeminiConfig,
    pub supabase: SupabaseConfig,
    /// Applied to every outbound request. Upstream calls are never retried.
    pub upstream_timeout: Duration,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let server = ServerConfig {
            host: env.or("HOST", DEFAULT_HOST),
            port: env.parsed("PORT", DEFAULT_PORT)?,
            allowed_origins: env
                .get("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()),
            max_upload_bytes: env.parsed("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        };

        let timeout_secs: u64 = env.parsed("UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "UPSTREAM_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
                reason: "must be greater than zero".into(),
            });
        }

        let pinata = PinataConfig {
            api_key: env.get("PINATA_API_KEY").unwrap_or_default(),
            secret_api_key: env.get("PINATA_SECRET_API_KEY").unwrap_or_default(),
            api_url: base_url(env.or("PINATA_API_URL", DEFAULT_PINATA_API_URL)),
            gateway_url: base_url(env.or("PINATA_GATEWAY_URL", DEFAULT_PINATA_GATEWAY_URL)),
        };

        let gemini = GeminiConfig {
            api_key: env.required("GEMINI_API_KEY")?,
            model: env.or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            api_url: base_url(env.or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL)),
        };

        let supabase = SupabaseConfig {
            url: base_url(env.required("SUPABASE_URL")?),
            key: env.required("SUPABASE_KEY")?,
            photo_bucket: env.or("SUPABASE_PHOTO_BUCKET", DEFAULT_PHOTO_BUCKET),
            users_table: env.or("SUPABASE_USERS_TABLE", DEFAULT_USERS_TABLE),
        };

        Ok(Self {
            server,
            pinata,
            gemini,
            supabase,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lookup helpers
// ─────────────────────────────────────────────────────────────────────────────

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parsed<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key,
            value: raw.clone(),
            reason: e.to_string(),
        })
    }
}

fn base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
