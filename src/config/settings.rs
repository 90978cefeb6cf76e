//! Application settings and configuration
//!
//! Settings are read from environment variables (and an optional `.env`
//! file) once at startup. Everything downstream receives explicit values;
//! the relay never touches the process environment itself.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

use crate::services::relay::RelayConfig;
use crate::utils::redact::mask_secret;

/// Default upstream endpoint (OpenAI-compatible chat completions)
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.openai.com/v1";

/// Default vision-capable model
pub const DEFAULT_UPSTREAM_MODEL: &str = "gpt-4.1-2025-04-14";

/// Largest image the caller may upload (10 MiB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!("Invalid environment: {}. Expected: development, staging, or production", s),
        }
    }
}

/// Upstream model provider configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Bearer credential for the provider. Absent means every analysis
    /// fails with a configuration error.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            model: DEFAULT_UPSTREAM_MODEL.to_string(),
            max_tokens: 1000,
            temperature: 0.2,
            timeout_seconds: 120,
        }
    }
}

/// Session token verification for the identity provider
#[derive(Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub require_auth: bool,
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    pub audience: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("require_auth", &self.require_auth)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "***"))
            .field("audience", &self.audience)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            require_auth: false,
            jwt_secret: None,
            audience: "authenticated".to_string(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // Server settings
    pub host: String,
    pub port: u16,

    pub upstream: UpstreamConfig,
    pub auth: AuthConfig,

    /// Upload ceiling in raw bytes; the request body limit is derived from it
    pub max_image_bytes: usize,
}

impl Settings {
    /// Load settings from environment variables with defaults
    ///
    /// Values are parsed but not validated; call [`Settings::validate`] once
    /// overrides are applied and logging is up.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignored in production typically)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. A value that is present but does
    /// not parse is an error; an absent one takes the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            app_name: get("APP_NAME", "xray-relay"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: get("ENVIRONMENT", "development").parse()?,
            log_level: get("LOG_LEVEL", "info"),

            host: get("HOST", "0.0.0.0"),
            port: get("PORT", "8000").parse().context("Invalid PORT value")?,

            upstream: UpstreamConfig {
                api_key: lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty()),
                base_url: get("OPENAI_BASE_URL", DEFAULT_UPSTREAM_BASE_URL),
                model: get("OPENAI_MODEL", DEFAULT_UPSTREAM_MODEL),
                max_tokens: get("OPENAI_MAX_TOKENS", "1000")
                    .parse()
                    .context("Invalid OPENAI_MAX_TOKENS value")?,
                temperature: get("OPENAI_TEMPERATURE", "0.2")
                    .parse()
                    .context("Invalid OPENAI_TEMPERATURE value")?,
                timeout_seconds: get("UPSTREAM_TIMEOUT_SECONDS", "120")
                    .parse()
                    .context("Invalid UPSTREAM_TIMEOUT_SECONDS value")?,
            },

            auth: AuthConfig {
                require_auth: get("REQUIRE_AUTH", "false")
                    .parse()
                    .context("Invalid REQUIRE_AUTH value, expected true or false")?,
                jwt_secret: lookup("AUTH_JWT_SECRET").filter(|secret| !secret.is_empty()),
                audience: get("AUTH_AUDIENCE", "authenticated"),
            },

            max_image_bytes: get("MAX_IMAGE_BYTES", "10485760")
                .parse()
                .context("Invalid MAX_IMAGE_BYTES value")?,
        })
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.upstream.max_tokens == 0 {
            anyhow::bail!("OPENAI_MAX_TOKENS must be > 0");
        }
        if !(0.0..=2.0).contains(&self.upstream.temperature) {
            anyhow::bail!("OPENAI_TEMPERATURE must be between 0.0 and 2.0");
        }
        if self.upstream.timeout_seconds == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECONDS must be > 0");
        }
        if self.max_image_bytes == 0 {
            anyhow::bail!("MAX_IMAGE_BYTES must be > 0");
        }

        if self.auth.require_auth && self.auth.jwt_secret.is_none() {
            anyhow::bail!("REQUIRE_AUTH is enabled but AUTH_JWT_SECRET is not set");
        }

        // Not fatal: the relay reports it per request and /ready stays red
        if self.upstream.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; analysis requests will fail with a configuration error");
        }

        if self.environment == Environment::Production && !self.auth.require_auth {
            tracing::warn!("Running in production without session token verification!");
        }

        Ok(())
    }

    /// Relay configuration derived from these settings
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            api_key: self.upstream.api_key.clone(),
            model: self.upstream.model.clone(),
            max_tokens: self.upstream.max_tokens,
            temperature: self.upstream.temperature,
        }
    }

    /// Request body ceiling: base64 inflates by 4/3, plus room for the JSON envelope
    pub fn max_body_bytes(&self) -> usize {
        (self.max_image_bytes / 3)
            .saturating_mul(4)
            .saturating_add(64 * 1024)
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "xray-relay".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            upstream: UpstreamConfig::default(),
            auth: AuthConfig::default(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}
