// src/config/mod.rs
// All tunables come from the environment (.env supported), with defaults
// that point at an OpenAI-compatible endpoint.

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AttacheConfig {
    // ── Provider Configuration
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub vision_model: String,
    pub temperature: f32,
    pub provider_timeout: u64,

    // ── Chat Configuration
    pub default_persona: String,

    // ── PDF Extraction
    pub pdftotext_bin: String,

    // ── Server Configuration
    pub host: String,
    pub port: u16,
    pub request_timeout: u64,
    pub max_upload_bytes: usize,
}

/// Strip an inline comment and surrounding whitespace from an env value.
fn clean_env_value(raw: &str) -> &str {
    raw.split('#').next().unwrap_or("").trim()
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => match clean_env_value(&val).parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                default
            }
        },
        Err(_) => default,
    }
}

impl AttacheConfig {
    pub fn from_env() -> Self {
        // .env is optional; plain environment variables always work.
        let _ = dotenvy::dotenv();

        Self {
            api_base: env_var_or(
                "ATTACHE_API_BASE",
                "https://api.groq.com/openai/v1".to_string(),
            ),
            api_key: env_var_or("ATTACHE_API_KEY", String::new()),
            model: env_var_or("ATTACHE_MODEL", "llama-3.3-70b-versatile".to_string()),
            vision_model: env_var_or(
                "ATTACHE_VISION_MODEL",
                "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            ),
            temperature: env_var_or("ATTACHE_TEMPERATURE", 0.7),
            provider_timeout: env_var_or("ATTACHE_PROVIDER_TIMEOUT", 90),
            default_persona: env_var_or("ATTACHE_DEFAULT_PERSONA", "default".to_string()),
            pdftotext_bin: env_var_or("ATTACHE_PDFTOTEXT", "pdftotext".to_string()),
            host: env_var_or("ATTACHE_HOST", "0.0.0.0".to_string()),
            port: env_var_or("ATTACHE_PORT", 3000),
            request_timeout: env_var_or("ATTACHE_REQUEST_TIMEOUT", 120),
            max_upload_bytes: env_var_or("ATTACHE_MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
        }
    }

    /// Server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full provider URL for a given endpoint path
    pub fn provider_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<AttacheConfig> = Lazy::new(AttacheConfig::from_env);
