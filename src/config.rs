use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

/// Settings for the optional remote chat-completion model.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteModelConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TherapyConfig {
    pub sarcasm_level: f64,
    pub roast_intensity: f64,
    pub remote: Option<RemoteModelConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub users_file: PathBuf,
    pub jwt: JwtConfig,
    pub therapy: TherapyConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let users_file = std::env::var("USERS_DB_FILE")
            .unwrap_or_else(|_| "./data/users.json".into())
            .into();
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_hours: std::env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
        };
        // A placeholder key means the remote model was never configured.
        let remote = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty() && k != "your_openai_api_key_here")
            .map(|api_key| RemoteModelConfig {
                api_key,
                base_url: std::env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com".into()),
                model: std::env::var("OPENAI_MODEL")
                    .unwrap_or_else(|_| "gpt-3.5-turbo".into()),
            });
        let therapy = TherapyConfig {
            sarcasm_level: std::env::var("THERAPY_SARCASM_LEVEL")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(0.8),
            roast_intensity: std::env::var("ROAST_INTENSITY")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(0.9),
            remote,
        };
        Ok(Self {
            users_file,
            jwt,
            therapy,
        })
    }
}
