use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{JsonFileStore, UserStore};
use crate::therapy::generator::TextGenerator;
use crate::therapy::session::{InMemorySessionStore, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub generator: Arc<TextGenerator>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let users = Arc::new(JsonFileStore::new(&config.users_file).await?) as Arc<dyn UserStore>;
        let sessions = Arc::new(InMemorySessionStore::default()) as Arc<dyn SessionStore>;
        let generator = Arc::new(TextGenerator::from_config(&config));
        Ok(Self {
            users,
            sessions,
            generator,
            config,
        })
    }

    #[cfg(test)]
    pub fn fake(users: Arc<dyn UserStore>) -> Self {
        use crate::config::{JwtConfig, TherapyConfig};

        let config = Arc::new(AppConfig {
            users_file: "unused".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_hours: 24,
            },
            therapy: TherapyConfig {
                sarcasm_level: 0.8,
                roast_intensity: 0.9,
                remote: None,
            },
        });
        Self {
            users,
            sessions: Arc::new(InMemorySessionStore::default()),
            generator: Arc::new(TextGenerator::Local),
            config,
        }
    }
}
