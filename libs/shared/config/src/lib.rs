use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub conflict_scope: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            host: env::var("SCHEDULER_HOST").unwrap_or_else(|_| {
                warn!("SCHEDULER_HOST not set, using 0.0.0.0");
                "0.0.0.0".to_string()
            }),
            port: env::var("SCHEDULER_PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or_else(|| {
                    warn!("SCHEDULER_PORT not set or invalid, using 3000");
                    3000
                }),
            conflict_scope: env::var("SCHEDULER_CONFLICT_SCOPE").unwrap_or_else(|_| {
                warn!("SCHEDULER_CONFLICT_SCOPE not set, using global");
                "global".to_string()
            }),
        };

        if !config.is_configured() {
            warn!("SCHEDULER_CONFLICT_SCOPE must be 'global' or 'professional', got '{}'",
                  config.conflict_scope);
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.conflict_scope.as_str(), "global" | "professional")
    }

    /// True when overlap checks should be scoped to a single professional
    /// instead of the whole store.
    pub fn scope_is_per_professional(&self) -> bool {
        self.conflict_scope == "professional"
    }
}
