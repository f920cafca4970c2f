use crate::presentation::config::{Environment, LoggingSettings};

pub struct TracingConfig {
    pub environment: Environment,
    pub filter: String,
    pub json_format: bool,
}

impl TracingConfig {
    /// Production always logs JSON. Elsewhere `logging.enable_json` or `LOG_FORMAT=json`
    /// switches it on.
    pub fn from_settings(environment: Environment, logging: &LoggingSettings) -> Self {
        let json_from_env = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            environment,
            filter: logging.level.clone(),
            json_format: environment.is_production() || logging.enable_json || json_from_env,
        }
    }
}
