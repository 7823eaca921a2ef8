use std::env;

use crate::config::ConfigError;

/// Bootstrap credentials for the first admin account, created at startup
/// when no user with the configured email exists yet.
#[derive(Debug, Clone)]
pub struct AdminUserConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AdminUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(AdminUserConfig {
            name: env::var("ADMIN_NAME")
                .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_NAME".to_string()))?,
            email: env::var("ADMIN_EMAIL")
                .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_EMAIL".to_string()))?,
            password: env::var("ADMIN_PASSWORD")
                .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_PASSWORD".to_string()))?,
        })
    }
}
