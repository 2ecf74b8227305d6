use actix_web::cookie::Key;

/// Runtime configuration, read from the environment (and `.env` when present).
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub app_name: String,
    pub session_key: Key,
    /// Role id allowed to open templates flagged as locked.
    pub privileged_role: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        if dotenvy::dotenv().is_ok() {
            log::info!("Loaded environment from .env");
        }

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let app_name = std::env::var("APP_NAME").unwrap_or_else(|_| "CMS Manager".to_string());

        let privileged_role = match std::env::var("PRIVILEGED_ROLE") {
            Ok(val) => val
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("PRIVILEGED_ROLE is not an integer: {e}"))?,
            Err(_) => 1,
        };

        // Session encryption key: persistent sessions need SESSION_KEY across restarts
        let session_key = match std::env::var("SESSION_KEY") {
            Ok(val) if val.len() >= 64 => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Ok(val) => {
                log::warn!(
                    "SESSION_KEY too short ({} bytes, need 64+), generating random key",
                    val.len()
                );
                Key::generate()
            }
            Err(_) => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        };

        Ok(Self {
            database_url,
            bind_addr,
            app_name,
            session_key,
            privileged_role,
        })
    }
}
