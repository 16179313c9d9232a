//! Runtime configuration from environment variables.

/// Environment-driven configuration for the API process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to (`BIND_ADDR`).
    pub bind_addr: String,

    /// Origin allowed by CORS (`FRONTEND_URL`). When unset, CORS is left
    /// permissive, which is only acceptable in development.
    pub frontend_url: Option<String>,

    /// Deployment environment name (`APP_ENV`): "development" or "production".
    pub app_env: String,

    /// HS256 secret for bearer-token validation (`JWT_SECRET`).
    pub jwt_secret: String,

    /// Postgres connection string (`DATABASE_URL`), used when the `postgres`
    /// feature is enabled.
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            if app_env == "production" {
                tracing::error!("JWT_SECRET not set in production");
            } else {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
            }
            "dev-secret".to_string()
        });

        let frontend_url = std::env::var("FRONTEND_URL").ok();
        if frontend_url.is_none() {
            tracing::warn!("FRONTEND_URL not set; CORS left permissive");
        }

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            frontend_url,
            app_env,
            jwt_secret,
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }

    /// Configuration for in-process test servers.
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            frontend_url: None,
            app_env: "test".to_string(),
            jwt_secret: jwt_secret.into(),
            database_url: None,
        }
    }
}
