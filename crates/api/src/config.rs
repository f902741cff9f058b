//! Environment-driven configuration.

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port (`PORT`, default 8000).
    pub port: u16,
    /// Postgres connection string (`DATABASE_URL`). Absent → in-memory store.
    pub database_url: Option<String>,
    /// Token signing secret (`JWT_SECRET`).
    pub jwt_secret: String,
    /// Optional bootstrap super-admin credentials
    /// (`SUPERADMIN_EMAIL` / `SUPERADMIN_PASSWORD`).
    pub superadmin_email: Option<String>,
    pub superadmin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        Self {
            port,
            database_url: std::env::var("DATABASE_URL").ok(),
            jwt_secret,
            superadmin_email: std::env::var("SUPERADMIN_EMAIL").ok(),
            superadmin_password: std::env::var("SUPERADMIN_PASSWORD").ok(),
        }
    }
}
