use crate::auth::jwt::JwtConfig;

/// Which [`tradeoff_db::store::DecisionStore`] implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via `DATABASE_URL` (default).
    Postgres,
    /// In-process tables; data is lost on restart.
    Memory,
}

impl StoreBackend {
    /// Parse the `STORE_BACKEND` value. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `10`).
    pub request_timeout_secs: u64,
    /// Per-call store timeout in seconds (default: `10`). Expiry surfaces as
    /// a store error.
    pub store_timeout_secs: u64,
    /// Whether new criteria/choices get zero-valued scores for every
    /// existing counterpart (default: `true`).
    pub seed_default_scores: bool,
    /// Backing store (default: postgres).
    pub store_backend: StoreBackend,
    /// Name of the cookie carrying the session token when no
    /// `Authorization` header is sent (default: `sb-auth-token`).
    pub session_cookie_name: String,
    /// JWT validation configuration (secret, audience).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `10`                       |
    /// | `STORE_TIMEOUT_SECS`   | `10`                       |
    /// | `SEED_DEFAULT_SCORES`  | `true`                     |
    /// | `STORE_BACKEND`        | `postgres`                 |
    /// | `SESSION_COOKIE_NAME`  | `sb-auth-token`            |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let store_timeout_secs: u64 = std::env::var("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("STORE_TIMEOUT_SECS must be a valid u64");

        let seed_default_scores: bool = std::env::var("SEED_DEFAULT_SCORES")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("SEED_DEFAULT_SCORES must be `true` or `false`");

        let store_backend = std::env::var("STORE_BACKEND")
            .map(|name| {
                StoreBackend::from_name(&name)
                    .unwrap_or_else(|| panic!("Unknown STORE_BACKEND '{name}'"))
            })
            .unwrap_or(StoreBackend::Postgres);

        let session_cookie_name =
            std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "sb-auth-token".into());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store_timeout_secs,
            seed_default_scores,
            store_backend,
            session_cookie_name,
            jwt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_names() {
        assert_eq!(StoreBackend::from_name("postgres"), Some(StoreBackend::Postgres));
        assert_eq!(StoreBackend::from_name(" Memory "), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::from_name("sqlite"), None);
    }
}
