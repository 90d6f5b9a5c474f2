use warden_auth_types::token::{KindSettings, TokenSettings};

const DEFAULT_GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// API service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3000). Env var: `API_PORT`.
    pub api_port: u16,
    /// Signing secret and lifetime per token kind.
    pub tokens: TokenSettings,
    /// Frontend base URL used to build links in outgoing mail (e.g. "https://app.example.com").
    pub web_url: String,
    /// Frontend route that consumes email-verification tokens.
    pub web_verify_route: String,
    /// Frontend route that consumes password-reset tokens.
    pub web_forget_password_route: String,
    /// OpenID userinfo endpoint queried on Google login.
    pub google_userinfo_url: String,
    /// Role assigned to newly registered users.
    pub default_role: String,
    /// Admin account created by the seeder when both values are set.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Run seeders before serving. Env var: `RUN_SEEDERS`.
    pub run_seeders: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            api_port: parse_or("API_PORT", 3000),
            tokens: TokenSettings {
                access: kind_from_env("ACCESS_TOKEN_SECRET", "ACCESS_TOKEN_TTL_SECS", 900),
                refresh: kind_from_env("REFRESH_TOKEN_SECRET", "REFRESH_TOKEN_TTL_SECS", 604_800),
                register: kind_from_env(
                    "REGISTER_TOKEN_SECRET",
                    "REGISTER_TOKEN_TTL_SECS",
                    86_400,
                ),
                forget_password: kind_from_env(
                    "FORGET_PASSWORD_TOKEN_SECRET",
                    "FORGET_PASSWORD_TOKEN_TTL_SECS",
                    3_600,
                ),
            },
            web_url: std::env::var("WEB_URL").expect("WEB_URL"),
            web_verify_route: std::env::var("WEB_VERIFY_ROUTE")
                .unwrap_or_else(|_| "verify-email".to_owned()),
            web_forget_password_route: std::env::var("WEB_FORGET_PASSWORD_ROUTE")
                .unwrap_or_else(|_| "reset-password".to_owned()),
            google_userinfo_url: std::env::var("GOOGLE_USERINFO_URL")
                .unwrap_or_else(|_| DEFAULT_GOOGLE_USERINFO_URL.to_owned()),
            default_role: std::env::var("DEFAULT_ROLE").unwrap_or_else(|_| "user".to_owned()),
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|v| !v.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
            run_seeders: parse_or("RUN_SEEDERS", false),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn kind_from_env(secret_key: &str, ttl_key: &str, default_ttl: u64) -> KindSettings {
    KindSettings::new(
        std::env::var(secret_key).unwrap_or_else(|_| panic!("{secret_key}")),
        parse_or(ttl_key, default_ttl),
    )
}
