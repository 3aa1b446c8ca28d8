use once_cell::sync::Lazy;
use std::env;

/// Process configuration, loaded once from the environment.
///
/// `DATABASE_URL` is deliberately not part of this struct: it is read by
/// `database::connect` at startup, where a missing value is fatal.
/// Everything here has a workable default or is only required lazily
/// (`jwt_secret` is checked at token verification time).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub public_url: String,
    pub upload_dir: String,
    pub jwt_secret: String,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(4000);

        let public_url = env::var("PUBLIC_URL")
            .map(|s| trim_trailing_slash(&s))
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        Self {
            port,
            public_url,
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            max_upload_bytes: env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
        }
    }
}

fn trim_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
