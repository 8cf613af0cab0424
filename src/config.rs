use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub site_url: String,
    pub oauth_provider: String,
    pub static_dir: String,
    pub cookie_secure: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let supabase_url = std::env::var("SUPABASE_URL").context("SUPABASE_URL is not set")?;
        let supabase_anon_key =
            std::env::var("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY is not set")?;

        Ok(Self {
            port,
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_anon_key,
            site_url: std::env::var("SITE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            oauth_provider: std::env::var("OAUTH_PROVIDER").unwrap_or_else(|_| "google".into()),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".into()),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            supabase_url: "http://localhost:54321".into(),
            supabase_anon_key: String::new(),
            site_url: "http://localhost:3000".into(),
            oauth_provider: "google".into(),
            static_dir: "public".into(),
            cookie_secure: false,
        }
    }
}
