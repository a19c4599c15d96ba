use std::env;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file, or `:memory:` for a throwaway database.
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_path: env::var("DB_PATH")
                .unwrap_or_else(|_| "db/wins.db".into())
                .into(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .context("PORT must be a number")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            // In dev, also allow LAN access (e.g. testing from another device)
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|extra| split_origins(&extra))
                .unwrap_or_default(),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allowed_origins(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.frontend_url.as_str())
            .chain(self.cors_extra_origins.iter().map(String::as_str))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(crate::db::pool::MEMORY_PATH),
            host: "127.0.0.1".into(),
            port: 8080,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
