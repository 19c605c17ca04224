use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub cors_origin: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host: IpAddr =
            lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()).parse().context("HOST")?;
        let port: u16 =
            lookup("PORT").unwrap_or_else(|| "5000".to_string()).parse().context("PORT")?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://movies.db?mode=rwc".to_string());

        let upload_dir: PathBuf =
            lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()).into();

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        let max_upload_bytes: usize = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse().context("MAX_UPLOAD_BYTES")?,
            None => 10 * 1024 * 1024,
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
            database_url,
            upload_dir,
            cors_origin,
            max_upload_bytes,
        })
    }
}
