use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_UPSTREAM_URL: &str = "https://sender.uazapi.com/send/media";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub upstream_url: String,
    pub max_body_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            upstream_url: env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string()),
            max_body_size: env::var("MAX_BODY_SIZE")
                .unwrap_or_else(|_| "52428800".to_string()) // 50MB default
                .parse()
                .context("MAX_BODY_SIZE must be a valid integer")?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.upstream_url)
            .with_context(|| format!("UPSTREAM_URL is not a valid URL: {}", self.upstream_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!(
                "UPSTREAM_URL must use http or https, got {}",
                url.scheme()
            ));
        }
        if self.max_body_size == 0 {
            return Err(anyhow::anyhow!("MAX_BODY_SIZE must be greater than zero"));
        }
        Ok(())
    }
}
