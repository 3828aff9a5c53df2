use std::path::PathBuf;

use anyhow::{anyhow, Context};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_BASE: &str = "https://api.twilio.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub public_dir: PathBuf,
    /// Overrides the `https://{Host}` base used to build audio URLs.
    pub public_base_url: Option<String>,
    pub max_upload_bytes: usize,
    pub twilio: TwilioConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| anyhow!("{} must be set", key));

        let port = match get("PORT") {
            Some(p) => p.parse().with_context(|| format!("invalid PORT: {}", p))?,
            None => DEFAULT_PORT,
        };
        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(v) => v
                .parse()
                .with_context(|| format!("invalid MAX_UPLOAD_BYTES: {}", v))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            port,
            upload_dir: get("UPLOAD_DIR").unwrap_or_else(|| "uploads".into()).into(),
            public_dir: get("PUBLIC_DIR").unwrap_or_else(|| "public".into()).into(),
            public_base_url: get("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            max_upload_bytes,
            twilio: TwilioConfig {
                account_sid: required("TWILIO_ACCOUNT_SID")?,
                auth_token: required("TWILIO_AUTH_TOKEN")?,
                from_number: required("TWILIO_PHONE_NUMBER")?,
                api_base: get("TWILIO_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
            },
        })
    }
}
