use crate::config::env::{self, EnvKey};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            api_base_url: env::get(EnvKey::ApiBaseUrl)?,
            api_token: env::get(EnvKey::ApiToken).ok(),
            page_size: env::get_parsed(EnvKey::PageSize, 20),
            request_timeout_secs: env::get_parsed(EnvKey::RequestTimeoutSecs, 30),
        })
    }
}
