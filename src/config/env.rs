use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ApiBaseUrl,
    ApiToken,
    PageSize,
    RequestTimeoutSecs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ApiBaseUrl => "API_BASE_URL",
            EnvKey::ApiToken => "API_TOKEN",
            EnvKey::PageSize => "PAGE_SIZE",
            EnvKey::RequestTimeoutSecs => "REQUEST_TIMEOUT_SECS",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
