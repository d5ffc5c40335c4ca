use std::time::Duration;

use log::*;

pub const DEFAULT_DIGIFLAZZ_URL: &str = "https://api.digiflazz.com/v1";
pub const DEFAULT_NICKNAME_URL: &str = "https://api.isan.eu.org/nickname";
pub const DEFAULT_VENDOR_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct DigiflazzConfig {
    pub base_url: String,
    pub nickname_url: String,
    pub timeout: Duration,
}

impl Default for DigiflazzConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIGIFLAZZ_URL.to_string(),
            nickname_url: DEFAULT_NICKNAME_URL.to_string(),
            timeout: DEFAULT_VENDOR_TIMEOUT,
        }
    }
}

impl DigiflazzConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("TOPUP_DIGIFLAZZ_URL").unwrap_or_else(|_| {
            info!("🪛️ TOPUP_DIGIFLAZZ_URL not set, using {DEFAULT_DIGIFLAZZ_URL}");
            DEFAULT_DIGIFLAZZ_URL.to_string()
        });
        let nickname_url = std::env::var("TOPUP_NICKNAME_URL").unwrap_or_else(|_| {
            info!("🪛️ TOPUP_NICKNAME_URL not set, using {DEFAULT_NICKNAME_URL}");
            DEFAULT_NICKNAME_URL.to_string()
        });
        let timeout = std::env::var("TOPUP_VENDOR_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid value for TOPUP_VENDOR_TIMEOUT: {s}. {e}"))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_VENDOR_TIMEOUT);
        Self { base_url: trim_slash(base_url), nickname_url: trim_slash(nickname_url), timeout }
    }

    pub fn with_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = trim_slash(url.into());
        self
    }

    pub fn with_nickname_url<S: Into<String>>(mut self, url: S) -> Self {
        self.nickname_url = trim_slash(url.into());
        self
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
