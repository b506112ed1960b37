use std::time::Duration;
use color_eyre::eyre::{eyre, WrapErr};
use crate::race::{RaceMode, RaceSettings};

pub const DEFAULT_BRASIL_API_URL: &str = "https://brasilapi.com.br";
pub const DEFAULT_VIA_CEP_URL: &str = "http://viacep.com.br";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

const BRASIL_API_URL_VAR: &str = "CEP_BRASIL_API_URL";
const VIA_CEP_URL_VAR: &str = "CEP_VIA_CEP_URL";
const TIMEOUT_VAR: &str = "CEP_TIMEOUT_MS";
const FAIL_FAST_VAR: &str = "CEP_FAIL_FAST";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// base URL of BrasilAPI
    pub brasil_api_url: String,
    /// base URL of ViaCEP
    pub via_cep_url: String,
    pub race: RaceSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brasil_api_url: DEFAULT_BRASIL_API_URL.to_string(),
            via_cep_url: DEFAULT_VIA_CEP_URL.to_string(),
            race: RaceSettings::default(),
        }
    }
}

impl Config {
    /// load overrides from environment variables
    ///
    /// `CEP_BRASIL_API_URL`, `CEP_VIA_CEP_URL`, `CEP_TIMEOUT_MS`, `CEP_FAIL_FAST`
    pub fn from_env() -> color_eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> color_eyre::Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(BRASIL_API_URL_VAR) {
            config.brasil_api_url = url;
        }
        if let Some(url) = lookup(VIA_CEP_URL_VAR) {
            config.via_cep_url = url;
        }
        if let Some(ms) = lookup(TIMEOUT_VAR) {
            let ms = ms.trim()
                .parse::<u64>()
                .wrap_err_with(|| format!("`{}` must be a number of milliseconds, got [{}]", TIMEOUT_VAR, ms))?;
            config.race.timeout = Duration::from_millis(ms);
        }
        if let Some(flag) = lookup(FAIL_FAST_VAR) {
            config.race.mode = match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => RaceMode::FailFast,
                "" | "0" | "false" | "no" => RaceMode::WaitForTimeout,
                _ => return Err(eyre!("`{}` must be a boolean, got [{}]", FAIL_FAST_VAR, flag)),
            };
        }
        Ok(config)
    }
}
