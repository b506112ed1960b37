use log::{debug, info};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use crate::cep::Cep;
use crate::config::Config;
use crate::error::LookupError;
use crate::provider::model::{BrasilApiAddress, ViaCepAddress};
use crate::utils::{decode_object, join_url};

pub mod model;

const UA: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by both CEP providers
#[derive(Clone)]
pub struct ProviderClient {
    client: Client,
    brasil_api_url: String,
    via_cep_url: String,
}

impl ProviderClient {
    pub fn new(config: &Config) -> color_eyre::Result<Self> {
        let client = Client::builder()
            .default_headers(Self::default_headers())
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            brasil_api_url: config.brasil_api_url.clone(),
            via_cep_url: config.via_cep_url.clone(),
        }
    }

    fn default_headers() -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(USER_AGENT, HeaderValue::from_static(UA));
        map.insert(ACCEPT, HeaderValue::from_static("application/json"));
        map
    }

    #[tracing::instrument(skip_all, fields(cep = %cep))]
    pub async fn fetch_brasil_api(&self, cep: &Cep) -> Result<BrasilApiAddress, LookupError> {
        let url = join_url(&self.brasil_api_url, &format!("api/cep/v1/{}", cep));
        self.fetch_json(&url).await
    }

    #[tracing::instrument(skip_all, fields(cep = %cep))]
    pub async fn fetch_via_cep(&self, cep: &Cep) -> Result<ViaCepAddress, LookupError> {
        let url = join_url(&self.via_cep_url, &format!("ws/{}/json", cep));
        let record: ViaCepAddress = self.fetch_json(&url).await?;
        if record.is_not_found() {
            return Err(LookupError::NotFound);
        }
        Ok(record)
    }

    /// GET `url`, read the whole body, then decode it as a JSON object
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        info!("requesting [{}]", url);
        let resp = self.client
            .get(url)
            .send()
            .await
            .map_err(LookupError::Network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status { status, url: url.to_string() });
        }

        let body = resp.bytes().await.map_err(LookupError::Io)?;
        debug!("[{}] answered {} with {} bytes", url, status, body.len());
        Ok(decode_object(&body)?)
    }
}
