use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::utils::null_as_empty;

/// The lookup services raced against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    BrasilApi,
    ViaCep,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::BrasilApi => f.write_str("Brasil API"),
            Provider::ViaCep => f.write_str("Via CEP API"),
        }
    }
}

/// The fields printed for a resolved CEP, whichever provider answered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub cep: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
}

/// Response of `GET /api/cep/v1/{cep}` on BrasilAPI
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrasilApiAddress {
    #[serde(deserialize_with = "null_as_empty")]
    pub cep: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub street: String,
    /// upstream service BrasilAPI took the answer from
    #[serde(deserialize_with = "null_as_empty")]
    pub service: String,
}

/// Response of `GET /ws/{cep}/json` on ViaCEP
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViaCepAddress {
    #[serde(deserialize_with = "null_as_empty")]
    pub cep: String,
    #[serde(rename = "logradouro", deserialize_with = "null_as_empty")]
    pub street: String,
    #[serde(rename = "complemento", deserialize_with = "null_as_empty")]
    pub complement: String,
    #[serde(rename = "bairro", deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(rename = "localidade", deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(rename = "uf", deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ibge: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub gia: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ddd: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub siafi: String,
    /// set by ViaCEP when the CEP does not exist, as `true` or `"true"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erro: Option<Value>,
}

impl ViaCepAddress {
    pub fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

impl From<BrasilApiAddress> for Address {
    fn from(record: BrasilApiAddress) -> Self {
        Self {
            cep: record.cep,
            state: record.state,
            city: record.city,
            neighborhood: record.neighborhood,
            street: record.street,
        }
    }
}

impl From<ViaCepAddress> for Address {
    fn from(record: ViaCepAddress) -> Self {
        Self {
            cep: record.cep,
            state: record.state,
            city: record.city,
            neighborhood: record.neighborhood,
            street: record.street,
        }
    }
}
