use crate::cep::Cep;
use crate::provider::model::{Address, Provider};
use crate::race::{Outcome, ProviderFailure};

pub const INVALID_CEP: &str = "CEP inválido";
pub const NOT_FOUND: &str = "Erro! Nenhum endereço encontrado";
pub const USAGE: &str = concat!("uso: ", env!("CARGO_PKG_NAME"), " <CEP>");

pub fn searching(cep: &Cep) -> String {
    format!("Buscando CEP: {}", cep)
}

pub fn failure(failure: &ProviderFailure) -> String {
    format!("Erro ao buscar CEP ({}): {}", failure.provider, failure.error)
}

/// console lines for the final state of a race
pub fn outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::BrasilApi(record) => address(Provider::BrasilApi, &record.clone().into()),
        Outcome::ViaCep(record) => address(Provider::ViaCep, &record.clone().into()),
        Outcome::TimedOut(_) | Outcome::AllFailed(_) => NOT_FOUND.to_string(),
    }
}

fn address(provider: Provider, address: &Address) -> String {
    format!(
        "Endereço encontrado pela {}\nCEP: {}\nEstado: {}\nCidade: {}\nBairro: {}\nRua: {}",
        provider,
        address.cep,
        address.state,
        address.city,
        address.neighborhood,
        address.street,
    )
}
