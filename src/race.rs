use std::future::Future;
use std::time::Duration;
use log::{debug, warn};
use tokio::sync::oneshot;
use tokio::time::{self, Instant};
use crate::config::DEFAULT_TIMEOUT;
use crate::error::LookupError;
use crate::provider::model::{BrasilApiAddress, Provider, ViaCepAddress};

/// What to do once every provider has failed before the deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaceMode {
    /// keep waiting until the deadline, then report a timeout
    #[default]
    WaitForTimeout,
    /// report [`Outcome::AllFailed`] as soon as the last provider fails
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceSettings {
    /// wall-clock bound, measured from the start of the race
    pub timeout: Duration,
    pub mode: RaceMode,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            mode: RaceMode::default(),
        }
    }
}

#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: Provider,
    pub error: LookupError,
}

/// Terminal state of a race
#[derive(Debug)]
pub enum Outcome {
    BrasilApi(BrasilApiAddress),
    ViaCep(ViaCepAddress),
    /// the deadline passed with no successful answer
    TimedOut(Vec<ProviderFailure>),
    /// every provider failed, only produced in [`RaceMode::FailFast`]
    AllFailed(Vec<ProviderFailure>),
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::BrasilApi(_) | Outcome::ViaCep(_))
    }
}

/// Run both lookups concurrently and keep the first successful answer.
///
/// Each lookup runs in its own task and hands its result over a oneshot
/// channel. The loser is never cancelled: it runs to completion and its
/// result is dropped with the channel. `on_failure` is called once per
/// failed provider, as soon as the failure arrives.
pub async fn race<A, B, F>(
    brasil_api: A,
    via_cep: B,
    settings: &RaceSettings,
    mut on_failure: F,
) -> Outcome
where
    A: Future<Output = Result<BrasilApiAddress, LookupError>> + Send + 'static,
    B: Future<Output = Result<ViaCepAddress, LookupError>> + Send + 'static,
    F: FnMut(&ProviderFailure),
{
    let deadline = Instant::now() + settings.timeout;

    let mut brasil_api_rx = spawn_lookup(Provider::BrasilApi, brasil_api);
    let mut via_cep_rx = spawn_lookup(Provider::ViaCep, via_cep);
    let mut brasil_api_pending = true;
    let mut via_cep_pending = true;

    let timer = time::sleep_until(deadline);
    tokio::pin!(timer);

    let mut failures = Vec::new();

    loop {
        if !brasil_api_pending && !via_cep_pending && settings.mode == RaceMode::FailFast {
            debug!("all providers failed, not waiting for the deadline");
            return Outcome::AllFailed(failures);
        }

        tokio::select! {
            biased;

            res = &mut brasil_api_rx, if brasil_api_pending => {
                brasil_api_pending = false;
                match res.unwrap_or(Err(LookupError::Abandoned)) {
                    Ok(record) => return Outcome::BrasilApi(record),
                    Err(error) => {
                        let failure = ProviderFailure { provider: Provider::BrasilApi, error };
                        on_failure(&failure);
                        failures.push(failure);
                    }
                }
            }
            res = &mut via_cep_rx, if via_cep_pending => {
                via_cep_pending = false;
                match res.unwrap_or(Err(LookupError::Abandoned)) {
                    Ok(record) => return Outcome::ViaCep(record),
                    Err(error) => {
                        let failure = ProviderFailure { provider: Provider::ViaCep, error };
                        on_failure(&failure);
                        failures.push(failure);
                    }
                }
            }
            _ = &mut timer => {
                warn!("{}", LookupError::Timeout(settings.timeout));
                return Outcome::TimedOut(failures);
            }
        }
    }
}

fn spawn_lookup<T, Fut>(provider: Provider, lookup: Fut) -> oneshot::Receiver<Result<T, LookupError>>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, LookupError>> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let res = lookup.await;
        if let Err(e) = &res {
            debug!("[{}] lookup failed: {}", provider, e);
        }
        if tx.send(res).is_err() {
            debug!("[{}] answered after the race was decided, discarding", provider);
        }
    });
    rx
}
