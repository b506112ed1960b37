use std::process::ExitCode;
use log::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use crate::cep::Cep;
use crate::config::Config;
use crate::provider::ProviderClient;
use crate::error::LookupError;
use crate::race::{race, Outcome, RaceSettings};

mod cep;
mod config;
mod error;
mod output;
mod provider;
mod race;
mod utils;

/// How a run ended, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Found,
    NotFound,
    Usage,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Found => ExitCode::SUCCESS,
            Exit::NotFound => ExitCode::from(1),
            Exit::Usage => ExitCode::from(2),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    if let Err(e) = color_eyre::install() {
        error!("Error: {:?}", e);
    }

    match run_with(std::env::args(), connect).await {
        Ok(exit) => exit.into(),
        Err(e) => {
            error!("Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// stderr logging, `RUST_LOG` overrides the default `warn` level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .init();
}

/// load configuration from the environment and build the HTTP client
fn connect() -> color_eyre::Result<(ProviderClient, RaceSettings)> {
    let config = Config::from_env()?;
    let client = ProviderClient::new(&config)?;
    Ok((client, config.race))
}

/// * `args` - the process arguments, program name included
/// * `connect` - only called once the CEP is valid
async fn run_with<I, C>(args: I, connect: C) -> color_eyre::Result<Exit>
where
    I: IntoIterator<Item = String>,
    C: FnOnce() -> color_eyre::Result<(ProviderClient, RaceSettings)>,
{
    let cep = match Cep::from_args(args) {
        Ok(cep) => cep,
        Err(e) => {
            info!("rejected input: {}", e);
            match e {
                LookupError::MissingArgument => eprintln!("{}", output::USAGE),
                _ => println!("{}", output::INVALID_CEP),
            }
            return Ok(Exit::Usage);
        }
    };

    let (client, settings) = connect()?;

    println!("{}", output::searching(&cep));

    let brasil_api = {
        let client = client.clone();
        let cep = cep.clone();
        async move { client.fetch_brasil_api(&cep).await }
    };
    let via_cep = {
        let client = client.clone();
        let cep = cep.clone();
        async move { client.fetch_via_cep(&cep).await }
    };

    let outcome = race(brasil_api, via_cep, &settings, |failure| {
        println!("{}", output::failure(failure));
    }).await;

    println!("{}", output::outcome(&outcome));

    if let Outcome::TimedOut(failures) | Outcome::AllFailed(failures) = &outcome {
        info!("no address for [{}], {} provider(s) failed", cep, failures.len());
    }

    if outcome.is_found() {
        Ok(Exit::Found)
    } else {
        Ok(Exit::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use reqwest::Client;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::time::Instant;
    use crate::race::RaceMode;
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(300);

    /// answer every connection with `status_line` and `body`, counting connections
    async fn provider(status_line: &'static str, body: &'static str) -> (SocketAddr, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status_line,
                        body.len(),
                        body,
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        (addr, hits)
    }

    fn local_client(brasil_api: SocketAddr, via_cep: SocketAddr) -> ProviderClient {
        let config = Config {
            brasil_api_url: format!("http://{}", brasil_api),
            via_cep_url: format!("http://{}", via_cep),
            ..Default::default()
        };
        ProviderClient::with_client(Client::builder().no_proxy().build().unwrap(), &config)
    }

    fn args(cep: &str) -> Vec<String> {
        vec!["cep-race".to_string(), cep.to_string()]
    }

    fn settings() -> RaceSettings {
        RaceSettings { timeout: TIMEOUT, mode: RaceMode::WaitForTimeout }
    }

    #[tokio::test]
    async fn invalid_cep_makes_no_request() {
        let (brasil_api, brasil_api_hits) = provider("200 OK", "{}").await;
        let (via_cep, via_cep_hits) = provider("200 OK", "{}").await;
        let mut connected = false;

        let exit = run_with(args("0131010"), || {
            connected = true;
            Ok((local_client(brasil_api, via_cep), settings()))
        }).await.unwrap();

        assert_eq!(exit, Exit::Usage);
        assert!(!connected);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(brasil_api_hits.load(Ordering::SeqCst), 0);
        assert_eq!(via_cep_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_cep_is_a_usage_error() {
        let exit = run_with(vec!["cep-race".to_string()], || -> color_eyre::Result<_> {
            panic!("must not connect without a CEP")
        }).await.unwrap();
        assert_eq!(exit, Exit::Usage);
    }

    #[tokio::test]
    async fn both_not_found_waits_for_the_deadline() {
        let (brasil_api, brasil_api_hits) = provider("404 Not Found", r#"{"message":"CEP não encontrado"}"#).await;
        let (via_cep, via_cep_hits) = provider("404 Not Found", "{}").await;

        let start = Instant::now();
        let exit = run_with(args("00000000"), || Ok((local_client(brasil_api, via_cep), settings())))
            .await
            .unwrap();

        assert_eq!(exit, Exit::NotFound);
        assert!(start.elapsed() >= TIMEOUT, "{:?}", start.elapsed());
        assert_eq!(brasil_api_hits.load(Ordering::SeqCst), 1);
        assert_eq!(via_cep_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn answered_lookup_exits_found() {
        let (brasil_api, _) = provider(
            "200 OK",
            r#"{"cep":"01310-100","state":"SP","city":"São Paulo","neighborhood":"Bela Vista","street":"Avenida Paulista","service":"x"}"#,
        ).await;
        let (via_cep, _) = provider("404 Not Found", "{}").await;

        let exit = run_with(args("01310100"), || Ok((local_client(brasil_api, via_cep), settings())))
            .await
            .unwrap();
        assert_eq!(exit, Exit::Found);
    }
}
