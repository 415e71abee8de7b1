//! pantry host entry point.
//!
//! Boots the offline cache agent against the configured origin, then reads
//! request lines from stdin and answers each with one outcome line on
//! stdout. Logging goes to stderr so stdout stays a clean outcome stream.

use anyhow::Result;
use pantry_agent::{
    Destination, FetchOutcome, FetchRequest, HostRuntime, Notification, OfflineCacheAgent, ServeSource,
};
use pantry_client::{FetchClient, FetchConfig, Method, Network};
use pantry_core::{AppConfig, CacheStorage};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Host runtime that narrates agent requests into the log.
struct LoggingHost;

#[async_trait::async_trait]
impl HostRuntime for LoggingHost {
    async fn skip_waiting(&self) {
        tracing::info!("host: skip waiting");
    }

    async fn claim_clients(&self) {
        tracing::info!("host: claiming clients");
    }

    async fn show_notification(&self, notification: &Notification) {
        tracing::info!(title = %notification.title, body = %notification.body, "host: showing notification");
    }

    async fn close_notification(&self) {
        tracing::info!("host: closing notification");
    }

    async fn open_window(&self, url: &Url) {
        tracing::info!(%url, "host: opening window");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(origin = %config.origin, generation = %config.current_generation, "starting pantry host");

    let cache = CacheStorage::open(&config.db_path).await?;
    let fetch_config = FetchConfig {
        user_agent: config.user_agent.clone(),
        timeout: config.timeout(),
        max_redirects: config.max_redirects,
    };
    let network: Arc<dyn Network> = Arc::new(FetchClient::new(fetch_config)?);
    let agent = OfflineCacheAgent::new(cache.clone(), network, Arc::new(LoggingHost), &config)?;

    agent.resume().await?;

    let shell_entries = cache.entry_count(agent.generation()).await?;
    tracing::info!(generation = %agent.generation(), entries = shell_entries, "cache ready");

    serve_stdin(&agent).await
}

/// Read "METHOD URL [destination]" lines until stdin closes.
async fn serve_stdin(agent: &OfflineCacheAgent) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_request(line) {
            Ok(request) => match agent.handle_fetch(&request).await {
                Ok(outcome) => println!("{}", describe_outcome(&request, &outcome)),
                Err(err) => {
                    tracing::error!(error = %err, "fetch handling failed");
                    println!("error {err}");
                }
            },
            Err(reason) => {
                tracing::warn!(line, reason, "unparseable request line");
                println!("error {reason}");
            }
        }
    }

    Ok(())
}

/// Parse one "METHOD URL [destination]" request line.
fn parse_request(line: &str) -> Result<FetchRequest, &'static str> {
    let mut parts = line.split_whitespace();
    let method = parts.next().ok_or("missing method")?;
    let url = parts.next().ok_or("missing URL")?;
    let destination = parts.next().map_or(Destination::Other, parse_destination);

    let method: Method = method.parse().map_err(|_| "unrecognized method")?;
    let url = Url::parse(url).map_err(|_| "invalid URL")?;

    Ok(FetchRequest::with_destination(method, url, destination))
}

fn parse_destination(keyword: &str) -> Destination {
    match keyword {
        "document" => Destination::Document,
        "style" => Destination::Style,
        "script" => Destination::Script,
        "image" => Destination::Image,
        "font" => Destination::Font,
        "manifest" => Destination::Manifest,
        _ => Destination::Other,
    }
}

/// One line per outcome: what happened and where the response came from.
fn describe_outcome(request: &FetchRequest, outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::PassThrough => format!("passthrough {}", request.url),
        FetchOutcome::Served { response, source, .. } => {
            format!("served {} {} {} {}b", request.url, source_keyword(*source), response.status, response.body.len())
        }
        FetchOutcome::Unavailable => format!("unavailable {}", request.url),
    }
}

fn source_keyword(source: ServeSource) -> &'static str {
    match source {
        ServeSource::Cache => "cache",
        ServeSource::Network => "network",
        ServeSource::DocumentFallback => "fallback",
        ServeSource::OfflinePlaceholder => "placeholder",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_agent::ServedResponse;

    #[test]
    fn test_parse_request_with_destination() {
        let request = parse_request("GET http://localhost:8080/ document").unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url.as_str(), "http://localhost:8080/");
        assert_eq!(request.destination, Destination::Document);
    }

    #[test]
    fn test_parse_request_defaults_destination() {
        let request = parse_request("GET http://localhost:8080/styles.css").unwrap();
        assert_eq!(request.destination, Destination::Other);
    }

    #[test]
    fn test_parse_request_rejects_bad_url() {
        assert!(parse_request("GET not-a-url").is_err());
    }

    #[test]
    fn test_parse_request_rejects_missing_url() {
        assert!(parse_request("GET").is_err());
    }

    #[test]
    fn test_describe_served_outcome() {
        let request = parse_request("GET http://localhost:8080/extra.css style").unwrap();
        let outcome = FetchOutcome::Served {
            response: ServedResponse::offline_placeholder(),
            source: ServeSource::OfflinePlaceholder,
            cache_write: None,
        };

        let line = describe_outcome(&request, &outcome);
        assert_eq!(line, "served http://localhost:8080/extra.css placeholder 503 7b");
    }

    #[test]
    fn test_describe_passthrough_outcome() {
        let request = parse_request("POST http://localhost:8080/api/favorites").unwrap();
        let line = describe_outcome(&request, &FetchOutcome::PassThrough);
        assert_eq!(line, "passthrough http://localhost:8080/api/favorites");
    }
}
