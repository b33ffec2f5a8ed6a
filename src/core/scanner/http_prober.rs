// src/core/scanner/http_prober.rs

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::AnalyzerConfig;
use crate::core::error::AnalysisResult;
use crate::core::models::HttpProbeResult;

const INVALID_UTF8_PLACEHOLDER: &str = "[Invalid UTF-8]";

/// Builds the HTTP client shared by every probe of one analysis.
///
/// Per-probe deadlines are enforced in [`probe`], so the client itself carries
/// no global timeout.
pub fn build_client(config: &AnalyzerConfig) -> AnalysisResult<Client> {
    let client = Client::builder().user_agent(config.user_agent.as_str()).build()?;
    Ok(client)
}

/// Flattens a `HeaderMap` into lowercased name → value pairs.
///
/// Repeated headers are joined with `", "`. Values that are not valid UTF-8
/// keep a placeholder so that presence checks still see the header.
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = match value.to_str() {
            Ok(s) => s.to_string(),
            Err(_) => {
                warn!(header_name = %name, "Header found but contained invalid UTF-8.");
                INVALID_UTF8_PLACEHOLDER.to_string()
            }
        };
        collected
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    collected
}

/// Fetches `url` with a hard deadline covering headers and body.
///
/// Never fails: network errors, body read errors and timeouts all come back as
/// a result with `fetch_failed` set and the elapsed time recorded.
pub async fn probe(client: &Client, url: &str, timeout: Duration) -> HttpProbeResult {
    debug!(url, timeout_ms = timeout.as_millis() as u64, "Starting HTTP probe.");
    let started = Instant::now();

    let exchange = async {
        let response = client.get(url).send().await?;
        let status = response.status();
        let headers = collect_headers(response.headers());
        let body = response.text().await?;
        Ok::<_, reqwest::Error>((status, headers, body))
    };

    let outcome = tokio::time::timeout(timeout, exchange).await;
    let elapsed = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(Ok((status, headers, body))) => {
            info!(url, status = %status, elapsed_ms = elapsed, bytes = body.len(), "HTTP probe completed.");
            HttpProbeResult {
                status_ok: status.is_success(),
                status_code: Some(status.as_u16()),
                headers,
                body,
                response_time_ms: elapsed,
                fetch_failed: false,
            }
        }
        Ok(Err(e)) => {
            warn!(url, error = %e, elapsed_ms = elapsed, "HTTP probe failed.");
            HttpProbeResult::failed(elapsed)
        }
        Err(_) => {
            warn!(url, elapsed_ms = elapsed, "HTTP probe timed out.");
            HttpProbeResult::failed(elapsed)
        }
    }
}

/// Probes a well-known path and only reports whether it answered 2xx.
pub async fn probe_reachable(client: &Client, url: &str, timeout: Duration) -> bool {
    let result = probe(client, url, timeout).await;
    debug!(url, reachable = result.status_ok, "Auxiliary path probed.");
    result.status_ok
}
