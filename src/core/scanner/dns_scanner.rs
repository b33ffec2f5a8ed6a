// src/core/scanner/dns_scanner.rs

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use strum::{AsRefStr, Display};
use tracing::{debug, info, warn};

use crate::core::models::DnsRecordSet;

/// Record types looked up for every target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum RecordType {
    A,
    #[strum(serialize = "MX")]
    Mx,
    #[strum(serialize = "NS")]
    Ns,
    #[strum(serialize = "TXT")]
    Txt,
}

impl RecordType {
    /// The numeric RR type used in DoH JSON answers.
    fn code(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Ns => 2,
            RecordType::Mx => 15,
            RecordType::Txt => 16,
        }
    }
}

// The subset of the DoH JSON response we care about.
#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: Option<u16>,
    data: String,
}

/// Resolves A, MX, NS and TXT records for `domain` over DNS-over-HTTPS.
///
/// The four lookups run concurrently and fail independently: a record type
/// whose lookup errors out is simply left empty.
pub async fn run_dns_scan(client: &Client, endpoint: &str, domain: &str, timeout: Duration) -> DnsRecordSet {
    info!(target = %domain, endpoint, "Starting DNS scan.");

    let (a_records, mx_records, ns_records, txt_records) = tokio::join!(
        lookup_or_empty(client, endpoint, domain, RecordType::A, timeout),
        lookup_or_empty(client, endpoint, domain, RecordType::Mx, timeout),
        lookup_or_empty(client, endpoint, domain, RecordType::Ns, timeout),
        lookup_or_empty(client, endpoint, domain, RecordType::Txt, timeout),
    );

    let results = DnsRecordSet {
        a_records,
        mx_records,
        txt_records,
        ns_records,
    };
    info!(
        a = results.a_records.len(),
        mx = results.mx_records.len(),
        ns = results.ns_records.len(),
        txt = results.txt_records.len(),
        "DNS scan finished."
    );
    results
}

async fn lookup_or_empty(
    client: &Client,
    endpoint: &str,
    domain: &str,
    record_type: RecordType,
    timeout: Duration,
) -> Vec<String> {
    match doh_lookup(client, endpoint, domain, record_type, timeout).await {
        Ok(records) => records,
        Err(e) => {
            warn!(target = %domain, record_type = %record_type, error = %e, "DNS lookup failed.");
            Vec::new()
        }
    }
}

/// Performs a single DoH JSON query.
async fn doh_lookup(
    client: &Client,
    endpoint: &str,
    domain: &str,
    record_type: RecordType,
    timeout: Duration,
) -> Result<Vec<String>, reqwest::Error> {
    debug!(target = %domain, record_type = %record_type, "Looking up DNS records.");

    let response = client
        .get(endpoint)
        .query(&[("name", domain), ("type", record_type.as_ref())])
        .header("Accept", "application/dns-json")
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .json::<DohResponse>()
        .await?;

    Ok(extract_records(response, record_type))
}

/// Keeps answers of the requested type; untyped answers are kept as-is.
fn extract_records(response: DohResponse, record_type: RecordType) -> Vec<String> {
    response
        .answer
        .into_iter()
        .filter(|answer| answer.record_type.is_none_or(|t| t == record_type.code()))
        .map(|answer| answer.data)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> DohResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_answer_section_is_empty() {
        let response = parse(r#"{"Status": 3, "Question": [{"name": "nope.invalid.", "type": 1}]}"#);
        assert!(extract_records(response, RecordType::A).is_empty());
    }

    #[test]
    fn cname_hops_are_not_reported_as_addresses() {
        let response = parse(
            r#"{"Status": 0, "Answer": [
                {"name": "www.example.com.", "type": 5, "TTL": 300, "data": "example.com."},
                {"name": "example.com.", "type": 1, "TTL": 300, "data": "93.184.216.34"}
            ]}"#,
        );
        assert_eq!(extract_records(response, RecordType::A), vec!["93.184.216.34"]);
    }

    #[test]
    fn untyped_answers_are_kept_in_order() {
        let response = parse(r#"{"Answer": [{"data": "10 mx1.example.com."}, {"data": "20 mx2.example.com."}]}"#);
        assert_eq!(
            extract_records(response, RecordType::Mx),
            vec!["10 mx1.example.com.", "20 mx2.example.com."]
        );
    }

    #[test]
    fn record_type_query_names() {
        assert_eq!(RecordType::A.as_ref(), "A");
        assert_eq!(RecordType::Mx.as_ref(), "MX");
        assert_eq!(RecordType::Ns.as_ref(), "NS");
        assert_eq!(RecordType::Txt.as_ref(), "TXT");
    }
}
