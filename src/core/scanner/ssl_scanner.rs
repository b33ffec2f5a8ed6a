// src/core/scanner/ssl_scanner.rs

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use native_tls::TlsConnector;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, warn};
use x509_parser::prelude::*;

use crate::core::models::{CertificateInfo, Grade, NormalizedTarget, SslInfo};

/// Whether the site counts as served over valid TLS.
///
/// The main-page client verifies certificate chains, so an https fetch that
/// succeeded implies a certificate the client accepted.
pub fn ssl_is_valid(target: &NormalizedTarget, main_fetch_failed: bool) -> bool {
    target.is_https() && !main_fetch_failed
}

/// Builds the `ssl` block of the report.
///
/// `protocol` is left unknown: the handshake library does not expose the
/// negotiated version.
pub fn build_ssl_info(valid: bool, certificate: Option<&CertificateInfo>) -> SslInfo {
    SslInfo {
        valid,
        issuer: certificate.map(|c| c.issuer_name.clone()),
        expires_at: certificate.map(|c| c.not_after.to_rfc3339_opts(SecondsFormat::Secs, true)),
        grade: if valid { Grade::A } else { Grade::F },
        protocol: None,
    }
}

/// Reads the leaf certificate of an https target.
///
/// Returns `None` for http targets, on any connection, handshake or parse
/// failure, and when the deadline passes.
pub async fn inspect_certificate(target: &NormalizedTarget, timeout: Duration) -> Option<CertificateInfo> {
    if !target.is_https() {
        debug!(target = %target.domain, "Skipping certificate inspection for plain http target.");
        return None;
    }

    info!(target = %target.domain, port = target.port, "Starting certificate inspection.");
    let host = target.domain.clone();
    let port = target.port;

    debug!("Spawning blocking task for TLS connection.");
    let task = spawn_blocking(move || perform_tls_scan(&host, port, timeout));

    let scan_result = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            error!(panic = %e, "Blocking certificate inspection task panicked!");
            Err(format!("Task panicked: {}", e))
        }
        Err(_) => Err(format!("Timed out after {} ms", timeout.as_millis())),
    };

    match scan_result {
        Ok(info) => {
            info!(issuer = %info.issuer_name, days_until_expiry = info.days_until_expiry, "Certificate inspection finished.");
            Some(info)
        }
        Err(e) => {
            warn!(target = %target.domain, error = %e, "Certificate inspection failed.");
            None
        }
    }
}

fn perform_tls_scan(host: &str, port: u16, timeout: Duration) -> Result<CertificateInfo, String> {
    debug!(host, port, "Performing TLS connection and handshake.");

    // Inspection only: the chain is read even when it would not validate.
    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
        .map_err(|e| format!("TlsConnector Error: {}", e))?;

    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|e| format!("Address resolution error: {}", e))?
        .next()
        .ok_or_else(|| format!("No address found for {}", host))?;

    let stream = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|e| format!("TCP Connection Error: {}", e))?;
    stream
        .set_read_timeout(Some(timeout))
        .and_then(|_| stream.set_write_timeout(Some(timeout)))
        .map_err(|e| format!("Socket configuration error: {}", e))?;

    let stream = connector
        .connect(host, stream)
        .map_err(|e| format!("TLS Handshake Error: {}", e))?;

    let cert = stream
        .peer_certificate()
        .map_err(|e| format!("Could not get peer certificate: {}", e))?
        .ok_or_else(|| "Server did not provide a certificate.".to_string())?;

    let cert_der = cert
        .to_der()
        .map_err(|e| format!("Could not convert certificate to DER: {}", e))?;

    certificate_info_from_der(&cert_der, Utc::now())
}

/// Extracts subject, issuer and validity window from a DER certificate.
fn certificate_info_from_der(der: &[u8], now: DateTime<Utc>) -> Result<CertificateInfo, String> {
    let (_, x509) = parse_x509_certificate(der).map_err(|e| format!("X.509 Parse Error: {}", e))?;

    let validity = x509.validity();
    let not_before = asn1_time_to_chrono_utc(&validity.not_before);
    let not_after = asn1_time_to_chrono_utc(&validity.not_after);

    Ok(CertificateInfo {
        subject_name: x509.subject().to_string(),
        issuer_name: x509.issuer().to_string(),
        not_before,
        not_after,
        days_until_expiry: not_after.signed_duration_since(now).num_days(),
    })
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}
