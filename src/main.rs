// src/main.rs

use std::io::Read;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use serde_json::json;
use tracing::{info, warn};

use sitescope::api::handle_request;
use sitescope::logging::initialize_logging;
use sitescope::{analyze_url, AnalyzerConfig};

#[derive(Debug, Parser)]
#[command(
    name = "sitescope",
    version,
    about = "Analyze a website's DNS, security headers, SEO and technologies"
)]
struct Cli {
    /// Site to analyze, e.g. `example.com` or `https://example.com/shop`.
    #[arg(value_name = "URL", required_unless_present = "request")]
    url: Option<String>,

    /// Read an `{"url": ...}` request from stdin and answer it as the web API would.
    #[arg(long, default_value_t = false, conflicts_with = "url")]
    request: bool,

    /// Print the JSON on a single line.
    #[arg(long, default_value_t = false)]
    compact: bool,

    #[arg(long, value_name = "URL")]
    doh_url: Option<String>,

    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    #[arg(long, value_name = "MS")]
    aux_timeout_ms: Option<u64>,

    #[arg(long, value_name = "MS")]
    dns_timeout_ms: Option<u64>,

    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Skip the TLS handshake that reads the certificate issuer and expiry.
    #[arg(long, default_value_t = false)]
    no_cert_inspection: bool,
}

impl Cli {
    fn config(&self) -> AnalyzerConfig {
        let mut config = AnalyzerConfig::from_env();
        if let Some(url) = &self.doh_url {
            config = config.with_doh_endpoint(url.clone());
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_page_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.aux_timeout_ms {
            config = config.with_auxiliary_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.dns_timeout_ms {
            config = config.with_dns_timeout(Duration::from_millis(ms));
        }
        if let Some(agent) = &self.user_agent {
            config = config.with_user_agent(agent.clone());
        }
        if self.no_cert_inspection {
            config = config.with_certificate_inspection(false);
        }
        config
    }
}

fn render(value: &serde_json::Value, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(rendered)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match initialize_logging() {
        Ok(path) => info!(log_file = %path.display(), "Logging initialized."),
        Err(e) => eprintln!("warning: file logging disabled: {e}"),
    }

    let config = cli.config();

    if cli.request {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        let response = handle_request("POST", &body, &config).await;
        if response.is_success() && !cli.compact {
            let value: serde_json::Value = serde_json::from_str(&response.body)?;
            println!("{}", render(&value, false)?);
        } else {
            println!("{}", response.body);
        }
        return Ok(if response.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let url = cli.url.as_deref().ok_or_else(|| eyre!("URL is required"))?;
    match analyze_url(url, &config).await {
        Ok(report) => {
            println!("{}", render(&serde_json::to_value(&report)?, cli.compact)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            warn!(error = %e, "Analysis failed.");
            println!("{}", render(&json!({ "error": e.to_string() }), cli.compact)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
