//! Polling-based readiness checks against the node's HTTP API.

use std::fs;
use std::io;
use std::net::IpAddr;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::errors::{ReadinessError, ReadinessResult};
use crate::home;

pub const DEFAULT_API_URL: &str = "http://localhost:1317";

/// Bounds for the polling loop. The CLI uses the defaults; tests tighten
/// them.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// Overall wall-clock limit.
    pub timeout: Duration,
    /// Per-attempt HTTP timeout.
    pub attempt_timeout: Duration,
    /// Sleep between attempts.
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            attempt_timeout: Duration::from_secs(5),
            interval: Duration::from_secs(1),
        }
    }
}

/// The `[api]` section of app.toml; everything else in the file is ignored.
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    #[serde(default)]
    api: ApiSection,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSection {
    #[serde(default)]
    address: String,
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
}

/// Resolve the node API base URL.
///
/// An explicit value wins. Otherwise the configured `[api].address` from
/// `<home>/config/app.toml` is used; a missing file or empty address falls
/// back to [`DEFAULT_API_URL`].
pub fn resolve_api_url(explicit: Option<&str>, home: &Path) -> ReadinessResult<Url> {
    if let Some(value) = explicit {
        return Url::parse(value).map_err(|e| ReadinessError::InvalidApiUrl {
            value: value.to_string(),
            reason: e.to_string(),
        });
    }

    let path = home::app_config_file(home);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(default_api_url()),
        Err(source) => return Err(ReadinessError::ReadConfig { path, source }),
    };

    let config: AppConfig =
        toml::from_str(&text).map_err(|source| ReadinessError::ParseConfig { path, source })?;
    if config.api.address.is_empty() {
        return Ok(default_api_url());
    }
    listen_address_to_url(&config.api.address)
}

/// Turn a configured server *listen* address into a client-usable URL:
/// unspecified or loopback hosts become `localhost`, and any scheme other
/// than HTTPS is treated as plain HTTP.
fn listen_address_to_url(address: &str) -> ReadinessResult<Url> {
    let parsed = Url::parse(address).map_err(|e| ReadinessError::InvalidApiUrl {
        value: address.to_string(),
        reason: e.to_string(),
    })?;

    let scheme = if parsed.scheme().eq_ignore_ascii_case("https") {
        "https"
    } else {
        "http"
    };
    let host = parsed.host_str().unwrap_or("localhost");
    let host = match host.parse::<IpAddr>() {
        Ok(ip) if ip.is_unspecified() || ip.is_loopback() => "localhost",
        _ => host,
    };
    let rebuilt = match parsed.port() {
        Some(port) => format!("{scheme}://{host}:{port}"),
        None => format!("{scheme}://{host}"),
    };
    Url::parse(&rebuilt).map_err(|e| ReadinessError::InvalidApiUrl {
        value: rebuilt,
        reason: e.to_string(),
    })
}

/// Poll the staking API until the validator is present on chain.
///
/// 200 means ready; 400 is a hard failure carrying the response body; any
/// other status or transport error is retried on a fixed interval until the
/// wall-clock timeout runs out.
pub fn await_validator(api: &Url, address: &str, settings: &PollSettings) -> ReadinessResult<()> {
    let client = Client::builder().timeout(settings.attempt_timeout).build()?;

    let mut endpoint = api.clone();
    endpoint
        .path_segments_mut()
        .map_err(|_| ReadinessError::InvalidApiUrl {
            value: api.to_string(),
            reason: "cannot be a base URL".to_string(),
        })?
        .pop_if_empty()
        .extend(["cosmos", "staking", "v1beta1", "validators", address]);
    debug!("polling {endpoint}");

    let start = Instant::now();
    loop {
        match client.get(endpoint.clone()).send() {
            Ok(response) => {
                let status = response.status();
                let body = response.text()?;
                match status {
                    StatusCode::OK => {
                        debug!("validator {address} is available");
                        return Ok(());
                    }
                    StatusCode::BAD_REQUEST => return Err(ReadinessError::BadRequest(body)),
                    _ => debug!("validator not available yet (status {status})"),
                }
            }
            Err(e) => debug!("validator query failed, will retry: {e}"),
        }

        if start.elapsed() >= settings.timeout {
            return Err(ReadinessError::Timeout(settings.timeout));
        }
        thread::sleep(settings.interval);
    }
}
