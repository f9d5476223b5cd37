//! Remote spreadsheet sink.
//!
//! One POST per export, JSON body sent as `text/plain` (the sheet web app
//! reads the raw body). No retries: a failure is reported to the operator,
//! who decides whether to send again.

use std::time::Duration;

use caprini_core::ExportRecord;
use thiserror::Error;

use crate::config::SinkConfig;
use crate::error::{SinkError, SinkResult};

/// Transport-level failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("endpoint answered HTTP {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("endpoint unreachable: {0}")]
    Unreachable(String),
}

/// Something that can POST a text body and report the HTTP status.
pub trait Transport {
    fn post_text(&self, url: &str, body: &str) -> Result<u16, TransportError>;
}

/// Blocking HTTP transport.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn post_text(&self, url: &str, body: &str) -> Result<u16, TransportError> {
        match self
            .agent
            .post(url)
            .header("Content-Type", "text/plain")
            .send(body)
        {
            Ok(response) => Ok(response.status().as_u16()),
            Err(ureq::Error::StatusCode(code)) => Err(TransportError::Status(code)),
            Err(ureq::Error::Timeout(_)) => Err(TransportError::Timeout),
            Err(e) => Err(TransportError::Unreachable(e.to_string())),
        }
    }
}

/// Confirmed delivery. Every unconfirmed outcome is a [`SinkError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Confirmed { status: u16 },
}

/// Sends export records to the configured spreadsheet endpoint.
pub struct RemoteSink<T: Transport> {
    transport: T,
}

impl RemoteSink<UreqTransport> {
    /// HTTP sink using the configured timeout.
    pub fn http(config: &SinkConfig) -> Self {
        Self::new(UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> RemoteSink<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submit one record. Checks configuration before touching the network.
    ///
    /// Blocks until the endpoint answers or the configured timeout elapses.
    /// Interactive callers must run this off their UI thread (a worker thread
    /// or a blocking task) so the form stays responsive while it waits.
    pub fn submit(&self, record: &ExportRecord, config: &SinkConfig) -> SinkResult<Delivery> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            tracing::warn!("transmission blocked: no endpoint configured");
            SinkError::ConfigurationMissing
        })?;
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(SinkError::InvalidEndpoint(endpoint.to_string()));
        }

        let body = serde_json::to_string(record)?;
        let host = endpoint_host(endpoint);

        match self.transport.post_text(endpoint, &body) {
            Ok(status) if (200..300).contains(&status) => {
                tracing::info!(host, status, "export record delivered");
                Ok(Delivery::Confirmed { status })
            }
            Ok(status) => {
                tracing::error!(host, status, "export record rejected");
                Err(SinkError::TransmissionFailure {
                    endpoint: host.to_string(),
                    reason: TransportError::Status(status).to_string(),
                })
            }
            Err(e) => {
                tracing::error!(host, error = %e, "export record not delivered");
                Err(SinkError::TransmissionFailure {
                    endpoint: host.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Scheme and host only; web-app paths carry deployment ids.
fn endpoint_host(endpoint: &str) -> &str {
    let after_scheme = endpoint.find("://").map(|i| i + 3).unwrap_or(0);
    match endpoint[after_scheme..].find('/') {
        Some(slash) => &endpoint[..after_scheme + slash],
        None => endpoint,
    }
}
