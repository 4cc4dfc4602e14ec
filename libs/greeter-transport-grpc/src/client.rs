//! gRPC client transport configuration and connection utilities.
//!
//! Covers connect timeout, per-call deadline and HTTP/2 keepalive, with a
//! tracing span around connection establishment. There is deliberately no
//! reconnect or retry loop: a failed dial is returned to the caller as-is.
//!
//! The per-call deadline is applied by [`crate::deadline::call_with_deadline`],
//! not by the channel, so that expiry surfaces as `DEADLINE_EXCEEDED`.

use std::time::Duration;

use tonic::transport::{Channel, Endpoint};
use tracing::Instrument;

pub(crate) fn duration_to_u64_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Configuration for the gRPC client transport.
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,

    /// Deadline for each unary call.
    pub rpc_timeout: Duration,

    /// Service name for tracing.
    pub service_name: &'static str,

    /// Emit an `info` event once connected.
    pub enable_tracing: bool,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            rpc_timeout: Duration::from_secs(2),
            service_name: "grpc_client",
            enable_tracing: true,
        }
    }
}

impl GrpcClientConfig {
    /// Create a new configuration with the given service name.
    #[must_use]
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            ..Default::default()
        }
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the per-call deadline.
    #[must_use]
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    /// Disable the connection event.
    #[must_use]
    pub fn without_tracing(mut self) -> Self {
        self.enable_tracing = false;
        self
    }
}

/// Build a tonic `Endpoint` with connect timeout and keepalive settings.
///
/// Only plaintext `http://` endpoints are configured; no TLS is set up.
fn build_endpoint(uri: String, cfg: &GrpcClientConfig) -> Result<Endpoint, tonic::transport::Error> {
    let endpoint = Endpoint::from_shared(uri)?
        .connect_timeout(cfg.connect_timeout)
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .http2_keep_alive_interval(Duration::from_secs(30))
        .keep_alive_timeout(Duration::from_secs(10));

    Ok(endpoint)
}

/// Dial a gRPC service and return a connected client.
///
/// The connection is established eagerly, so an unreachable server fails
/// here rather than on the first call.
///
/// # Example
///
/// ```ignore
/// use greeter_transport_grpc::client::{connect_with_stack, GrpcClientConfig};
///
/// let cfg = GrpcClientConfig::new("greeter");
/// let channel: Channel = connect_with_stack("http://localhost:50051", &cfg).await?;
/// let client = GreeterServiceClient::new(channel);
/// ```
///
/// # Errors
/// Returns an error if the URI is invalid, the connect timeout elapses, or
/// the transport cannot be established.
pub async fn connect_with_stack<TClient>(
    uri: impl Into<String>,
    cfg: &GrpcClientConfig,
) -> anyhow::Result<TClient>
where
    TClient: From<Channel>,
{
    let uri_string = uri.into();
    let span = tracing::debug_span!(
        "grpc_connect",
        service = cfg.service_name,
        uri = %uri_string
    );

    async move {
        let endpoint = build_endpoint(uri_string, cfg)?;
        let channel = endpoint.connect().await?;

        if cfg.enable_tracing {
            tracing::debug!(
                service_name = cfg.service_name,
                connect_timeout_ms = duration_to_u64_ms(cfg.connect_timeout),
                rpc_timeout_ms = duration_to_u64_ms(cfg.rpc_timeout),
                "gRPC client connected"
            );
        }

        Ok(TClient::from(channel))
    }
    .instrument(span)
    .await
}
