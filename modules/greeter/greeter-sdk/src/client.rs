//! gRPC client implementation of `GreeterClientV1`

use std::time::Duration;

use async_trait::async_trait;
use greeter_transport_grpc::client::{GrpcClientConfig, connect_with_stack};
use greeter_transport_grpc::deadline::call_with_deadline;
use tonic::Response;
use tonic::transport::Channel;

use crate::api::{GreeterClientV1, GreeterError};
use crate::proto::SayHelloRequest;
use crate::proto::greeter_service_client::GreeterServiceClient;

/// gRPC client for `greeter.v1.GreeterService`.
///
/// Owns one channel; dropping the client closes it.
#[derive(Clone)]
pub struct GreeterGrpcClient {
    inner: GreeterServiceClient<Channel>,
    deadline: Duration,
}

impl GreeterGrpcClient {
    /// Dial `uri` with the given transport config. The per-call deadline is
    /// taken from `cfg.rpc_timeout`.
    ///
    /// # Errors
    /// Returns [`GreeterError::Connect`] if the endpoint is invalid or
    /// unreachable.
    pub async fn connect(
        uri: impl Into<String>,
        cfg: &GrpcClientConfig,
    ) -> Result<Self, GreeterError> {
        let uri = uri.into();
        let channel = connect_with_stack::<Channel>(uri.clone(), cfg)
            .await
            .map_err(|e| GreeterError::Connect {
                endpoint: uri,
                message: format!("{e:#}"),
            })?;
        Ok(Self::from_channel(channel, cfg.rpc_timeout))
    }

    /// Wrap an already established channel.
    #[must_use]
    pub fn from_channel(channel: Channel, deadline: Duration) -> Self {
        Self {
            inner: GreeterServiceClient::new(channel),
            deadline,
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

#[async_trait]
impl GreeterClientV1 for GreeterGrpcClient {
    async fn say_hello(&self, name: &str) -> Result<String, GreeterError> {
        let request = SayHelloRequest {
            name: name.to_owned(),
        };

        let response = call_with_deadline(
            self.inner.clone(),
            self.deadline,
            request,
            |mut client, req| async move { client.say_hello(req).await.map(Response::into_inner) },
            "greeter.say_hello",
        )
        .await?;

        tracing::debug!(message = %response.message, "SayHello returned");
        Ok(response.message)
    }
}
