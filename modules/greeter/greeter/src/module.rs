//! Greeter module definition
//!
//! Assembles the greeter and reflection services into one router and
//! serves it on the configured listen address.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tonic::service::{Routes, RoutesBuilder};

use greeter_bootstrap::ServerConfig;
use greeter_sdk::{FILE_DESCRIPTOR_SET, GreeterServiceServer, SERVICE_NAME};
use greeter_transport_grpc::server::{ListenConfig, ReadySignal, serve};

use crate::api::grpc::GreeterServiceImpl;
use crate::domain::Service;

/// Greeter module.
#[derive(Clone, Default)]
pub struct GreeterModule {
    service: Arc<Service>,
}

impl GreeterModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the router: `GreeterService`, plus `grpc.reflection.v1` when
    /// `reflection` is set.
    ///
    /// # Errors
    /// Returns an error if the embedded descriptor set cannot be decoded.
    pub fn grpc_routes(&self, reflection: bool) -> Result<Routes> {
        let mut routes = RoutesBuilder::default();
        routes.add_service(GreeterServiceServer::new(GreeterServiceImpl::new(
            self.service.clone(),
        )));
        tracing::debug!(service = SERVICE_NAME, "registered gRPC service");

        if reflection {
            let reflection = tonic_reflection::server::Builder::configure()
                .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
                .build_v1()
                .context("failed to build reflection service")?;
            routes.add_service(reflection);
            tracing::debug!("registered gRPC reflection service");
        }

        Ok(routes.routes())
    }

    /// Serve on `cfg.listen_addr` until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error for an unparsable listen address, a failed bind, or
    /// an abnormal server exit.
    pub async fn serve(
        &self,
        cfg: &ServerConfig,
        cancel: CancellationToken,
        ready: ReadySignal,
    ) -> Result<()> {
        let listen: ListenConfig = cfg.listen_addr.parse()?;
        let routes = self.grpc_routes(cfg.reflection)?;

        tracing::warn!(
            listen_addr = %listen,
            "transport is plaintext and unauthenticated; do not expose beyond a trusted network"
        );

        serve(listen, routes, cancel, ready).await
    }
}
