//! gRPC Server implementation for greeter
//!
//! Handles `SayHello` and delegates to the domain Service.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use greeter_sdk::{GreeterService, SayHelloRequest, SayHelloResponse};

use crate::domain::Service;

/// gRPC service implementation that wraps the domain Service.
#[derive(Clone)]
pub struct GreeterServiceImpl {
    service: Arc<Service>,
}

impl GreeterServiceImpl {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl GreeterService for GreeterServiceImpl {
    async fn say_hello(
        &self,
        request: Request<SayHelloRequest>,
    ) -> Result<Response<SayHelloResponse>, Status> {
        let remote = request.remote_addr();
        let req = request.into_inner();
        tracing::debug!(?remote, name = %req.name, "SayHello");

        let message = self.service.greet(&req.name);

        Ok(Response::new(SayHelloResponse { message }))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn handler() -> GreeterServiceImpl {
        GreeterServiceImpl::new(Arc::new(Service::new()))
    }

    async fn call(req: SayHelloRequest) -> String {
        handler()
            .say_hello(Request::new(req))
            .await
            .unwrap()
            .into_inner()
            .message
    }

    #[tokio::test]
    async fn named_request() {
        let message = call(SayHelloRequest {
            name: "Bob".to_owned(),
        })
        .await;
        assert_eq!(message, "Hello, Bob!");
    }

    #[tokio::test]
    async fn empty_name() {
        let message = call(SayHelloRequest {
            name: String::new(),
        })
        .await;
        assert_eq!(message, "Hello, World!");
    }

    #[tokio::test]
    async fn default_request() {
        assert_eq!(call(SayHelloRequest::default()).await, "Hello, World!");
    }
}
