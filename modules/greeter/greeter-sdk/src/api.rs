//! Greeter API trait and types

use async_trait::async_trait;
use tonic::{Code, Status};

/// Greeter API trait
///
/// Implemented by the gRPC client; callers depend on this trait rather than
/// on the transport.
#[async_trait]
pub trait GreeterClientV1: Send + Sync {
    /// Ask the service to greet `name`. An empty name is greeted as "World".
    async fn say_hello(&self, name: &str) -> Result<String, GreeterError>;
}

/// Error type for Greeter operations
#[derive(thiserror::Error, Debug)]
pub enum GreeterError {
    #[error("failed to connect to {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("rpc failed with status {code}: {message}")]
    Rpc { code: Code, message: String },
}

impl From<Status> for GreeterError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::DeadlineExceeded => Self::DeadlineExceeded(status.message().to_owned()),
            code => Self::Rpc {
                code,
                message: status.message().to_owned(),
            },
        }
    }
}
