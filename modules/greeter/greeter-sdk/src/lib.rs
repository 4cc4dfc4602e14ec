//! Greeter SDK
//!
//! Everything needed to call or implement the greeter service:
//! - API trait (`GreeterClientV1`) and error type (`GreeterError`)
//! - gRPC client (`GreeterGrpcClient`)
//! - Proto stubs and the encoded file descriptor set for server reflection
//!
//! ## Usage
//!
//! ```ignore
//! use greeter_sdk::{GreeterClientV1, GreeterGrpcClient};
//! use greeter_transport_grpc::GrpcClientConfig;
//!
//! let cfg = GrpcClientConfig::new(greeter_sdk::SERVICE_NAME);
//! let client = GreeterGrpcClient::connect("http://localhost:50051", &cfg).await?;
//! let message = client.say_hello("World").await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === API TRAIT AND TYPES ===
mod api;
pub use api::{GreeterClientV1, GreeterError};

// === GRPC CLIENT ===
mod client;
pub use client::GreeterGrpcClient;

// === GRPC PROTO STUBS (for server implementation) ===
/// Generated protobuf types for `GreeterService`
#[allow(clippy::pedantic)]
pub mod proto {
    tonic::include_proto!("greeter.v1");
}

pub use proto::greeter_service_client::GreeterServiceClient;
pub use proto::greeter_service_server::{GreeterService, GreeterServiceServer};
pub use proto::{SayHelloRequest, SayHelloResponse};

/// Encoded `FileDescriptorSet` for `greeter.v1`, fed to the reflection service.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("greeter_descriptor");

/// Fully-qualified gRPC service name.
pub const SERVICE_NAME: &str = "greeter.v1.GreeterService";
