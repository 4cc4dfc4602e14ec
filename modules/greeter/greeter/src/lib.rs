//! Greeter Module
//!
//! Answers `greeter.v1.GreeterService/SayHello` with a greeting.
//!
//! ## Architecture
//!
//! - `domain/service.rs` - Greeting rule
//! - `api/grpc/server.rs` - gRPC server implementation
//! - `module.rs` - Route assembly (greeter + reflection) and serving
//!
//! Callers should use the `greeter-sdk` crate, which provides the gRPC client.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === MODULE DEFINITION ===
mod module;
pub use module::GreeterModule;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
