//! gRPC transport plumbing for the greeter: client dial and per-call
//! deadline on one side, listen/serve/shutdown on the other.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;
pub mod deadline;
pub mod server;

pub use client::{GrpcClientConfig, connect_with_stack};
pub use deadline::{call_with_deadline, request_with_deadline};
pub use server::{ListenConfig, ReadySignal, serve};
