//! Domain layer for the greeter module

pub mod service;

pub use service::{DEFAULT_NAME, Service};
