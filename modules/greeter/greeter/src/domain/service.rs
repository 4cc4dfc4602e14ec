//! Domain service for greeter
//!
//! Contains the greeting rule.

use tracing::debug;

/// Name used when the request carries none.
pub const DEFAULT_NAME: &str = "World";

/// Stateless domain service behind the gRPC handler.
#[derive(Clone, Debug, Default)]
pub struct Service;

impl Service {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the greeting for `name`; an empty name becomes [`DEFAULT_NAME`].
    #[must_use]
    pub fn greet(&self, name: &str) -> String {
        let name = if name.is_empty() { DEFAULT_NAME } else { name };
        debug!(name, "building greeting");
        format!("Hello, {name}!")
    }
}
