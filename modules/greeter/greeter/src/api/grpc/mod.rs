//! gRPC API layer

mod server;

pub use server::GreeterServiceImpl;
