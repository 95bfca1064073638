//! HTTP transport to the Ollama server.

pub mod http;

pub use http::{HttpTransport, TransportError};
