//! Shared helpers.

pub mod parts;

pub use parts::{extract_function_responses, extract_text, FunctionResponsePayload};
