//! 类型系统模块：定义与厂商无关的内容生成数据类型。
//!
//! # Types Module
//!
//! Provider-agnostic request and response model that the adapter translates to and
//! from the Ollama wire protocol.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Content`] | One conversation turn: a bare string or a role-tagged part list |
//! | [`Part`] | Text, function call or function response |
//! | [`GenerateContentRequest`] | Model, contents, system instruction, tools, sampling options |
//! | [`GenerateContentResponse`] | Candidates plus usage metadata |
//! | [`Tool`] | Group of function declarations offered to the model |
//!
//! ## Example
//!
//! ```rust
//! use ai_lib_ollama::types::{Content, FunctionDeclaration, GenerateContentRequest, Tool};
//!
//! let request = GenerateContentRequest::new(vec![Content::user("What's the weather?")])
//!     .with_system_instruction("You are a helpful assistant")
//!     .with_tools(vec![Tool::new(vec![FunctionDeclaration::new("get_weather")
//!         .with_description("Get current weather for a location")
//!         .with_parameters(serde_json::json!({
//!             "type": "object",
//!             "properties": { "location": { "type": "string" } }
//!         }))])]);
//! assert!(request.has_tool_declarations());
//! ```

pub mod content;
pub mod request;
pub mod response;
pub mod tool;

pub use content::{Content, Part, Role, SystemInstruction, Turn};
pub use request::{GenerateContentRequest, GenerationConfig};
pub use response::{Candidate, FinishReason, GenerateContentResponse, UsageMetadata};
pub use tool::{FunctionDeclaration, Tool};
