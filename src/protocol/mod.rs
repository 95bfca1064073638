//! 协议层：Ollama 线上数据结构与请求转换。
//!
//! # Ollama Protocol Layer
//!
//! Wire shapes for the four Ollama endpoints this crate speaks, plus the translators
//! that turn a [`crate::GenerateContentRequest`] into either protocol's request body.
//!
//! | Endpoint | Body | Reply |
//! |----------|------|-------|
//! | `POST /api/generate` | [`CompletionRequest`] | [`CompletionRecord`] (one, or NDJSON) |
//! | `POST /api/chat` | [`ChatRequest`] | [`ChatRecord`] (one, or NDJSON) |
//! | `POST /api/embeddings` | [`EmbeddingsRequest`] | [`EmbeddingsResponse`] |
//! | `GET /api/tags` | none | [`TagsResponse`] |
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Serde structs for request bodies and reply records |
//! | [`request`] | Completion-prompt and chat-message builders |

pub mod request;
pub mod types;

pub use request::{
    build_messages, build_options, build_prompt, build_tools, chat_request, completion_request,
    ChatParts, PromptParts,
};
pub use types::{
    ChatMessage, ChatRecord, ChatRequest, ChatRole, CompletionRecord, CompletionRequest,
    EmbeddingsRequest, EmbeddingsResponse, Options, TagsResponse, ToolArguments, ToolSchema,
    ToolSchemaFunction, WireFunctionCall, WireToolCall,
};

pub const GENERATE_PATH: &str = "/api/generate";
pub const CHAT_PATH: &str = "/api/chat";
pub const EMBEDDINGS_PATH: &str = "/api/embeddings";
pub const TAGS_PATH: &str = "/api/tags";
