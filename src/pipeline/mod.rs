//! 流水线处理模块：将 Ollama 的 NDJSON 字节流解码并映射为统一响应。
//!
//! # Response Pipeline
//!
//! ```text
//! HTTP bytes → NdjsonDecoder → CompletionRecord / ChatRecord → event_map → GenerateContentResponse
//!                 │                                                │
//!           split on '\n',                                 finish reason,
//!           skip bad lines                                 usage, tool calls
//! ```
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decode`] | Incremental NDJSON decoding with cancellation |
//! | [`event_map`] | Backend records to [`crate::GenerateContentResponse`] |

pub mod decode;
pub mod event_map;

pub use decode::{decode_stream, NdjsonDecoder};
pub use event_map::{
    map_chat_record, map_chat_stream, map_completion, map_completion_chunk,
    map_completion_stream,
};
