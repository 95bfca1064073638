//! Token 估算模块：基于字符数的粗略 Token 估计（非真实分词器）。
//!
//! # Token Estimation
//!
//! Ollama exposes no tokenizer endpoint, so counts are approximated from text length.
//! [`crate::ContentGenerator::estimate_tokens`] feeds the completion-path prompt of a
//! request through the client's [`TokenCounter`].
//!
//! ```rust
//! use ai_lib_ollama::tokens::{CharacterEstimator, TokenCounter};
//!
//! let counter = CharacterEstimator::new();
//! assert_eq!(counter.count("Hello world"), 3);
//! ```

mod counter;

pub use counter::{CharacterEstimator, TokenCounter};
