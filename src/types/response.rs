//! Provider-agnostic generation response

use super::content::{Part, Role, Turn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Why generation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    Stop,
    MaxTokens,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: u32,
    pub candidates_token_count: u32,
    pub total_token_count: u32,
}

impl UsageMetadata {
    /// Usage from Ollama's counters; absent counters count as zero.
    pub fn from_counts(prompt_eval_count: Option<u32>, eval_count: Option<u32>) -> Self {
        let prompt = prompt_eval_count.unwrap_or(0);
        let output = eval_count.unwrap_or(0);
        Self {
            prompt_token_count: prompt,
            candidates_token_count: output,
            total_token_count: prompt.saturating_add(output),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Turn,
    /// Unset while a stream is still generating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(default)]
    pub index: u32,
}

impl Candidate {
    pub fn new(parts: Vec<Part>, finish_reason: Option<FinishReason>) -> Self {
        Self {
            content: Turn {
                role: Role::Model,
                parts,
            },
            finish_reason,
            index: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
    /// Populated only once a response or stream is final
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.first_candidate().and_then(|c| c.finish_reason)
    }

    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> String {
        self.first_candidate()
            .map(|c| crate::utils::parts::extract_text(&c.content.parts))
            .unwrap_or_default()
    }

    /// `(name, args)` of every function call in the first candidate.
    pub fn function_calls(&self) -> Vec<(&str, &Map<String, Value>)> {
        self.first_candidate()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| match p {
                        Part::FunctionCall { name, args } => Some((name.as_str(), args)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
