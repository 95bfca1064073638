//! 遥测模块：错误上报接口，将失败的操作连同上下文交给外部观测系统。
//!
//! Error reporting.
//!
//! Every failed public operation of [`crate::OllamaClient`] is handed to an
//! [`ErrorReporter`] before the error is returned to the caller. A reporter runs
//! inline on the failing call and gets at most [`REPORT_TIMEOUT`]; a reporter that
//! fails or overruns is logged and otherwise ignored.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ErrorReport`] | Snapshot of one failure with the turns involved |
//! | [`ErrorReporter`] | Trait for report destinations |
//! | [`TracingErrorReporter`] | Default, emits `tracing::error!` |
//! | [`NoopErrorReporter`] | Discards reports |
//! | [`InMemoryErrorReporter`] | Keeps reports for inspection in tests |

use crate::types::Content;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::error;

/// Which public operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Generate,
    GenerateStream,
    Embed,
}

impl Operation {
    pub fn tag(&self) -> &'static str {
        match self {
            Operation::Generate => "ollama-generate",
            Operation::GenerateStream => "ollama-generate-stream",
            Operation::Embed => "ollama-embed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub operation: Operation,
    /// Human-readable summary of what was being attempted
    pub context: String,
    /// Display text of the wrapped error
    pub error: String,
    pub status_code: Option<u16>,
    pub cancelled: bool,
    /// Conversation turns of the failed request; empty for embeddings
    pub contents: Vec<Content>,
}

impl ErrorReport {
    pub fn new(
        operation: Operation,
        context: impl Into<String>,
        error: &Error,
        contents: Vec<Content>,
    ) -> Self {
        Self {
            operation,
            context: context.into(),
            error: error.to_string(),
            status_code: error.status_code(),
            cancelled: error.is_cancelled(),
            contents,
        }
    }
}

/// Upper bound on one [`ErrorReporter::report`] call. The report is dropped after it.
pub const REPORT_TIMEOUT: Duration = Duration::from_millis(250);

/// Destination for failure reports.
///
/// Awaited before the failing call returns, so slow I/O should be handed off to a
/// background task.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn report(&self, report: ErrorReport) -> Result<()>;
}

/// Logs each report at error level.
#[derive(Debug, Clone, Default)]
pub struct TracingErrorReporter;

#[async_trait]
impl ErrorReporter for TracingErrorReporter {
    async fn report(&self, report: ErrorReport) -> Result<()> {
        error!(
            operation = report.operation.tag(),
            status = report.status_code,
            cancelled = report.cancelled,
            turns = report.contents.len(),
            error = %report.error,
            "{}",
            report.context
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoopErrorReporter;

#[async_trait]
impl ErrorReporter for NoopErrorReporter {
    async fn report(&self, _: ErrorReport) -> Result<()> {
        Ok(())
    }
}

/// In-memory reporter for testing.
#[derive(Debug, Clone)]
pub struct InMemoryErrorReporter {
    reports: Arc<RwLock<Vec<ErrorReport>>>,
    max_reports: usize,
}

impl InMemoryErrorReporter {
    pub fn new(max: usize) -> Self {
        Self {
            reports: Arc::new(RwLock::new(Vec::new())),
            max_reports: max,
        }
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn reports_for(&self, operation: Operation) -> Vec<ErrorReport> {
        self.reports()
            .into_iter()
            .filter(|r| r.operation == operation)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.reports.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryErrorReporter {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl ErrorReporter for InMemoryErrorReporter {
    async fn report(&self, report: ErrorReport) -> Result<()> {
        let mut reports = self.reports.write().map_err(|_| {
            Error::InvalidResponse("error report store poisoned".to_string())
        })?;
        reports.push(report);
        if reports.len() > self.max_reports {
            reports.remove(0);
        }
        Ok(())
    }
}

pub fn tracing_reporter() -> Arc<dyn ErrorReporter> {
    Arc::new(TracingErrorReporter)
}

pub fn noop_reporter() -> Arc<dyn ErrorReporter> {
    Arc::new(NoopErrorReporter)
}
