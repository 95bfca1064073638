use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Caller-side cancellation signal.
///
/// Cloning shares the signal. Cancelling aborts the in-flight HTTP call and makes an
/// open response stream end with [`crate::Error::Cancelled`] before its next item.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// A child handle: cancelled when this one is, but can also be cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }
}

impl From<CancellationToken> for CancelHandle {
    fn from(token: CancellationToken) -> Self {
        Self { token }
    }
}

/// Drive `fut` to completion unless `cancel` fires first.
pub(crate) async fn run_cancellable<T, F>(cancel: Option<&CancelHandle>, fut: F) -> crate::Result<T>
where
    F: Future<Output = crate::Result<T>>,
{
    match cancel {
        Some(cancel) => {
            if cancel.is_cancelled() {
                return Err(crate::Error::Cancelled);
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(crate::Error::Cancelled),
                res = fut => res,
            }
        }
        None => fut.await,
    }
}
