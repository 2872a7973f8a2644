//! Cancellable execution contexts.

use tokio_util::sync::CancellationToken;

/// A handle that lets a caller abort work the driver is doing on its behalf.
///
/// Contexts form a tree: cancelling a context cancels every context derived from it, but not
/// its parent.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
}

impl Context {
    /// A root context. It is only cancelled explicitly.
    pub fn background() -> Self {
        Self::default()
    }

    /// A fresh context that is cancelled along with `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the context has been cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}
