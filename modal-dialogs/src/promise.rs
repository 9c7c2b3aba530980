//! Awaitable dialog outcome.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::Shared;
use tokio::sync::oneshot;

use crate::context::DialogContext;
use crate::error::DialogError;
use crate::id::DialogId;

/// The caller's handle on an opened dialog.
///
/// Resolves once with the dialog's outcome. Clones share the same outcome,
/// and awaiting after settlement resolves immediately. [`close`](Self::close)
/// settles the dialog from outside through the same path the dialog's own UI
/// uses. Awaiters cannot tell which side closed it.
///
/// # Example
///
/// ```ignore
/// let confirmed = confirm.call(["Delete this item?"])?.await?;
/// ```
pub struct DialogPromise<T: Clone> {
    context: DialogContext<T>,
    outcome: Shared<oneshot::Receiver<T>>,
}

impl<T: Clone + Send + 'static> DialogPromise<T> {
    pub(crate) fn new(context: DialogContext<T>, rx: oneshot::Receiver<T>) -> Self {
        Self {
            context,
            outcome: rx.shared(),
        }
    }

    /// The dialog's id.
    pub fn id(&self) -> DialogId {
        self.context.id()
    }

    /// Force the dialog closed with an outcome.
    ///
    /// No effect if the dialog already settled. Returns the promise so it
    /// can still be awaited.
    pub fn close(&self, outcome: T) -> Result<&Self, DialogError> {
        self.context.close(outcome)?;
        Ok(self)
    }

    /// Check if the dialog has settled.
    pub fn is_settled(&self) -> bool {
        self.context.is_closed()
    }

    /// The outcome, if it is already available to awaiters.
    ///
    /// Only reports outcomes observed by a previous poll of this promise or
    /// one of its clones.
    pub fn peek(&self) -> Option<Result<T, DialogError>> {
        self.outcome.peek().map(|result| self.map_result(result.clone()))
    }

    fn map_result(&self, result: Result<T, oneshot::error::RecvError>) -> Result<T, DialogError> {
        result.map_err(|_| DialogError::Abandoned(self.context.id()))
    }
}

impl<T: Clone> Clone for DialogPromise<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            outcome: self.outcome.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Future for DialogPromise<T> {
    type Output = Result<T, DialogError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let result = std::task::ready!(Pin::new(&mut self.outcome).poll(cx));
        Poll::Ready(self.map_result(result))
    }
}

impl<T: Clone> std::fmt::Debug for DialogPromise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogPromise")
            .field("id", &self.context.id())
            .finish_non_exhaustive()
    }
}
