//! Dialog-side handle for settling a dialog.
//!
//! A [`DialogContext`] is what the mounted dialog's own UI uses to close
//! itself. The caller-facing [`DialogPromise`](crate::DialogPromise) holds
//! the same context, so both close paths share one settlement slot.

use std::any::Any;
use std::sync::{Arc, Mutex, Weak};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::DialogError;
use crate::id::DialogId;
use crate::props::Props;

/// Stack-side settlement hook, implemented by the stack's shared state.
pub(crate) trait Settle: Send + Sync {
    /// Move a dialog out of the active stack and tear it down.
    fn settle(&self, id: DialogId) -> Result<(), DialogError>;
}

/// Context handed to a mounted dialog.
///
/// Provides the dialog's identity, its call arguments, and the ability to
/// close it with an outcome. The type parameter `T` is the outcome type
/// delivered to whoever awaits the dialog.
pub struct DialogContext<T> {
    id: DialogId,
    args: Arc<[Value]>,
    props: Arc<Props>,
    result_tx: Arc<Mutex<Option<oneshot::Sender<T>>>>,
    stack: Weak<dyn Settle>,
}

impl<T> DialogContext<T> {
    /// The dialog's unique id.
    pub fn id(&self) -> DialogId {
        self.id
    }

    /// The exact arguments the dialog function was called with.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The props bound from the arguments.
    pub fn props(&self) -> &Props {
        &self.props
    }
}

impl<T: Send + 'static> DialogContext<T> {
    pub(crate) fn new(
        id: DialogId,
        args: Arc<[Value]>,
        props: Arc<Props>,
        result_tx: oneshot::Sender<T>,
        stack: Weak<dyn Settle>,
    ) -> Self {
        Self {
            id,
            args,
            props,
            result_tx: Arc::new(Mutex::new(Some(result_tx))),
            stack,
        }
    }

    /// Close the dialog with an outcome.
    ///
    /// Only the first close settles the dialog. Later calls, from either the
    /// dialog or its promise, are ignored and return `Ok(())`.
    ///
    /// An error means the host failed to tear the dialog down. The outcome
    /// has still been delivered and the dialog is no longer on the stack.
    pub fn close(&self, outcome: T) -> Result<(), DialogError> {
        let Some(tx) = self.take_sender() else {
            log::debug!("Dialog {} already settled, ignoring close", self.id);
            return Ok(());
        };

        // Nobody awaiting is fine
        let _ = tx.send(outcome);

        match self.stack.upgrade() {
            Some(stack) => stack.settle(self.id),
            None => Ok(()),
        }
    }

    /// Check if the dialog has been settled (or abandoned).
    pub fn is_closed(&self) -> bool {
        self.result_tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }

    /// Drop the sender without an outcome. Awaiters see `Abandoned`.
    pub(crate) fn abandon(&self) {
        if self.take_sender().is_some() {
            log::debug!("Dialog {} abandoned without an outcome", self.id);
        }
    }

    fn take_sender(&self) -> Option<oneshot::Sender<T>> {
        self.result_tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}

impl<T> Clone for DialogContext<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            args: Arc::clone(&self.args),
            props: Arc::clone(&self.props),
            result_tx: Arc::clone(&self.result_tx),
            stack: Weak::clone(&self.stack),
        }
    }
}

impl<T> std::fmt::Debug for DialogContext<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogContext")
            .field("id", &self.id)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Type-erased view of a [`DialogContext`].
///
/// Lets the stack and hosts hold contexts of different outcome types.
pub(crate) trait ErasedContext: Send + Sync {
    fn is_closed(&self) -> bool;
    fn abandon(&self);
    fn as_any(&self) -> &dyn Any;
}

impl<T: Send + 'static> ErasedContext for DialogContext<T> {
    fn is_closed(&self) -> bool {
        DialogContext::is_closed(self)
    }

    fn abandon(&self) {
        DialogContext::abandon(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Dialog context with its outcome type erased, as handed to hosts.
///
/// Hosts downcast with the outcome type the dialog template produces.
///
/// ```ignore
/// let cx: DialogContext<bool> = request.context.downcast().expect("bool dialog");
/// cx.close(true)?;
/// ```
#[derive(Clone)]
pub struct AnyDialogContext {
    id: DialogId,
    args: Arc<[Value]>,
    props: Arc<Props>,
    inner: Arc<dyn ErasedContext>,
}

impl AnyDialogContext {
    pub(crate) fn new<T: Send + 'static>(context: DialogContext<T>) -> Self {
        Self {
            id: context.id,
            args: Arc::clone(&context.args),
            props: Arc::clone(&context.props),
            inner: Arc::new(context),
        }
    }

    /// The dialog's unique id.
    pub fn id(&self) -> DialogId {
        self.id
    }

    /// The exact arguments the dialog function was called with.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The props bound from the arguments.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Check if the dialog has been settled (or abandoned).
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Recover the typed context. Returns `None` on an outcome type mismatch.
    pub fn downcast<T: Send + 'static>(&self) -> Option<DialogContext<T>> {
        self.inner.as_any().downcast_ref::<DialogContext<T>>().cloned()
    }

    pub(crate) fn abandon(&self) {
        self.inner.abandon();
    }
}

impl std::fmt::Debug for AnyDialogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyDialogContext")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
