//! Error types

use crate::id::DialogId;

/// Errors returned by the dialog stack.
///
/// Closing an already-settled dialog is not an error and never produces one.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    /// The host failed to mount the dialog. It was never added to the stack.
    #[error("Failed to mount dialog: {0}")]
    Mount(#[source] HostError),

    /// The host failed to tear the dialog down.
    ///
    /// The dialog is settled and already gone from the stack.
    #[error("Failed to unmount dialog {id}: {source}")]
    Unmount {
        /// The dialog that failed to unmount.
        id: DialogId,
        /// Host error.
        #[source]
        source: HostError,
    },

    /// A prop mapping named the same prop twice.
    #[error("Duplicate prop name in mapping: {0}")]
    DuplicateProp(String),

    /// The next z-index would not fit the value range.
    #[error("Z-index exhausted: base {base} plus {opened} opened dialogs overflows")]
    StackingExhausted {
        /// Configured base value.
        base: u32,
        /// Dialogs opened so far.
        opened: u64,
    },

    /// The dialog went away without an outcome.
    ///
    /// Happens when the owning stack is dropped while the dialog is open, or
    /// when the host reports an open dialog as unmounted through
    /// [`DialogStack::unmounted`](crate::DialogStack::unmounted).
    #[error("Dialog {0} was dropped without an outcome")]
    Abandoned(DialogId),
}

/// Error reported by a [`Mountable`](crate::host::Mountable) implementation.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Plain error message.
    #[error("{0}")]
    Message(String),

    /// Mount target could not be resolved.
    #[error("Mount target not found: {0}")]
    TargetNotFound(String),

    /// Any other host failure.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HostError {
    /// Creates a message error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}
