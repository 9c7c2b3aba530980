//! The seam between the dialog stack and the UI toolkit that renders dialogs.
//!
//! The stack never inspects templates. It hands a [`MountRequest`] to a
//! [`Mountable`] host and keeps the returned handle until teardown.

pub mod memory;

use std::sync::Arc;

use crate::config::{MountTarget, RenderOptions};
use crate::context::AnyDialogContext;
use crate::error::HostError;
use crate::id::DialogId;
use crate::props::Props;
use crate::stacking::ZIndex;

/// Everything a host needs to render one dialog.
#[derive(Debug)]
pub struct MountRequest<'a, T> {
    /// The dialog's id.
    pub id: DialogId,
    /// The template to render.
    pub template: &'a Arc<T>,
    /// Props bound from the call arguments.
    pub props: &'a Props,
    /// Layering value for the dialog.
    pub z_index: ZIndex,
    /// Per-dialog render options.
    pub render: &'a RenderOptions,
    /// Render options of the shared wrapper.
    pub wrapper: &'a RenderOptions,
    /// Where the wrapper lives.
    pub target: &'a MountTarget,
    /// The dialog's close entry point. Give this to the rendered dialog.
    pub context: AnyDialogContext,
}

/// Outcome of a host teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// The dialog is gone.
    Done,
    /// Teardown continues (e.g. an exit animation). The host calls
    /// [`DialogStack::unmounted`](crate::DialogStack::unmounted) when it
    /// finishes.
    Deferred,
}

/// A UI toolkit capable of rendering dialogs.
///
/// `mount` and `unmount` are called with the host locked. They may close any
/// dialog or call `DialogStack::unmounted`; a dialog closed this way is
/// unmounted after the outer call returns. They must not open dialogs.
pub trait Mountable: Send + 'static {
    /// The toolkit's dialog definition.
    type Template: Send + Sync + 'static;

    /// Handle identifying a mounted dialog.
    type Handle: Send + 'static;

    /// Render a dialog.
    fn mount(&mut self, request: MountRequest<'_, Self::Template>) -> Result<Self::Handle, HostError>;

    /// Tear a mounted dialog down.
    fn unmount(&mut self, handle: Self::Handle) -> Result<Teardown, HostError>;
}
