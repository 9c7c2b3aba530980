//! In-process host that keeps mounted dialogs in a list.
//!
//! Useful for tests, headless tools, and as a reference for writing a real
//! toolkit host.

use std::sync::Arc;

use crate::config::RenderOptions;
use crate::context::AnyDialogContext;
use crate::error::HostError;
use crate::id::DialogId;
use crate::props::Props;
use crate::stacking::ZIndex;

use super::{MountRequest, Mountable, Teardown};

/// Handle for a dialog mounted in a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryHandle(u64);

/// A dialog currently mounted in a [`MemoryHost`].
#[derive(Debug)]
pub struct MountedDialog<T> {
    /// Host handle.
    pub handle: MemoryHandle,
    /// Dialog id.
    pub id: DialogId,
    /// The template it was rendered from.
    pub template: Arc<T>,
    /// Bound props.
    pub props: Props,
    /// Layering value.
    pub z_index: ZIndex,
    /// Per-dialog render options.
    pub render: RenderOptions,
    /// Close entry point for the "rendered" dialog.
    pub context: AnyDialogContext,
}

/// Host that records mounts instead of drawing anything.
#[derive(Debug)]
pub struct MemoryHost<T = String> {
    next_handle: u64,
    mounted: Vec<MountedDialog<T>>,
    torn_down: Vec<DialogId>,
    fail_next_mount: Option<HostError>,
    fail_next_unmount: Option<HostError>,
    defer_teardown: bool,
}

impl<T> Default for MemoryHost<T> {
    fn default() -> Self {
        Self {
            next_handle: 0,
            mounted: Vec::new(),
            torn_down: Vec::new(),
            fail_next_mount: None,
            fail_next_unmount: None,
            defer_teardown: false,
        }
    }
}

impl<T> MemoryHost<T> {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report teardown as deferred instead of finishing it.
    pub fn with_deferred_teardown(mut self) -> Self {
        self.defer_teardown = true;
        self
    }

    /// Make the next mount fail with `error`.
    pub fn fail_next_mount(&mut self, error: HostError) {
        self.fail_next_mount = Some(error);
    }

    /// Make the next unmount fail with `error`.
    pub fn fail_next_unmount(&mut self, error: HostError) {
        self.fail_next_unmount = Some(error);
    }

    /// Dialogs currently mounted, oldest first.
    pub fn mounted(&self) -> &[MountedDialog<T>] {
        &self.mounted
    }

    /// Look up a mounted dialog.
    pub fn get(&self, id: DialogId) -> Option<&MountedDialog<T>> {
        self.mounted.iter().find(|dialog| dialog.id == id)
    }

    /// The close entry point of a mounted dialog.
    pub fn context(&self, id: DialogId) -> Option<AnyDialogContext> {
        self.get(id).map(|dialog| dialog.context.clone())
    }

    /// Ids of dialogs unmounted so far, in teardown order.
    pub fn torn_down(&self) -> &[DialogId] {
        &self.torn_down
    }
}

impl<T: Send + Sync + 'static> Mountable for MemoryHost<T> {
    type Template = T;
    type Handle = MemoryHandle;

    fn mount(&mut self, request: MountRequest<'_, T>) -> Result<MemoryHandle, HostError> {
        if let Some(error) = self.fail_next_mount.take() {
            return Err(error);
        }

        self.next_handle += 1;
        let handle = MemoryHandle(self.next_handle);
        self.mounted.push(MountedDialog {
            handle,
            id: request.id,
            template: Arc::clone(request.template),
            props: request.props.clone(),
            z_index: request.z_index,
            render: request.render.clone(),
            context: request.context,
        });
        Ok(handle)
    }

    fn unmount(&mut self, handle: MemoryHandle) -> Result<Teardown, HostError> {
        let Some(pos) = self.mounted.iter().position(|dialog| dialog.handle == handle) else {
            return Err(HostError::message(format!("unknown handle {}", handle.0)));
        };
        let dialog = self.mounted.remove(pos);
        self.torn_down.push(dialog.id);

        if let Some(error) = self.fail_next_unmount.take() {
            return Err(error);
        }
        Ok(if self.defer_teardown {
            Teardown::Deferred
        } else {
            Teardown::Done
        })
    }
}
