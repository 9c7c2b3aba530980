//! The dialog stack manager.
//!
//! [`DialogStack`] owns every open dialog. It is the only thing that mutates
//! the stack: it allocates ids and z-index values, mounts dialogs through the
//! host, records settlement, and removes dialogs on teardown.
//!
//! # Locking
//!
//! Stack state and the host sit behind separate mutexes, and the state lock
//! is never held while the host is called. Settled dialogs are queued for
//! teardown and the queue is drained by whoever can take the host lock. A
//! close issued from inside `mount` or `unmount` only queues; the outer call
//! drains the queue once it has released the host.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError, Weak};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::config::{DialogConfig, RenderOptions};
use crate::context::{AnyDialogContext, DialogContext, Settle};
use crate::error::{DialogError, HostError};
use crate::factory::{DialogFn, DialogOptions};
use crate::host::{MountRequest, Mountable, Teardown};
use crate::id::{DialogId, IdAllocator};
use crate::instance::{DialogInstance, DialogState};
use crate::promise::DialogPromise;
use crate::props::PropMapping;
use crate::stacking::{StackingPolicy, ZIndex};

/// Snapshot of one dialog tracked by the stack.
#[derive(Debug, Clone)]
pub struct DialogInfo {
    /// Dialog id.
    pub id: DialogId,
    /// Layering value assigned at open.
    pub z_index: ZIndex,
    /// `Open` for dialogs on the stack, `Settled` for dialogs awaiting teardown.
    pub state: DialogState,
    /// Arguments the dialog was opened with.
    pub args: Arc<[Value]>,
}

/// Manages the stack of open dialogs for one host.
///
/// Cloning is cheap and yields a handle to the same stack.
///
/// # Example
///
/// ```
/// use modal_dialogs::config::DialogConfig;
/// use modal_dialogs::host::memory::MemoryHost;
/// use modal_dialogs::DialogStack;
///
/// let stack = DialogStack::new(DialogConfig::default(), MemoryHost::<&str>::new());
/// let confirm = stack.make_dialog::<bool>("confirm", ["message"]).unwrap();
///
/// let promise = confirm.call(["Delete this item?"]).unwrap();
/// assert_eq!(stack.ids(), vec![promise.id()]);
///
/// promise.close(false).unwrap();
/// assert!(stack.is_empty());
/// ```
pub struct DialogStack<H: Mountable> {
    shared: Arc<StackShared<H>>,
}

struct StackShared<H: Mountable> {
    config: DialogConfig,
    state: Mutex<StackState<H::Handle>>,
    host: Mutex<H>,
    /// Handles of settled dialogs waiting for `unmount`.
    pending: Mutex<VecDeque<(DialogId, H::Handle)>>,
}

struct StackState<Hd> {
    ids: IdAllocator,
    stacking: StackingPolicy,
    /// Open dialogs in opening order (= z-order).
    active: Vec<DialogInstance<Hd>>,
    /// Settled dialogs whose teardown has not finished.
    closing: Vec<DialogInstance<Hd>>,
}

impl<Hd> StackState<Hd> {
    fn position(list: &[DialogInstance<Hd>], id: DialogId) -> Option<usize> {
        list.iter().position(|dialog| dialog.id == id)
    }

    fn take_active(&mut self, id: DialogId) -> Option<DialogInstance<Hd>> {
        Self::position(&self.active, id).map(|pos| self.active.remove(pos))
    }

    fn take_closing(&mut self, id: DialogId) -> Option<DialogInstance<Hd>> {
        Self::position(&self.closing, id).map(|pos| self.closing.remove(pos))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl<H: Mountable> DialogStack<H> {
    /// Create a stack rendering through `host`.
    pub fn new(config: DialogConfig, host: H) -> Self {
        let stacking = StackingPolicy::new(config.z_index);
        Self {
            shared: Arc::new(StackShared {
                config,
                state: Mutex::new(StackState {
                    ids: IdAllocator::new(),
                    stacking,
                    active: Vec::new(),
                    closing: Vec::new(),
                }),
                host: Mutex::new(host),
                pending: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// The stack's configuration.
    pub fn config(&self) -> &DialogConfig {
        &self.shared.config
    }

    /// Build a dialog function binding positional arguments to `props`.
    pub fn make_dialog<T: Clone + Send + 'static>(
        &self,
        template: impl Into<Arc<H::Template>>,
        props: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<DialogFn<T, H>, DialogError> {
        self.make_dialog_with(DialogOptions::new(template).props(props))
    }

    /// Build a dialog function from full options.
    pub fn make_dialog_with<T: Clone + Send + 'static>(
        &self,
        options: DialogOptions<H::Template>,
    ) -> Result<DialogFn<T, H>, DialogError> {
        let DialogOptions {
            template,
            props,
            render,
        } = options;
        let mapping = PropMapping::new(props)?;
        Ok(DialogFn::new(self.clone(), template, mapping, render))
    }

    /// Open a dialog. Called by [`DialogFn::call`].
    pub(crate) fn open<T: Clone + Send + 'static>(
        &self,
        template: &Arc<H::Template>,
        mapping: &PropMapping,
        render: &RenderOptions,
        args: Vec<Value>,
    ) -> Result<DialogPromise<T>, DialogError> {
        let args: Arc<[Value]> = args.into();
        let props = Arc::new(mapping.bind(&args));
        let (tx, rx) = oneshot::channel();

        let (id, z_index, context) = {
            let mut state = lock(&self.shared.state);
            let id = state.ids.next();
            let current = state.active.len();
            let z_index = state.stacking.assign(current)?;

            let settle: Weak<dyn Settle> = Arc::downgrade(&self.shared) as Weak<dyn Settle>;
            let context = DialogContext::new(id, Arc::clone(&args), Arc::clone(&props), tx, settle);
            state.active.push(DialogInstance::new(
                id,
                Arc::clone(&args),
                z_index,
                AnyDialogContext::new(context.clone()),
            ));
            (id, z_index, context)
        };

        log::info!("Opening dialog {} (z-index {})", id, z_index);

        let mounted = lock(&self.shared.host).mount(MountRequest {
            id,
            template,
            props: &props,
            z_index,
            render,
            wrapper: &self.shared.config.wrapper,
            target: &self.shared.config.mount_target,
            context: AnyDialogContext::new(context.clone()),
        });

        let handle = match mounted {
            Ok(handle) => handle,
            Err(source) => {
                log::warn!("Mounting dialog {} failed: {}", id, source);
                let mut state = lock(&self.shared.state);
                state.take_active(id);
                state.take_closing(id);
                drop(state);
                context.abandon();
                self.shared.flush();
                return Err(DialogError::Mount(source));
            }
        };

        let promise = DialogPromise::new(context, rx);

        {
            let mut state = lock(&self.shared.state);
            if let Some(pos) = StackState::position(&state.active, id) {
                state.active[pos].handle = Some(handle);
            } else if StackState::position(&state.closing, id).is_some() {
                // Closed while mounting
                lock(&self.shared.pending).push_back((id, handle));
            } else {
                log::warn!("Dialog {} was unmounted by the host while mounting", id);
            }
        }

        self.shared.flush();
        Ok(promise)
    }

    /// Removal hook for hosts with deferred teardown.
    ///
    /// Call once the host has finished tearing a dialog down. Idempotent. If
    /// the host removes a dialog that is still open, the dialog leaves the
    /// stack and its awaiters see [`DialogError::Abandoned`].
    pub fn unmounted(&self, id: DialogId) {
        if self.shared.finish(id) {
            return;
        }

        let taken = lock(&self.shared.state).take_active(id);
        match taken {
            Some(dialog) => {
                log::warn!("Dialog {} unmounted by the host while open", id);
                dialog.context.abandon();
            }
            None => log::warn!("Removal hook for unknown dialog {}", id),
        }
    }

    /// Number of open dialogs.
    pub fn len(&self) -> usize {
        lock(&self.shared.state).active.len()
    }

    /// Returns `true` if no dialog is open.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of open dialogs, bottom to top.
    pub fn ids(&self) -> Vec<DialogId> {
        lock(&self.shared.state)
            .active
            .iter()
            .map(|dialog| dialog.id)
            .collect()
    }

    /// The most recently opened dialog that is still open.
    pub fn top(&self) -> Option<DialogId> {
        lock(&self.shared.state).active.last().map(|dialog| dialog.id)
    }

    /// Returns `true` if `id` is open.
    pub fn is_open(&self, id: DialogId) -> bool {
        StackState::position(&lock(&self.shared.state).active, id).is_some()
    }

    /// Z-index of an open dialog.
    pub fn z_index_of(&self, id: DialogId) -> Option<ZIndex> {
        let state = lock(&self.shared.state);
        StackState::position(&state.active, id).map(|pos| state.active[pos].z_index)
    }

    /// Lifecycle state of a tracked dialog. `None` once fully torn down.
    pub fn state_of(&self, id: DialogId) -> Option<DialogState> {
        let state = lock(&self.shared.state);
        state
            .active
            .iter()
            .chain(&state.closing)
            .find(|dialog| dialog.id == id)
            .map(DialogInstance::state)
    }

    /// Ids of settled dialogs still being torn down.
    pub fn closing(&self) -> Vec<DialogId> {
        lock(&self.shared.state)
            .closing
            .iter()
            .map(|dialog| dialog.id)
            .collect()
    }

    /// Snapshot of open dialogs (bottom to top) followed by closing ones.
    pub fn dialogs(&self) -> Vec<DialogInfo> {
        let state = lock(&self.shared.state);
        state
            .active
            .iter()
            .chain(&state.closing)
            .map(|dialog| DialogInfo {
                id: dialog.id,
                z_index: dialog.z_index,
                state: dialog.state(),
                args: Arc::clone(&dialog.args),
            })
            .collect()
    }

    /// The most recently allocated id, including ids of failed opens.
    pub fn last_id(&self) -> Option<DialogId> {
        lock(&self.shared.state).ids.last()
    }

    /// Run `f` with exclusive access to the host.
    ///
    /// `f` may close dialogs; their teardown runs once `f` returns. It must
    /// not open dialogs on this stack.
    pub fn with_host<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        let out = f(&mut lock(&self.shared.host));
        self.shared.flush();
        out
    }
}

impl<H: Mountable> Clone for DialogStack<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<H: Mountable> StackShared<H> {
    /// Unmount queued handles unless someone else holds the host.
    ///
    /// The holder drains the queue after letting go, so a busy host is not
    /// an error. Returns the teardown failure of `own`, if any; failures of
    /// other dialogs are only logged.
    fn drain(&self, own: Option<DialogId>) -> Result<(), DialogError> {
        let mut outcome = Ok(());
        loop {
            let mut host = match self.host.try_lock() {
                Ok(host) => host,
                Err(TryLockError::Poisoned(e)) => e.into_inner(),
                Err(TryLockError::WouldBlock) => return outcome,
            };
            loop {
                let next = lock(&self.pending).pop_front();
                let Some((id, handle)) = next else {
                    break;
                };
                let result = host.unmount(handle);
                if let Err(e) = self.complete(id, result)
                    && own == Some(id)
                {
                    outcome = Err(e);
                }
            }
            drop(host);

            // Another thread may have queued after we emptied the queue but
            // before we released the host
            if lock(&self.pending).is_empty() {
                return outcome;
            }
        }
    }

    /// Drain the queue on behalf of no particular dialog.
    fn flush(&self) {
        if let Err(e) = self.drain(None) {
            log::error!("{}", e);
        }
    }

    /// Record the host's answer to `unmount`.
    fn complete(
        &self,
        id: DialogId,
        result: Result<Teardown, HostError>,
    ) -> Result<(), DialogError> {
        match result {
            Ok(Teardown::Done) => {
                self.finish(id);
                Ok(())
            }
            Ok(Teardown::Deferred) => {
                log::debug!("Teardown of dialog {} deferred by host", id);
                Ok(())
            }
            Err(source) => {
                self.finish(id);
                let e = DialogError::Unmount { id, source };
                log::error!("{}", e);
                Err(e)
            }
        }
    }

    /// Drop a settled dialog for good. Returns `false` if it was not closing.
    fn finish(&self, id: DialogId) -> bool {
        let Some(mut dialog) = lock(&self.state).take_closing(id) else {
            return false;
        };
        dialog.advance(DialogState::Unmounted);
        log::debug!("Dialog {} unmounted", id);
        true
    }
}

impl<H: Mountable> Settle for StackShared<H> {
    fn settle(&self, id: DialogId) -> Result<(), DialogError> {
        let handle = {
            let mut state = lock(&self.state);
            let Some(mut dialog) = state.take_active(id) else {
                return Ok(());
            };
            dialog.advance(DialogState::Settled);
            log::info!("Dialog {} settled ({} still open)", id, state.active.len());
            let handle = dialog.handle.take();
            state.closing.push(dialog);
            handle
        };

        match handle {
            Some(handle) => {
                lock(&self.pending).push_back((id, handle));
                self.drain(Some(id))
            }
            // Still mounting; `open` queues it once `mount` returns
            None => Ok(()),
        }
    }
}

impl<H: Mountable> Drop for StackShared<H> {
    fn drop(&mut self) {
        let state = lock(&self.state);
        for dialog in state.active.iter().chain(&state.closing) {
            dialog.context.abandon();
        }
    }
}
