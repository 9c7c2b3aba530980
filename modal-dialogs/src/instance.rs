//! Runtime record of one opened dialog.

use std::sync::Arc;

use serde_json::Value;

use crate::context::AnyDialogContext;
use crate::id::DialogId;
use crate::stacking::ZIndex;

/// Lifecycle of a dialog instance. Strictly `Open -> Settled -> Unmounted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DialogState {
    /// Mounted and on the stack.
    Open,
    /// Outcome recorded; off the stack, teardown pending.
    Settled,
    /// Torn down.
    Unmounted,
}

impl DialogState {
    /// The state that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Open => Some(Self::Settled),
            Self::Settled => Some(Self::Unmounted),
            Self::Unmounted => None,
        }
    }
}

/// A dialog tracked by the stack.
pub(crate) struct DialogInstance<H> {
    pub id: DialogId,
    pub args: Arc<[Value]>,
    pub z_index: ZIndex,
    state: DialogState,
    /// `None` while mounting, and after teardown has been started.
    pub handle: Option<H>,
    pub context: AnyDialogContext,
}

impl<H> DialogInstance<H> {
    pub fn new(id: DialogId, args: Arc<[Value]>, z_index: ZIndex, context: AnyDialogContext) -> Self {
        Self {
            id,
            args,
            z_index,
            state: DialogState::Open,
            handle: None,
            context,
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    /// Step to the next state. Returns `false` if `to` is not the next state.
    pub fn advance(&mut self, to: DialogState) -> bool {
        if self.state.next() != Some(to) {
            log::warn!(
                "Dialog {}: refusing transition {:?} -> {:?}",
                self.id,
                self.state,
                to
            );
            return false;
        }
        self.state = to;
        true
    }
}
