//! Stack of modal dialogs with awaitable outcomes.
//!
//! A [`DialogStack`] turns templates into dialog functions. Calling one
//! mounts a dialog through a [`Mountable`](host::Mountable) host and returns
//! a [`DialogPromise`] that resolves with whatever the dialog is closed with.
//!
//! ```
//! use modal_dialogs::prelude::*;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let stack = DialogStack::new(DialogConfig::default(), MemoryHost::<&str>::new());
//! let confirm = stack.make_dialog::<bool>("confirm", ["message"]).unwrap();
//!
//! let promise = confirm.call(["Delete this item?"]).unwrap();
//!
//! // The dialog's own UI closes it
//! let cx = stack.with_host(|host| host.context(promise.id())).unwrap();
//! cx.downcast::<bool>().unwrap().close(true).unwrap();
//!
//! assert!(promise.await.unwrap());
//! # });
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod host;
pub mod id;
pub mod instance;
pub mod promise;
pub mod props;
pub mod stack;
pub mod stacking;

pub use context::{AnyDialogContext, DialogContext};
pub use error::{DialogError, HostError};
pub use factory::{DialogFn, DialogOptions};
pub use id::DialogId;
pub use promise::DialogPromise;
pub use stack::DialogStack;

pub mod prelude {
    pub use crate::config::{DialogConfig, MountTarget, RenderOptions, ZIndexConfig};
    pub use crate::context::{AnyDialogContext, DialogContext};
    pub use crate::error::{DialogError, HostError};
    pub use crate::factory::{DialogFn, DialogOptions};
    pub use crate::host::memory::MemoryHost;
    pub use crate::host::{MountRequest, Mountable, Teardown};
    pub use crate::id::DialogId;
    pub use crate::instance::DialogState;
    pub use crate::promise::DialogPromise;
    pub use crate::stack::{DialogInfo, DialogStack};
    pub use crate::stacking::ZIndex;
}
