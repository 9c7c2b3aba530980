//! End-to-end dialog stack scenarios driven through the in-memory host.

use modal_dialogs::prelude::*;
use serde_json::json;

type Host = MemoryHost<&'static str>;

fn stack(config: DialogConfig) -> DialogStack<Host> {
    DialogStack::new(config, MemoryHost::new())
}

/// Close a dialog the way its own UI would.
fn close_from_ui<T: Send + 'static>(stack: &DialogStack<Host>, id: DialogId, outcome: T) {
    let cx = stack
        .with_host(|host| host.context(id))
        .expect("dialog is mounted");
    cx.downcast::<T>()
        .expect("outcome type matches")
        .close(outcome)
        .unwrap();
}

#[tokio::test]
async fn test_z_index_follows_open_count_not_stack_size() {
    let stack = stack(DialogConfig::default());
    let dialog = stack.make_dialog::<String>("confirm", ["message"]).unwrap();

    let d1 = dialog.call(["first"]).unwrap();
    assert_eq!(d1.id().get(), 1);
    assert_eq!(stack.z_index_of(d1.id()), Some(ZIndex::Layer(1000)));

    let d2 = dialog.call(["second"]).unwrap();
    assert_eq!(d2.id().get(), 2);
    assert_eq!(stack.z_index_of(d2.id()), Some(ZIndex::Layer(1001)));

    close_from_ui(&stack, d1.id(), "ok".to_string());
    assert_eq!(d1.clone().await.unwrap(), "ok");
    assert_eq!(stack.ids(), vec![d2.id()]);

    let d3 = dialog.call(["third"]).unwrap();
    assert_eq!(d3.id().get(), 3);
    assert_eq!(stack.z_index_of(d3.id()), Some(ZIndex::Layer(1002)));
}

#[tokio::test]
async fn test_force_close_before_ui_close() {
    let stack = stack(DialogConfig::default());
    let dialog = stack.make_dialog::<String>("prompt", ["label"]).unwrap();
    let promise = dialog.call(["Name"]).unwrap();

    let cx = stack
        .with_host(|host| host.context(promise.id()))
        .unwrap()
        .downcast::<String>()
        .unwrap();

    promise.close("from caller".to_string()).unwrap();
    cx.close("from dialog".to_string()).unwrap();

    assert_eq!(promise.await.unwrap(), "from caller");
}

#[tokio::test]
async fn test_ui_close_before_force_close() {
    let stack = stack(DialogConfig::default());
    let dialog = stack.make_dialog::<u8>("rating", Vec::<String>::new()).unwrap();
    let promise = dialog.call(Vec::<serde_json::Value>::new()).unwrap();

    close_from_ui(&stack, promise.id(), 5u8);
    // No error, no effect
    let again = promise.close(1).unwrap();
    assert_eq!(again.clone().await.unwrap(), 5);
    assert_eq!(promise.await.unwrap(), 5);
}

#[tokio::test]
async fn test_chained_close_then_await() {
    let stack = stack(DialogConfig::default());
    let dialog = stack.make_dialog::<bool>("confirm", ["message"]).unwrap();

    let promise = dialog.call(["Sure?"]).unwrap();
    let confirmed = promise.close(true).unwrap().clone().await.unwrap();
    assert!(confirmed);
}

#[test]
fn test_disabled_stacking_uses_sentinel() {
    let stack = stack(DialogConfig::default().without_z_index());
    let dialog = stack.make_dialog::<()>("alert", ["text"]).unwrap();

    let mut opened = Vec::new();
    for n in 0..5 {
        opened.push(dialog.call([n]).unwrap());
    }
    for promise in &opened {
        assert_eq!(stack.z_index_of(promise.id()), Some(ZIndex::Inherit));
    }
    stack.with_host(|host| {
        assert!(host.mounted().iter().all(|d| d.z_index == ZIndex::Inherit));
    });
}

#[test]
fn test_custom_base_without_auto_increment() {
    let stack = stack(DialogConfig::default().with_z_index(ZIndexConfig::enabled(10, false)));
    let dialog = stack.make_dialog::<()>("alert", ["text"]).unwrap();

    let a = dialog.call(["a"]).unwrap();
    let b = dialog.call(["b"]).unwrap();
    assert_eq!(stack.z_index_of(a.id()), Some(ZIndex::Layer(10)));
    assert_eq!(stack.z_index_of(b.id()), Some(ZIndex::Layer(10)));
}

#[tokio::test]
async fn test_out_of_order_closes() {
    let stack = stack(DialogConfig::default());
    let dialog = stack.make_dialog::<usize>("step", ["n"]).unwrap();

    let promises: Vec<_> = (0..4).map(|n| dialog.call([n]).unwrap()).collect();

    // Middle first, then top, then bottom
    promises[1].close(1).unwrap();
    promises[3].close(3).unwrap();
    promises[0].close(0).unwrap();

    assert_eq!(stack.ids(), vec![promises[2].id()]);
    assert_eq!(stack.top(), Some(promises[2].id()));

    promises[2].close(2).unwrap();
    assert!(stack.is_empty());

    for (n, promise) in promises.into_iter().enumerate() {
        assert_eq!(promise.await.unwrap(), n);
    }
}

#[tokio::test]
async fn test_open_from_awaiting_task() {
    let stack = stack(DialogConfig::default());
    let first = stack.make_dialog::<bool>("confirm", ["message"]).unwrap();
    let second = stack.make_dialog::<String>("prompt", ["label"]).unwrap();

    let p1 = first.call(["Continue?"]).unwrap();
    p1.close(true).unwrap();

    // Opening right after a close, while the first outcome is still unread
    let p2 = second.call(["Name"]).unwrap();
    assert_eq!(stack.ids(), vec![p2.id()]);
    assert_eq!(stack.z_index_of(p2.id()), Some(ZIndex::Layer(1001)));

    assert!(p1.await.unwrap());
    p2.close("done".into()).unwrap();
    assert_eq!(p2.await.unwrap(), "done");
}

#[tokio::test]
async fn test_dropping_stack_abandons_open_dialogs() {
    let stack = stack(DialogConfig::default());
    let dialog = stack.make_dialog::<()>("alert", ["text"]).unwrap();
    let promise = dialog.call(["bye"]).unwrap();
    let id = promise.id();

    drop(dialog);
    drop(stack);

    assert!(matches!(promise.await, Err(DialogError::Abandoned(abandoned)) if abandoned == id));
}

#[test]
fn test_mount_failure_propagates() {
    let stack = stack(DialogConfig::default());
    let dialog = stack.make_dialog::<()>("alert", ["text"]).unwrap();

    stack.with_host(|host| host.fail_next_mount(HostError::TargetNotFound("#modals".into())));
    let err = dialog.call(["x"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to mount dialog: Mount target not found: #modals"
    );
    assert!(stack.is_empty());
    assert!(stack.with_host(|host| host.mounted().is_empty()));
}

#[test]
fn test_props_and_args_reach_the_dialog() {
    let stack = stack(DialogConfig::default());
    let dialog = stack.make_dialog::<()>("form", ["title", "fields"]).unwrap();

    let promise = dialog
        .call([json!("New user"), json!(["name", "email"]), json!("extra")])
        .unwrap();

    stack.with_host(|host| {
        let mounted = host.get(promise.id()).unwrap();
        assert_eq!(mounted.props.get("title"), Some(&json!("New user")));
        assert_eq!(mounted.props.get("fields"), Some(&json!(["name", "email"])));
        assert_eq!(mounted.props.len(), 2);
        assert_eq!(mounted.context.args().len(), 3);
        assert_eq!(mounted.context.id(), promise.id());
    });
}

#[test]
fn test_wrapper_and_target_passed_to_host() {
    struct Recording {
        seen: Vec<(MountTarget, RenderOptions)>,
    }

    impl Mountable for Recording {
        type Template = ();
        type Handle = DialogId;

        fn mount(&mut self, request: MountRequest<'_, ()>) -> Result<DialogId, HostError> {
            self.seen
                .push((request.target.clone(), request.wrapper.clone()));
            Ok(request.id)
        }

        fn unmount(&mut self, _handle: DialogId) -> Result<Teardown, HostError> {
            Ok(Teardown::Done)
        }
    }

    let config = DialogConfig::default()
        .with_mount_target(MountTarget::Selector("#overlay".into()))
        .with_wrapper(RenderOptions::new().with("name", "fade"));
    let stack = DialogStack::new(config, Recording { seen: Vec::new() });
    let dialog = stack.make_dialog::<()>((), Vec::<String>::new()).unwrap();
    dialog.call(Vec::<serde_json::Value>::new()).unwrap();

    stack.with_host(|host| {
        let (target, wrapper) = &host.seen[0];
        assert_eq!(target, &MountTarget::Selector("#overlay".into()));
        assert_eq!(wrapper.get("name"), Some(&json!("fade")));
    });
}

#[tokio::test]
async fn test_dialog_closing_itself_during_mount() {
    struct EagerHost {
        unmounted: Vec<DialogId>,
    }

    impl Mountable for EagerHost {
        type Template = ();
        type Handle = DialogId;

        fn mount(&mut self, request: MountRequest<'_, ()>) -> Result<DialogId, HostError> {
            // Dialog decides immediately, before mount returns
            let cx = request.context.downcast::<&'static str>().unwrap();
            cx.close("instant").unwrap();
            Ok(request.id)
        }

        fn unmount(&mut self, handle: DialogId) -> Result<Teardown, HostError> {
            self.unmounted.push(handle);
            Ok(Teardown::Done)
        }
    }

    let stack = DialogStack::new(
        DialogConfig::default(),
        EagerHost {
            unmounted: Vec::new(),
        },
    );
    let dialog = stack.make_dialog::<&'static str>((), Vec::<String>::new()).unwrap();
    let promise = dialog.call(Vec::<serde_json::Value>::new()).unwrap();

    assert!(stack.is_empty());
    assert!(stack.closing().is_empty());
    assert_eq!(stack.with_host(|host| host.unmounted.clone()), vec![promise.id()]);
    assert_eq!(promise.await.unwrap(), "instant");
}

#[test]
fn test_exhausted_stacking_leaves_stack_unchanged() {
    let stack = stack(DialogConfig::default().with_z_index(ZIndexConfig::enabled(u32::MAX, true)));
    let dialog = stack.make_dialog::<()>("alert", ["text"]).unwrap();

    let top = dialog.call(["a"]).unwrap();
    assert_eq!(stack.z_index_of(top.id()), Some(ZIndex::Layer(u32::MAX)));

    let err = dialog.call(["b"]).unwrap_err();
    assert!(matches!(
        err,
        DialogError::StackingExhausted {
            base: u32::MAX,
            opened: 1
        }
    ));

    assert_eq!(stack.ids(), vec![top.id()]);
    assert!(stack.closing().is_empty());
    assert_eq!(stack.with_host(|host| host.mounted().len()), 1);
    // The id was spent on the failed open
    assert_eq!(stack.last_id().map(DialogId::get), Some(2));
}

#[tokio::test]
async fn test_mount_replaces_previous_dialog() {
    /// Shows one dialog at a time: mounting a new one dismisses the old one.
    struct ReplacingHost {
        current: Option<AnyDialogContext>,
        unmounted: Vec<DialogId>,
    }

    impl Mountable for ReplacingHost {
        type Template = ();
        type Handle = DialogId;

        fn mount(&mut self, request: MountRequest<'_, ()>) -> Result<DialogId, HostError> {
            if let Some(previous) = self.current.replace(request.context) {
                previous.downcast::<u8>().unwrap().close(0).unwrap();
            }
            Ok(request.id)
        }

        fn unmount(&mut self, handle: DialogId) -> Result<Teardown, HostError> {
            self.unmounted.push(handle);
            Ok(Teardown::Done)
        }
    }

    let stack = DialogStack::new(
        DialogConfig::default(),
        ReplacingHost {
            current: None,
            unmounted: Vec::new(),
        },
    );
    let dialog = stack.make_dialog::<u8>((), Vec::<String>::new()).unwrap();

    let first = dialog.call(Vec::<serde_json::Value>::new()).unwrap();
    let second = dialog.call(Vec::<serde_json::Value>::new()).unwrap();

    assert_eq!(stack.ids(), vec![second.id()]);
    assert!(stack.closing().is_empty());
    assert_eq!(stack.state_of(first.id()), None);
    assert_eq!(stack.with_host(|host| host.unmounted.clone()), vec![first.id()]);
    assert_eq!(first.await.unwrap(), 0);

    second.close(7).unwrap();
    assert!(stack.is_empty());
    assert_eq!(second.await.unwrap(), 7);
}

#[tokio::test]
async fn test_unmount_dismisses_dialogs_above() {
    /// Tearing a dialog down also dismisses everything stacked on it.
    struct CascadingHost {
        open: Vec<AnyDialogContext>,
        unmounted: Vec<DialogId>,
    }

    impl Mountable for CascadingHost {
        type Template = ();
        type Handle = DialogId;

        fn mount(&mut self, request: MountRequest<'_, ()>) -> Result<DialogId, HostError> {
            self.open.push(request.context);
            Ok(request.id)
        }

        fn unmount(&mut self, handle: DialogId) -> Result<Teardown, HostError> {
            self.unmounted.push(handle);
            let above: Vec<_> = self
                .open
                .iter()
                .filter(|cx| cx.id() > handle && !cx.is_closed())
                .cloned()
                .collect();
            self.open.retain(|cx| cx.id() < handle);
            for cx in above {
                cx.downcast::<&'static str>()
                    .unwrap()
                    .close("dismissed")
                    .unwrap();
            }
            Ok(Teardown::Done)
        }
    }

    let stack = DialogStack::new(
        DialogConfig::default(),
        CascadingHost {
            open: Vec::new(),
            unmounted: Vec::new(),
        },
    );
    let dialog = stack.make_dialog::<&'static str>((), Vec::<String>::new()).unwrap();

    let base = dialog.call(Vec::<serde_json::Value>::new()).unwrap();
    let parent = dialog.call(Vec::<serde_json::Value>::new()).unwrap();
    let child = dialog.call(Vec::<serde_json::Value>::new()).unwrap();

    parent.close("ok").unwrap();

    assert_eq!(stack.ids(), vec![base.id()]);
    assert!(stack.closing().is_empty());
    assert_eq!(
        stack.with_host(|host| host.unmounted.clone()),
        vec![parent.id(), child.id()]
    );
    assert_eq!(parent.await.unwrap(), "ok");
    assert_eq!(child.await.unwrap(), "dismissed");
}

#[tokio::test]
async fn test_host_removing_open_dialog_abandons_it() {
    let stack = stack(DialogConfig::default());
    let dialog = stack.make_dialog::<()>("alert", ["text"]).unwrap();
    let promise = dialog.call(["gone"]).unwrap();
    let id = promise.id();

    stack.unmounted(id);

    assert!(stack.is_empty());
    assert!(matches!(promise.await, Err(DialogError::Abandoned(abandoned)) if abandoned == id));
}
