//! Confirm Dialog Example
//!
//! Renders dialogs as text to stdout and answers them from a scripted "user".
//! Shows nested dialogs, out-of-order closes, and force-closing from the
//! caller.
//!
//! Run with `cargo run --example confirm`. Logs go to `confirm.log`.

use std::fs::File;

use modal_dialogs::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

/// A text dialog: a title and the choices the user may pick from.
struct TextDialog {
    title: &'static str,
    choices: &'static [&'static str],
}

/// Host that prints dialogs instead of drawing them.
struct ConsoleHost {
    open: Vec<AnyDialogContext>,
}

impl Mountable for ConsoleHost {
    type Template = TextDialog;
    type Handle = DialogId;

    fn mount(&mut self, request: MountRequest<'_, TextDialog>) -> Result<DialogId, HostError> {
        let indent = "  ".repeat(self.open.len());
        println!(
            "{}┌ [{}] {} (z-index {})",
            indent, request.id, request.template.title, request.z_index
        );
        for (name, value) in request.props.iter() {
            println!("{}│ {}: {}", indent, name, value);
        }
        println!("{}└ {}", indent, request.template.choices.join(" / "));
        self.open.push(request.context);
        Ok(request.id)
    }

    fn unmount(&mut self, handle: DialogId) -> Result<Teardown, HostError> {
        self.open.retain(|cx| cx.id() != handle);
        println!("  (dialog {} closed)", handle);
        Ok(Teardown::Done)
    }
}

impl ConsoleHost {
    fn context(&self, id: DialogId) -> Option<AnyDialogContext> {
        self.open.iter().find(|cx| cx.id() == id).cloned()
    }
}

/// Pretend the user clicked `choice` in dialog `id`.
fn click(stack: &DialogStack<ConsoleHost>, id: DialogId, choice: &str) {
    let Some(cx) = stack.with_host(|host| host.context(id)) else {
        return;
    };
    println!("  > user picks '{}' in {}", choice, id);
    if let Some(cx) = cx.downcast::<String>() {
        if let Err(e) = cx.close(choice.to_string()) {
            log::error!("{}", e);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), DialogError> {
    if let Ok(log_file) = File::create("confirm.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let stack = DialogStack::new(DialogConfig::default(), ConsoleHost { open: Vec::new() });

    let confirm = stack.make_dialog::<String>(
        TextDialog {
            title: "Confirm",
            choices: &["yes", "no"],
        },
        ["message"],
    )?;
    let unsaved = stack.make_dialog::<String>(
        TextDialog {
            title: "Unsaved changes",
            choices: &["save", "discard", "cancel"],
        },
        ["file", "changes"],
    )?;

    // Nested: a second dialog on top of the first
    let quit = confirm.call(["Quit the editor?"])?;
    let save = unsaved.call([serde_json::json!("notes.md"), serde_json::json!(3)])?;

    // Answer the bottom one first
    click(&stack, quit.id(), "yes");
    click(&stack, save.id(), "save");

    println!("quit -> {}", quit.await?);
    println!("save -> {}", save.await?);

    // A fresh dialog still lands above everything opened before
    let reload = confirm.call(["Reload from disk?"])?;
    reload.close("no".into())?;
    click(&stack, reload.id(), "yes");
    println!("reload -> {} (caller closed it first)", reload.await?);

    Ok(())
}
