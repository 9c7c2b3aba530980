//! Dialog functions.
//!
//! A [`DialogFn`] turns a template and a prop mapping into something you
//! call with arguments to get a [`DialogPromise`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::config::RenderOptions;
use crate::error::DialogError;
use crate::host::Mountable;
use crate::promise::DialogPromise;
use crate::props::PropMapping;
use crate::stack::DialogStack;

/// Options to build a dialog function.
///
/// # Example
///
/// ```
/// use modal_dialogs::config::RenderOptions;
/// use modal_dialogs::DialogOptions;
///
/// let options: DialogOptions<&str> = DialogOptions::new("confirm")
///     .props(["title", "message"])
///     .render(RenderOptions::new().with("class", "danger"));
/// ```
#[derive(Debug, Clone)]
pub struct DialogOptions<T> {
    pub(crate) template: Arc<T>,
    pub(crate) props: Vec<String>,
    pub(crate) render: RenderOptions,
}

impl<T> DialogOptions<T> {
    /// Options for `template` with no props and no render options.
    pub fn new(template: impl Into<Arc<T>>) -> Self {
        Self {
            template: template.into(),
            props: Vec::new(),
            render: RenderOptions::default(),
        }
    }

    /// Map positional arguments to these prop names.
    pub fn props(mut self, props: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.props = props.into_iter().map(Into::into).collect();
        self
    }

    /// Render options passed to the host on every mount.
    pub fn render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

/// A callable that opens dialogs from one template.
///
/// `T` is the outcome type the dialog settles with.
pub struct DialogFn<T, H: Mountable> {
    stack: DialogStack<H>,
    template: Arc<H::Template>,
    props: PropMapping,
    render: RenderOptions,
    _outcome: PhantomData<fn() -> T>,
}

impl<T: Clone + Send + 'static, H: Mountable> DialogFn<T, H> {
    pub(crate) fn new(
        stack: DialogStack<H>,
        template: Arc<H::Template>,
        props: PropMapping,
        render: RenderOptions,
    ) -> Self {
        Self {
            stack,
            template,
            props,
            render,
            _outcome: PhantomData,
        }
    }

    /// Open a dialog with positional arguments.
    ///
    /// Arguments beyond the prop mapping are kept in the dialog's `args` but
    /// not bound to any prop.
    pub fn call<I>(&self, args: I) -> Result<DialogPromise<T>, DialogError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let args = args.into_iter().map(Into::into).collect();
        self.stack.open(&self.template, &self.props, &self.render, args)
    }

    /// The template dialogs are rendered from.
    pub fn template(&self) -> &Arc<H::Template> {
        &self.template
    }

    /// The prop mapping.
    pub fn props(&self) -> &PropMapping {
        &self.props
    }
}

impl<T, H: Mountable> Clone for DialogFn<T, H> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            template: Arc::clone(&self.template),
            props: self.props.clone(),
            render: self.render.clone(),
            _outcome: PhantomData,
        }
    }
}

impl<T, H: Mountable> std::fmt::Debug for DialogFn<T, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogFn")
            .field("props", &self.props)
            .field("render", &self.render)
            .finish_non_exhaustive()
    }
}
