//! Stack configuration.
//!
//! A [`DialogConfig`] is built once and moved into
//! [`DialogStack::new`](crate::DialogStack::new). It is read-only afterwards.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Default initial z-index value.
pub const DEFAULT_Z_INDEX: u32 = 1000;

/// Process-wide dialog configuration.
///
/// # Example
///
/// ```
/// use modal_dialogs::config::{DialogConfig, MountTarget, ZIndexConfig};
///
/// let config = DialogConfig::default()
///     .with_mount_target(MountTarget::Selector("#dialogs".into()))
///     .with_z_index(ZIndexConfig::enabled(2000, true));
/// assert_eq!(config.z_index.base(), Some(2000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Where the host should place the dialog wrapper.
    #[serde(alias = "mountTarget")]
    pub mount_target: MountTarget,

    /// Z-index stacking behaviour.
    ///
    /// Default: enabled, starting at 1000, auto-incrementing.
    #[serde(alias = "zIndex")]
    pub z_index: ZIndexConfig,

    /// Render options for the wrapper every dialog is mounted inside.
    pub wrapper: RenderOptions,
}

impl DialogConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mount target.
    pub fn with_mount_target(mut self, target: MountTarget) -> Self {
        self.mount_target = target;
        self
    }

    /// Set the z-index behaviour.
    pub fn with_z_index(mut self, z_index: ZIndexConfig) -> Self {
        self.z_index = z_index;
        self
    }

    /// Disable z-index management entirely.
    pub fn without_z_index(self) -> Self {
        self.with_z_index(ZIndexConfig::Disabled)
    }

    /// Set the wrapper render options.
    pub fn with_wrapper(mut self, wrapper: RenderOptions) -> Self {
        self.wrapper = wrapper;
        self
    }
}

/// Where dialogs are mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum MountTarget {
    /// The host creates its own wrapper element.
    #[default]
    Auto,
    /// A host-specific selector naming an existing element.
    Selector(String),
}

impl From<Option<String>> for MountTarget {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Auto, Self::Selector)
    }
}

/// Z-index stacking behaviour.
///
/// Deserializes from `false` (disabled), `true` (defaults), or an object
/// with optional `value` and `auto_increment` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "ZIndexSetting")]
pub enum ZIndexConfig {
    /// No z-index bookkeeping. Dialog styling governs order.
    Disabled,
    /// Assign z-index values starting at `value`.
    Enabled {
        /// Initial z-index value.
        value: u32,
        /// Increase the value for every dialog opened.
        auto_increment: bool,
    },
}

impl Default for ZIndexConfig {
    fn default() -> Self {
        Self::Enabled {
            value: DEFAULT_Z_INDEX,
            auto_increment: true,
        }
    }
}

impl ZIndexConfig {
    /// Enabled stacking with an explicit base value.
    pub fn enabled(value: u32, auto_increment: bool) -> Self {
        Self::Enabled {
            value,
            auto_increment,
        }
    }

    /// Returns `true` unless stacking is disabled.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    /// The configured base value, if enabled.
    pub fn base(&self) -> Option<u32> {
        match self {
            Self::Enabled { value, .. } => Some(*value),
            Self::Disabled => None,
        }
    }
}

/// Wire shape of [`ZIndexConfig`].
#[derive(Deserialize)]
#[serde(untagged)]
enum ZIndexSetting {
    Switch(bool),
    Options(ZIndexOptions),
}

#[derive(Deserialize)]
struct ZIndexOptions {
    #[serde(default = "default_z_value")]
    value: u32,
    #[serde(default = "default_auto_increment", alias = "autoIncrement")]
    auto_increment: bool,
}

fn default_z_value() -> u32 {
    DEFAULT_Z_INDEX
}

fn default_auto_increment() -> bool {
    true
}

impl From<ZIndexSetting> for ZIndexConfig {
    fn from(setting: ZIndexSetting) -> Self {
        match setting {
            ZIndexSetting::Switch(false) => Self::Disabled,
            ZIndexSetting::Switch(true) => Self::default(),
            ZIndexSetting::Options(opts) => Self::enabled(opts.value, opts.auto_increment),
        }
    }
}

/// Host-interpreted render options (classes, attributes, styles, ...).
///
/// The stack never reads these; they are passed through to the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RenderOptions(Map<String, Value>);

impl RenderOptions {
    /// Create empty render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up an option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all options.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}
