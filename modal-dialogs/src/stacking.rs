//! Z-index assignment.
//!
//! Values depend on how many dialogs have ever been opened, not on the
//! current stack depth. Dialogs close out of order, and reusing a lower value
//! after a close could place a new dialog beneath an older one that is still
//! open.

use crate::config::ZIndexConfig;
use crate::error::DialogError;

/// Visual layering value of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZIndex {
    /// Stacking is disabled; the dialog's own styling decides.
    Inherit,
    /// Explicit layer value.
    Layer(u32),
}

impl ZIndex {
    /// The explicit value, if any.
    pub fn value(self) -> Option<u32> {
        match self {
            Self::Layer(value) => Some(value),
            Self::Inherit => None,
        }
    }
}

impl std::fmt::Display for ZIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inherit => write!(f, "inherit"),
            Self::Layer(value) => write!(f, "{}", value),
        }
    }
}

/// Computes the z-index of each newly opened dialog.
#[derive(Debug)]
pub struct StackingPolicy {
    config: ZIndexConfig,
    /// Dialogs that have reserved a z-index so far. Never decreases.
    opened: u64,
}

impl StackingPolicy {
    /// Create a policy for the given configuration.
    pub fn new(config: ZIndexConfig) -> Self {
        Self { config, opened: 0 }
    }

    /// Reserve a z-index for a dialog about to be opened.
    ///
    /// `current` is the number of dialogs currently open. It is accepted so
    /// the policy sees the whole stack, but the enabled variant ignores it.
    pub fn assign(&mut self, current: usize) -> Result<ZIndex, DialogError> {
        let ZIndexConfig::Enabled {
            value: base,
            auto_increment,
        } = self.config
        else {
            return Ok(ZIndex::Inherit);
        };

        let offset = if auto_increment { self.opened } else { 0 };
        let z = u32::try_from(offset)
            .ok()
            .and_then(|offset| base.checked_add(offset))
            .ok_or(DialogError::StackingExhausted {
                base,
                opened: self.opened,
            })?;

        self.opened += 1;
        log::debug!(
            "Assigned z-index {} ({} open, {} opened so far)",
            z,
            current,
            self.opened
        );
        Ok(ZIndex::Layer(z))
    }

    /// Number of z-index values reserved so far.
    pub fn opened(&self) -> u64 {
        self.opened
    }
}
