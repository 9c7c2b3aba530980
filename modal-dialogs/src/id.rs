//! Dialog instance identity.

/// Unique identifier for an opened dialog.
///
/// Ids are handed out in call order by the [`IdAllocator`] owned by a
/// [`DialogStack`](crate::DialogStack) and are never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DialogId(u64);

impl DialogId {
    /// Get the raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues strictly increasing dialog ids, starting at 1.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// Create an allocator whose first id is 1.
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Allocate the next id.
    ///
    /// # Panics
    ///
    /// Panics when the id space is exhausted. Handing out a reused id would
    /// break stack uniqueness, so this is treated as a process-level fault.
    pub fn next(&mut self) -> DialogId {
        let Some(next) = self.last.checked_add(1) else {
            panic!("dialog id space exhausted after {} allocations", self.last);
        };
        self.last = next;
        DialogId(next)
    }

    /// The most recently issued id, if any.
    pub fn last(&self) -> Option<DialogId> {
        (self.last > 0).then_some(DialogId(self.last))
    }
}
