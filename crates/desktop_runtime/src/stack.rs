//! Stacking-order allocation and topmost resolution.

use crate::model::WindowHandle;

/// First value handed out is one above this seed.
pub const STACK_ORDER_SEED: u64 = 10;

/// Monotonic stack-order counter owned by one desktop instance.
///
/// Values are never reused within the session, so the largest value among visible windows
/// identifies the focused one and no separate focus flag is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackAllocator {
    last: u64,
}

impl Default for StackAllocator {
    fn default() -> Self {
        Self {
            last: STACK_ORDER_SEED,
        }
    }
}

impl StackAllocator {
    /// Returns a value strictly greater than every value previously returned.
    pub fn next_stack_order(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Most recently allocated value (the seed before any allocation).
    pub fn last_allocated(&self) -> u64 {
        self.last
    }
}

/// Returns the non-minimized handle with the greatest stack order.
pub fn topmost_among<'a>(
    handles: impl IntoIterator<Item = &'a WindowHandle>,
) -> Option<&'a WindowHandle> {
    handles
        .into_iter()
        .filter(|handle| !handle.minimized)
        .max_by_key(|handle| handle.stack_order)
}
