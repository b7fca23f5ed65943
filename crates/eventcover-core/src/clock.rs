use crate::types::BlockHeight;

/// Host-supplied time source. Must be non-decreasing across transactions.
pub trait Clock {
    /// Current height.
    fn now(&self) -> BlockHeight;
}

/// Clock pinned to a single height, as supplied per transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub BlockHeight);

impl FixedClock {
    /// Creates a clock reading `height`.
    pub fn at(height: u64) -> Self {
        Self(BlockHeight(height))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> BlockHeight {
        self.0
    }
}
