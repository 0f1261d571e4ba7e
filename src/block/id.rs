use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, session-stable identifier of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u64);

impl BlockId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blk-{}", self.0)
    }
}

/// Hands out fresh block ids. One allocator lives per editor session, so ids
/// are never reused while the session is open, not even across resyncs.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> BlockId {
        let id = BlockId(self.next);
        self.next += 1;
        id
    }

    /// Makes sure future ids are strictly greater than `id`.
    /// Used when blocks with existing ids are restored from a snapshot.
    pub fn reserve_past(&mut self, id: BlockId) {
        if id.0 >= self.next {
            self.next = id.0 + 1;
        }
    }
}
