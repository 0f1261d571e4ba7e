use crate::block::LogicBlock;
use serde::{Deserialize, Serialize};

/// A block together with its (possibly empty) nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockView {
    pub block: LogicBlock,
    #[serde(default)]
    pub children: Vec<BlockView>,
}

impl BlockView {
    /// Number of blocks in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(BlockView::count).sum::<usize>()
    }
}
