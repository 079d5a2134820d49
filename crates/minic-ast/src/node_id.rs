//! Node identity, for the analyzer's write-once tag side-table.
//!
//! The donor workspace hands out identity the same way in two places
//! (`faxc_util::def_id::DefIdGenerator`, `faxc-sem`'s `ExprId`): an
//! atomic counter producing fresh, process-wide-unique small integers.
//! `NodeId` reuses that idiom narrowly, for AST node identity rather
//! than a definition arena (see DESIGN.md for why the donor's
//! definition-arena machinery itself was dropped).

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Allocate a fresh id. Every AST node constructor calls this
    /// exactly once, so no two nodes in a tree ever share an id.
    pub fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
