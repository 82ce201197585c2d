//! Node handles: Opaque references to rendered post nodes.

/// Handle to a node materialized by the document.
///
/// The engine only uses it to ask the document where a node is; it never
/// owns the node or the post data behind it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new node handle.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}
