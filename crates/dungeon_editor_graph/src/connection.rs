// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parent → child edges and the reasons an edge can be refused.

use crate::node::RoomNodeId;
use serde::{Deserialize, Serialize};

/// A directed parent → child edge between two room nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Parent node ID
    pub parent: RoomNodeId,
    /// Child node ID
    pub child: RoomNodeId,
}

impl Connection {
    /// Create a new connection
    pub fn new(parent: RoomNodeId, child: RoomNodeId) -> Self {
        Self { parent, child }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: RoomNodeId) -> bool {
        self.parent == node_id || self.child == node_id
    }
}

/// Why a parent → child edge was refused.
///
/// Variants are listed in the order the rules are checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionRejected {
    /// Parent node not found
    #[error("Parent node not found: {0}")]
    ParentNotFound(RoomNodeId),

    /// Child node not found
    #[error("Child node not found: {0}")]
    ChildNotFound(RoomNodeId),

    /// Some boss room already has a parent
    #[error("A boss room is already connected")]
    BossRoomAlreadyConnected,

    /// Child has no room type assigned
    #[error("Cannot connect an unassigned room")]
    ChildTypeUnassigned,

    /// The edge already exists
    #[error("Already connected")]
    AlreadyConnected,

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// The reverse edge already exists
    #[error("Reverse connection already exists")]
    ReverseConnection,

    /// Child already has a parent
    #[error("Child already has a parent")]
    ChildAlreadyHasParent,

    /// Both endpoints are corridors, or neither is
    #[error("Connections must join a corridor and a room")]
    CorridorMismatch,

    /// Parent already has the maximum number of corridors
    #[error("Room already has {0} child corridors")]
    TooManyChildCorridors(usize),

    /// The entrance can never be a child
    #[error("The entrance cannot be a child")]
    ChildIsEntrance,

    /// Corridor already leads to a room
    #[error("Corridor already leads to a room")]
    CorridorAlreadyHasChild,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involves_node() {
        let a = RoomNodeId::new();
        let b = RoomNodeId::new();
        let edge = Connection::new(a, b);
        assert!(edge.involves_node(a));
        assert!(edge.involves_node(b));
        assert!(!edge.involves_node(RoomNodeId::new()));
    }
}
