// SPDX-License-Identifier: MIT OR Apache-2.0
//! Room node definitions.

use crate::room_type::RoomNodeType;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a room node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomNodeId(pub Uuid);

impl RoomNodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomNodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RoomNodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A room or corridor in the dungeon layout graph.
///
/// Adjacency is kept as ordered id sets. The graph is the only writer of
/// `parent_ids`/`child_ids`, which is why they are not public fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomNode {
    /// Unique instance ID
    pub id: RoomNodeId,
    /// Position in the editor canvas, owned by the presentation layer
    pub position: [f32; 2],
    pub(crate) room_type: RoomNodeType,
    pub(crate) parent_ids: IndexSet<RoomNodeId>,
    pub(crate) child_ids: IndexSet<RoomNodeId>,
}

impl RoomNode {
    pub(crate) fn new(room_type: RoomNodeType) -> Self {
        Self::with_id(RoomNodeId::new(), room_type)
    }

    pub(crate) fn with_id(id: RoomNodeId, room_type: RoomNodeType) -> Self {
        Self {
            id,
            position: [0.0, 0.0],
            room_type,
            parent_ids: IndexSet::new(),
            child_ids: IndexSet::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// The node's room type
    pub fn room_type(&self) -> &RoomNodeType {
        &self.room_type
    }

    /// IDs of nodes that have this node as a child, in connection order
    pub fn parent_ids(&self) -> &IndexSet<RoomNodeId> {
        &self.parent_ids
    }

    /// IDs of this node's children, in connection order
    pub fn child_ids(&self) -> &IndexSet<RoomNodeId> {
        &self.child_ids
    }

    /// Whether this node is the dungeon entrance
    pub fn is_entrance(&self) -> bool {
        self.room_type.is_entrance
    }

    /// Whether this node is a corridor
    pub fn is_corridor(&self) -> bool {
        self.room_type.is_corridor
    }

    /// Whether this node is a boss room
    pub fn is_boss_room(&self) -> bool {
        self.room_type.is_boss_room
    }

    /// Whether some node points to this one
    pub fn has_parent(&self) -> bool {
        !self.parent_ids.is_empty()
    }

    /// Shift the stored position by `delta`
    pub fn drag(&mut self, delta: [f32; 2]) {
        self.position[0] += delta[0];
        self.position[1] += delta[1];
    }

    pub(crate) fn add_child_id(&mut self, id: RoomNodeId) -> bool {
        self.child_ids.insert(id)
    }

    pub(crate) fn add_parent_id(&mut self, id: RoomNodeId) -> bool {
        self.parent_ids.insert(id)
    }

    pub(crate) fn remove_child_id(&mut self, id: RoomNodeId) -> bool {
        self.child_ids.shift_remove(&id)
    }

    pub(crate) fn remove_parent_id(&mut self, id: RoomNodeId) -> bool {
        self.parent_ids.shift_remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parse_round_trip() {
        let id = RoomNodeId::new();
        let parsed: RoomNodeId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<RoomNodeId>().is_err());
    }

    #[test]
    fn test_adjacency_is_a_set() {
        let mut node = RoomNode::new(RoomNodeType::corridor("Corridor"));
        let a = RoomNodeId::new();
        let b = RoomNodeId::new();

        assert!(node.add_child_id(a));
        assert!(!node.add_child_id(a));
        assert!(node.add_child_id(b));
        assert_eq!(node.child_ids().iter().copied().collect::<Vec<_>>(), vec![a, b]);

        assert!(node.remove_child_id(a));
        assert!(!node.remove_child_id(a));
        assert_eq!(node.child_ids().len(), 1);
    }

    #[test]
    fn test_drag() {
        let mut node = RoomNode::new(RoomNodeType::room("Small Room")).with_position(10.0, 5.0);
        node.drag([2.5, -5.0]);
        assert_eq!(node.position, [12.5, 0.0]);
    }
}
