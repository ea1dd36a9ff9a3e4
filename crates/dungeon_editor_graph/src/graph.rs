// SPDX-License-Identifier: MIT OR Apache-2.0
//! Room node graph: node storage, connection rules and cascading deletion.

use crate::connection::{Connection, ConnectionRejected};
use crate::node::{RoomNode, RoomNodeId};
use crate::room_type::{RoomNodeType, RoomNodeTypeRegistry};
use crate::settings::GraphSettings;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A dungeon layout graph.
///
/// Nodes live in creation order in `nodes`; `nodes_by_id` maps each id to its
/// slot and is rebuilt whenever slots move. Adjacency is stored on the nodes
/// themselves and every edge is recorded on both endpoints.
#[derive(Debug, Clone)]
pub struct RoomNodeGraph {
    /// Graph name
    pub name: String,
    registry: Arc<RoomNodeTypeRegistry>,
    settings: GraphSettings,
    nodes: Vec<RoomNode>,
    nodes_by_id: HashMap<RoomNodeId, usize>,
}

impl RoomNodeGraph {
    /// Create a new empty graph
    pub fn new(
        name: impl Into<String>,
        registry: Arc<RoomNodeTypeRegistry>,
        settings: GraphSettings,
    ) -> Self {
        Self {
            name: name.into(),
            registry,
            settings,
            nodes: Vec::new(),
            nodes_by_id: HashMap::new(),
        }
    }

    pub(crate) fn from_nodes(
        name: String,
        registry: Arc<RoomNodeTypeRegistry>,
        settings: GraphSettings,
        nodes: Vec<RoomNode>,
    ) -> Self {
        let mut graph = Self {
            name,
            registry,
            settings,
            nodes,
            nodes_by_id: HashMap::new(),
        };
        graph.rebuild_index();
        graph
    }

    /// The room type registry this graph validates against
    pub fn registry(&self) -> &Arc<RoomNodeTypeRegistry> {
        &self.registry
    }

    /// The graph settings
    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    /// Recompute the id index from the node list
    pub fn rebuild_index(&mut self) {
        self.nodes_by_id.clear();
        for (index, node) in self.nodes.iter().enumerate() {
            self.nodes_by_id.insert(node.id, index);
        }
    }

    pub(crate) fn index_len(&self) -> usize {
        self.nodes_by_id.len()
    }

    fn index_of(&self, node_id: RoomNodeId) -> Option<usize> {
        self.nodes_by_id.get(&node_id).copied()
    }

    /// Add a new node to the graph.
    ///
    /// The first node of an empty graph always becomes the entrance,
    /// whatever type was requested. Once an entrance exists, asking for
    /// another one is refused; a loaded graph that lost its entrance may
    /// be given a new one.
    pub fn create_node(
        &mut self,
        position: [f32; 2],
        room_type: &RoomNodeType,
    ) -> Result<RoomNodeId, CreateNodeError> {
        let room_type = if self.nodes.is_empty() {
            self.registry
                .entrance_type()
                .ok_or(CreateNodeError::NoEntranceType)?
        } else {
            let registered = self
                .registry
                .get(&room_type.name)
                .ok_or_else(|| CreateNodeError::UnknownType(room_type.name.clone()))?;
            if registered.is_entrance && self.entrance().is_some() {
                return Err(CreateNodeError::EntranceAlreadyExists);
            }
            registered
        };

        let node = RoomNode::new(room_type.clone()).with_position(position[0], position[1]);
        let id = node.id;
        tracing::debug!("Created {} node {}", node.room_type.name, id);

        self.nodes_by_id.insert(id, self.nodes.len());
        self.nodes.push(node);
        Ok(id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: RoomNodeId) -> Option<&RoomNode> {
        self.index_of(node_id).map(|index| &self.nodes[index])
    }

    /// Get a mutable node by ID.
    ///
    /// Only presentation state is writable from outside the graph.
    pub fn node_mut(&mut self, node_id: RoomNodeId) -> Option<&mut RoomNode> {
        let index = self.index_of(node_id)?;
        Some(&mut self.nodes[index])
    }

    /// Whether a node with this ID exists
    pub fn contains(&self, node_id: RoomNodeId) -> bool {
        self.nodes_by_id.contains_key(&node_id)
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &RoomNode> {
        self.nodes.iter()
    }

    /// All node IDs in creation order
    pub fn node_ids(&self) -> impl Iterator<Item = RoomNodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The entrance node, once the graph has one
    pub fn entrance(&self) -> Option<&RoomNode> {
        self.nodes.iter().find(|n| n.is_entrance())
    }

    /// Children of a node, skipping ids that no longer resolve
    pub fn children_of(&self, node_id: RoomNodeId) -> impl Iterator<Item = &RoomNode> {
        self.node(node_id)
            .into_iter()
            .flat_map(|n| n.child_ids.iter())
            .filter_map(move |id| self.node(*id))
    }

    /// Parents of a node, skipping ids that no longer resolve
    pub fn parents_of(&self, node_id: RoomNodeId) -> impl Iterator<Item = &RoomNode> {
        self.node(node_id)
            .into_iter()
            .flat_map(|n| n.parent_ids.iter())
            .filter_map(move |id| self.node(*id))
    }

    /// Every parent → child edge, grouped by parent in creation order
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.nodes
            .iter()
            .flat_map(|n| n.child_ids.iter().map(move |child| Connection::new(n.id, *child)))
    }

    /// Get the number of edges
    pub fn connection_count(&self) -> usize {
        self.nodes.iter().map(|n| n.child_ids.len()).sum()
    }

    /// Whether any boss room currently has a parent
    pub fn is_boss_room_connected(&self) -> bool {
        self.nodes.iter().any(|n| n.is_boss_room() && n.has_parent())
    }

    /// Check whether `child_id` may become a child of `parent_id`.
    ///
    /// Rules are evaluated in a fixed order and the first failure is
    /// reported. Nothing is mutated.
    pub fn can_connect(
        &self,
        parent_id: RoomNodeId,
        child_id: RoomNodeId,
    ) -> Result<(), ConnectionRejected> {
        let parent = self
            .node(parent_id)
            .ok_or(ConnectionRejected::ParentNotFound(parent_id))?;
        let child = self
            .node(child_id)
            .ok_or(ConnectionRejected::ChildNotFound(child_id))?;

        if child.is_boss_room() && self.is_boss_room_connected() {
            return Err(ConnectionRejected::BossRoomAlreadyConnected);
        }

        if child.room_type.is_none {
            return Err(ConnectionRejected::ChildTypeUnassigned);
        }

        if parent.child_ids.contains(&child_id) {
            return Err(ConnectionRejected::AlreadyConnected);
        }

        if parent_id == child_id {
            return Err(ConnectionRejected::SelfLoop);
        }

        if parent.parent_ids.contains(&child_id) {
            return Err(ConnectionRejected::ReverseConnection);
        }

        if child.has_parent() {
            return Err(ConnectionRejected::ChildAlreadyHasParent);
        }

        if child.is_corridor() == parent.is_corridor() {
            return Err(ConnectionRejected::CorridorMismatch);
        }

        let max_child_corridors = self.settings.max_child_corridors;
        if child.is_corridor() && parent.child_ids.len() >= max_child_corridors {
            return Err(ConnectionRejected::TooManyChildCorridors(max_child_corridors));
        }

        if child.is_entrance() {
            return Err(ConnectionRejected::ChildIsEntrance);
        }

        if !child.is_corridor() && !parent.child_ids.is_empty() {
            return Err(ConnectionRejected::CorridorAlreadyHasChild);
        }

        Ok(())
    }

    /// Connect `child_id` under `parent_id` if every rule allows it.
    ///
    /// On success both endpoints are updated together; on failure the graph
    /// is untouched.
    pub fn try_connect(
        &mut self,
        parent_id: RoomNodeId,
        child_id: RoomNodeId,
    ) -> Result<(), ConnectionRejected> {
        if let Err(reason) = self.can_connect(parent_id, child_id) {
            tracing::trace!("Rejected {} -> {}: {}", parent_id, child_id, reason);
            return Err(reason);
        }

        // Both lookups succeeded in can_connect
        let parent_index = self.nodes_by_id[&parent_id];
        let child_index = self.nodes_by_id[&child_id];
        self.nodes[parent_index].add_child_id(child_id);
        self.nodes[child_index].add_parent_id(parent_id);

        tracing::debug!("Connected {} -> {}", parent_id, child_id);
        Ok(())
    }

    /// Remove the edge `parent_id` → `child_id` from both endpoints.
    ///
    /// Returns whether anything was removed. Missing nodes or edges are a
    /// no-op; a half-edge left on a surviving node is still cleaned up.
    pub fn disconnect(&mut self, parent_id: RoomNodeId, child_id: RoomNodeId) -> bool {
        let mut removed = false;
        if let Some(index) = self.index_of(parent_id) {
            removed |= self.nodes[index].remove_child_id(child_id);
        }
        if let Some(index) = self.index_of(child_id) {
            removed |= self.nodes[index].remove_parent_id(parent_id);
        }
        if removed {
            tracing::debug!("Disconnected {} -> {}", parent_id, child_id);
        }
        removed
    }

    /// Delete every node matching `predicate`, except the entrance.
    ///
    /// All doomed nodes are marked first, then every edge touching one of
    /// them is severed, and only then are they removed. Returns the removed
    /// nodes in creation order, with empty adjacency.
    pub fn delete_nodes_where(
        &mut self,
        mut predicate: impl FnMut(&RoomNode) -> bool,
    ) -> Vec<RoomNode> {
        let doomed: HashSet<RoomNodeId> = self
            .nodes
            .iter()
            .filter(|n| !n.is_entrance() && predicate(*n))
            .map(|n| n.id)
            .collect();

        if doomed.is_empty() {
            return Vec::new();
        }

        let severed: Vec<Connection> = self
            .nodes
            .iter()
            .filter(|n| doomed.contains(&n.id))
            .flat_map(|n| {
                let outgoing = n.child_ids.iter().map(move |c| Connection::new(n.id, *c));
                let incoming = n.parent_ids.iter().map(move |p| Connection::new(*p, n.id));
                outgoing.chain(incoming)
            })
            .collect();

        for edge in severed {
            self.disconnect(edge.parent, edge.child);
        }

        // Half-edges recorded only on a survivor
        for node in self.nodes.iter_mut().filter(|n| !doomed.contains(&n.id)) {
            node.child_ids.retain(|id| !doomed.contains(id));
            node.parent_ids.retain(|id| !doomed.contains(id));
        }

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.nodes)
            .into_iter()
            .partition(|n| doomed.contains(&n.id));
        self.nodes = kept;
        self.rebuild_index();

        tracing::debug!("Deleted {} room nodes", removed.len());
        removed
    }

    /// Delete the listed nodes, except the entrance
    pub fn delete_nodes(&mut self, node_ids: &[RoomNodeId]) -> Vec<RoomNode> {
        let targets: HashSet<RoomNodeId> = node_ids.iter().copied().collect();
        self.delete_nodes_where(|n| targets.contains(&n.id))
    }

    /// Whether the node's room type may currently be changed
    pub fn is_type_editable(&self, node_id: RoomNodeId) -> bool {
        self.node(node_id)
            .is_some_and(|n| !n.has_parent() && !n.is_entrance())
    }

    /// Change a node's room type.
    ///
    /// Only nodes without parents may change type. When the change turns a
    /// corridor into a room (or back), or turns a node into a boss room, all
    /// of the node's child edges are severed.
    pub fn change_node_type(
        &mut self,
        node_id: RoomNodeId,
        new_type: &RoomNodeType,
    ) -> Result<(), TypeChangeRejected> {
        let new_type = self
            .registry
            .get(&new_type.name)
            .cloned()
            .ok_or_else(|| TypeChangeRejected::UnknownType(new_type.name.clone()))?;
        let index = self
            .index_of(node_id)
            .ok_or(TypeChangeRejected::NodeNotFound(node_id))?;

        let node = &self.nodes[index];
        if node.is_entrance() {
            return Err(TypeChangeRejected::IsEntrance);
        }
        if node.has_parent() {
            return Err(TypeChangeRejected::HasParent);
        }
        if new_type.is_entrance {
            return Err(TypeChangeRejected::EntranceType);
        }

        let invalidates_children = node.room_type.corridor_flips(&new_type)
            || (!node.room_type.is_boss_room && new_type.is_boss_room);
        let orphaned: Vec<RoomNodeId> = if invalidates_children {
            node.child_ids.iter().copied().collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            "Changed node {} from {} to {}",
            node_id,
            node.room_type.name,
            new_type.name
        );
        self.nodes[index].room_type = new_type;

        for child_id in orphaned {
            self.disconnect(node_id, child_id);
        }
        Ok(())
    }

    /// Shift a node's stored position. Returns false if the node is missing.
    pub fn move_node(&mut self, node_id: RoomNodeId, delta: [f32; 2]) -> bool {
        match self.node_mut(node_id) {
            Some(node) => {
                node.drag(delta);
                true
            }
            None => false,
        }
    }
}

/// Error when creating a node
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateNodeError {
    /// Requested type is not in the registry
    #[error("Unknown room type: {0}")]
    UnknownType(String),

    /// Registry has no entrance type to bootstrap the graph with
    #[error("Registry has no entrance type")]
    NoEntranceType,

    /// Graph already has its entrance
    #[error("Graph already has an entrance")]
    EntranceAlreadyExists,
}

/// Error when changing a node's type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeChangeRejected {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(RoomNodeId),

    /// Requested type is not in the registry
    #[error("Unknown room type: {0}")]
    UnknownType(String),

    /// The entrance keeps its type
    #[error("The entrance cannot change type")]
    IsEntrance,

    /// Node is already connected as a child
    #[error("Node is connected to a parent")]
    HasParent,

    /// A graph has exactly one entrance
    #[error("Cannot change a node into an entrance")]
    EntranceType,
}
