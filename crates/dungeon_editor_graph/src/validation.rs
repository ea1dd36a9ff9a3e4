// SPDX-License-Identifier: MIT OR Apache-2.0
//! Whole-graph consistency audit.
//!
//! Mutations on [`RoomNodeGraph`] keep the graph valid on their own. This
//! audit exists for graphs that arrive from outside, such as hand-edited or
//! older documents.

use crate::connection::Connection;
use crate::graph::RoomNodeGraph;
use crate::node::RoomNodeId;
use std::collections::HashSet;

/// A single rule the graph currently breaks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphViolation {
    /// Non-empty graph without an entrance
    #[error("Graph has no entrance")]
    MissingEntrance,

    /// More than one entrance
    #[error("Graph has {0} entrances")]
    MultipleEntrances(usize),

    /// The entrance has a parent
    #[error("Entrance {0} has a parent")]
    EntranceHasParent(RoomNodeId),

    /// The id index disagrees with the node list
    #[error("Node index out of sync with node list")]
    IndexOutOfSync,

    /// A node lists itself as parent or child
    #[error("Node {0} is connected to itself")]
    SelfLoop(RoomNodeId),

    /// An adjacency entry names a node that does not exist
    #[error("Node {node} references missing node {missing}")]
    DanglingReference {
        /// Node holding the reference
        node: RoomNodeId,
        /// Missing id
        missing: RoomNodeId,
    },

    /// An edge is recorded on one endpoint only
    #[error("Edge {} -> {} is recorded on one side only", .0.parent, .0.child)]
    NotReciprocal(Connection),

    /// Two nodes point at each other
    #[error("Nodes {} and {} are connected both ways", .0.parent, .0.child)]
    TwoWayConnection(Connection),

    /// More than one boss room has a parent
    #[error("{0} boss rooms are connected")]
    MultipleBossRoomsConnected(usize),

    /// A node has more than one parent
    #[error("Node {0} has more than one parent")]
    MultipleParents(RoomNodeId),

    /// A node has more children than its kind allows
    #[error("Node {node} has {count} children, limit is {limit}")]
    TooManyChildren {
        /// Offending node
        node: RoomNodeId,
        /// Current child count
        count: usize,
        /// Allowed child count
        limit: usize,
    },

    /// An edge joins two corridors or two rooms
    #[error("Edge {} -> {} must join a corridor and a room", .0.parent, .0.child)]
    CorridorMismatch(Connection),

    /// An unassigned node is somebody's child
    #[error("Unassigned node {0} has a parent")]
    UnassignedChild(RoomNodeId),
}

impl RoomNodeGraph {
    /// Audit every structural rule and report what is broken
    pub fn validate(&self) -> Vec<GraphViolation> {
        let mut violations = Vec::new();

        let index_ok = self
            .nodes()
            .all(|n| self.node(n.id).map(|found| found.id) == Some(n.id))
            && self.node_ids().collect::<HashSet<_>>().len() == self.node_count()
            && self.index_len() == self.node_count();
        if !index_ok {
            violations.push(GraphViolation::IndexOutOfSync);
        }

        let entrances: Vec<_> = self.nodes().filter(|n| n.is_entrance()).collect();
        match entrances.len() {
            0 if !self.is_empty() => violations.push(GraphViolation::MissingEntrance),
            0 | 1 => {}
            count => violations.push(GraphViolation::MultipleEntrances(count)),
        }
        for entrance in &entrances {
            if entrance.has_parent() {
                violations.push(GraphViolation::EntranceHasParent(entrance.id));
            }
        }

        let connected_bosses = self
            .nodes()
            .filter(|n| n.is_boss_room() && n.has_parent())
            .count();
        if connected_bosses > 1 {
            violations.push(GraphViolation::MultipleBossRoomsConnected(connected_bosses));
        }

        let max_child_corridors = self.settings().max_child_corridors;
        for node in self.nodes() {
            if node.parent_ids().contains(&node.id) || node.child_ids().contains(&node.id) {
                violations.push(GraphViolation::SelfLoop(node.id));
            }

            if node.parent_ids().len() > 1 {
                violations.push(GraphViolation::MultipleParents(node.id));
            }

            if node.has_parent() && node.room_type().is_none {
                violations.push(GraphViolation::UnassignedChild(node.id));
            }

            let limit = if node.is_corridor() { 1 } else { max_child_corridors };
            if node.child_ids().len() > limit {
                violations.push(GraphViolation::TooManyChildren {
                    node: node.id,
                    count: node.child_ids().len(),
                    limit,
                });
            }

            for parent_id in node.parent_ids() {
                match self.node(*parent_id) {
                    None => violations.push(GraphViolation::DanglingReference {
                        node: node.id,
                        missing: *parent_id,
                    }),
                    Some(parent) if !parent.child_ids().contains(&node.id) => violations
                        .push(GraphViolation::NotReciprocal(Connection::new(*parent_id, node.id))),
                    Some(_) => {}
                }
            }

            for child_id in node.child_ids() {
                let edge = Connection::new(node.id, *child_id);
                let Some(child) = self.node(*child_id) else {
                    violations.push(GraphViolation::DanglingReference {
                        node: node.id,
                        missing: *child_id,
                    });
                    continue;
                };

                if !child.parent_ids().contains(&node.id) {
                    violations.push(GraphViolation::NotReciprocal(edge));
                }
                if *child_id != node.id && node.parent_ids().contains(child_id) {
                    violations.push(GraphViolation::TwoWayConnection(edge));
                }
                if child.is_corridor() == node.is_corridor() && *child_id != node.id {
                    violations.push(GraphViolation::CorridorMismatch(edge));
                }
            }
        }

        for violation in &violations {
            tracing::debug!("Graph '{}': {}", self.name, violation);
        }
        violations
    }

    /// Whether the audit finds nothing wrong
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
