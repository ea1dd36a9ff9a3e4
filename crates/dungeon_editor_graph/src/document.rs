// SPDX-License-Identifier: MIT OR Apache-2.0
//! On-disk form of a room node graph.
//!
//! A document is a flat, ordered list of node records. Room types are stored
//! by name and resolved against a registry on load; the id index is never
//! stored and is rebuilt from the record order.

use crate::graph::RoomNodeGraph;
use crate::node::{RoomNode, RoomNodeId};
use crate::room_type::RoomNodeTypeRegistry;
use crate::settings::GraphSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Current graph document format version
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// File extension for graph documents
pub const DOCUMENT_EXTENSION: &str = "roomgraph";

/// One node as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomNodeRecord {
    /// Node ID
    pub id: RoomNodeId,
    /// Room type name
    pub room_type: String,
    /// Editor position
    #[serde(default)]
    pub position: [f32; 2],
    /// Parent node IDs
    #[serde(default)]
    pub parent_ids: Vec<RoomNodeId>,
    /// Child node IDs
    #[serde(default)]
    pub child_ids: Vec<RoomNodeId>,
}

impl From<&RoomNode> for RoomNodeRecord {
    fn from(node: &RoomNode) -> Self {
        Self {
            id: node.id,
            room_type: node.room_type().name.clone(),
            position: node.position,
            parent_ids: node.parent_ids().iter().copied().collect(),
            child_ids: node.child_ids().iter().copied().collect(),
        }
    }
}

/// Serialized room node graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomNodeGraphDocument {
    /// Format version
    pub version: u32,
    /// Graph name
    pub name: String,
    /// Nodes in creation order
    pub nodes: Vec<RoomNodeRecord>,
}

impl RoomNodeGraphDocument {
    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Serialize to pretty JSON for external tools
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl RoomNodeGraph {
    /// Flatten the graph into a document
    pub fn to_document(&self) -> RoomNodeGraphDocument {
        RoomNodeGraphDocument {
            version: DOCUMENT_FORMAT_VERSION,
            name: self.name.clone(),
            nodes: self.nodes().map(RoomNodeRecord::from).collect(),
        }
    }

    /// Rebuild a graph from a document.
    ///
    /// Type names must resolve in `registry` and ids must be unique.
    /// Adjacency is taken as stored; run [`RoomNodeGraph::validate`] to audit it.
    pub fn from_document(
        document: RoomNodeGraphDocument,
        registry: Arc<RoomNodeTypeRegistry>,
        settings: GraphSettings,
    ) -> Result<Self, DocumentError> {
        if document.version > DOCUMENT_FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion(document.version));
        }

        let mut seen = HashSet::with_capacity(document.nodes.len());
        let mut nodes = Vec::with_capacity(document.nodes.len());
        for record in document.nodes {
            if !seen.insert(record.id) {
                return Err(DocumentError::DuplicateNodeId(record.id));
            }

            let room_type = registry.get(&record.room_type).ok_or_else(|| {
                DocumentError::UnknownRoomType {
                    node: record.id,
                    name: record.room_type.clone(),
                }
            })?;

            let mut node = RoomNode::with_id(record.id, room_type.clone());
            node.position = record.position;
            node.parent_ids.extend(record.parent_ids);
            node.child_ids.extend(record.child_ids);
            nodes.push(node);
        }

        Ok(Self::from_nodes(document.name, registry, settings, nodes))
    }

    /// Save the graph as a RON document
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let ron_str = self.to_document().to_ron()?;
        std::fs::write(path, ron_str)?;
        tracing::info!("Saved room graph '{}' to {:?}", self.name, path);
        Ok(())
    }

    /// Load a graph from a RON document
    pub fn load(
        path: &Path,
        registry: Arc<RoomNodeTypeRegistry>,
        settings: GraphSettings,
    ) -> Result<Self, DocumentError> {
        let contents = std::fs::read_to_string(path)?;
        let document = RoomNodeGraphDocument::from_ron(&contents)?;
        let graph = Self::from_document(document, registry, settings)?;
        tracing::info!(
            "Loaded room graph '{}' ({} nodes) from {:?}",
            graph.name,
            graph.node_count(),
            path
        );
        Ok(graph)
    }
}

/// Error reading or writing a graph document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization failure
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document written by a newer version
    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(u32),

    /// Two records share an id
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(RoomNodeId),

    /// Record names a type the registry does not know
    #[error("Node {node} has unknown room type '{name}'")]
    UnknownRoomType {
        /// Offending node
        node: RoomNodeId,
        /// Type name as stored
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> RoomNodeGraph {
        let registry = Arc::new(RoomNodeTypeRegistry::with_defaults());
        let mut graph = RoomNodeGraph::new("Level 1", registry, GraphSettings::default());
        let entrance_type = graph.registry().entrance_type().unwrap().clone();
        let corridor_type = graph.registry().corridor_type().unwrap().clone();
        let room_type = graph.registry().get("Small Room").unwrap().clone();

        let entrance = graph.create_node([0.0, 0.0], &entrance_type).unwrap();
        let corridor = graph.create_node([200.0, 0.0], &corridor_type).unwrap();
        let room = graph.create_node([400.0, 0.0], &room_type).unwrap();
        graph.try_connect(entrance, corridor).unwrap();
        graph.try_connect(corridor, room).unwrap();
        graph
    }

    #[test]
    fn test_document_round_trip_rebuilds_index() {
        let graph = sample_graph();
        let ron_str = graph.to_document().to_ron().unwrap();
        let document = RoomNodeGraphDocument::from_ron(&ron_str).unwrap();
        let loaded = RoomNodeGraph::from_document(
            document,
            Arc::clone(graph.registry()),
            GraphSettings::default(),
        )
        .unwrap();

        assert_eq!(loaded.name, "Level 1");
        let ids: Vec<_> = loaded.node_ids().collect();
        let expected: Vec<_> = graph.node_ids().collect();
        assert_eq!(ids, expected);
        for node in graph.nodes() {
            assert_eq!(loaded.node(node.id), Some(node));
        }
        assert!(loaded.validate().is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let graph = sample_graph();
        let mut document = graph.to_document();
        let copy = document.nodes[1].clone();
        document.nodes.push(copy);

        let result = RoomNodeGraph::from_document(
            document,
            Arc::clone(graph.registry()),
            GraphSettings::default(),
        );
        assert!(matches!(result, Err(DocumentError::DuplicateNodeId(_))));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let graph = sample_graph();
        let mut document = graph.to_document();
        document.nodes[2].room_type = "Throne Room".to_string();

        let result = RoomNodeGraph::from_document(
            document,
            Arc::clone(graph.registry()),
            GraphSettings::default(),
        );
        assert!(matches!(
            result,
            Err(DocumentError::UnknownRoomType { ref name, .. }) if name == "Throne Room"
        ));
    }

    #[test]
    fn test_newer_version_rejected() {
        let graph = sample_graph();
        let mut document = graph.to_document();
        document.version = DOCUMENT_FORMAT_VERSION + 1;

        let result = RoomNodeGraph::from_document(
            document,
            Arc::clone(graph.registry()),
            GraphSettings::default(),
        );
        assert!(matches!(result, Err(DocumentError::UnsupportedVersion(_))));
    }

    #[test]
    fn test_dangling_ids_survive_load() {
        let graph = sample_graph();
        let mut document = graph.to_document();
        let ghost = RoomNodeId::new();
        document.nodes[2].child_ids.push(ghost);

        let loaded = RoomNodeGraph::from_document(
            document,
            Arc::clone(graph.registry()),
            GraphSettings::default(),
        )
        .unwrap();
        let room = loaded.nodes().nth(2).unwrap();
        assert!(room.child_ids().contains(&ghost));
        assert_eq!(loaded.children_of(room.id).count(), 0);
        assert!(!loaded.validate().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let graph = sample_graph();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("level.{DOCUMENT_EXTENSION}"));

        graph.save(&path).unwrap();
        let loaded =
            RoomNodeGraph::load(&path, Arc::clone(graph.registry()), GraphSettings::default())
                .unwrap();
        assert_eq!(loaded.to_document(), graph.to_document());
    }

    #[test]
    fn test_json_export() {
        let graph = sample_graph();
        let json = graph.to_document().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["nodes"][0]["room_type"], "Entrance");
        let entrance_id = graph.entrance().unwrap().id.to_string();
        assert_eq!(value["nodes"][1]["parent_ids"][0], entrance_id.as_str());
    }
}
