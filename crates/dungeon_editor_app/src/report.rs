// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plain-text rendering of graphs, room types and audit results.

use dungeon_editor_graph::{
    GraphViolation, RoomNode, RoomNodeGraph, RoomNodeId, RoomNodeTypeRegistry,
};
use std::fmt::Write;

/// Length of the id prefix shown in listings
const SHORT_ID_LEN: usize = 8;

fn short_id(id: RoomNodeId) -> String {
    let mut text = id.to_string();
    text.truncate(SHORT_ID_LEN);
    text
}

fn id_list<'a>(ids: impl Iterator<Item = &'a RoomNodeId>) -> String {
    let ids: Vec<_> = ids.map(|id| short_id(*id)).collect();
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.join(", ")
    }
}

fn node_line(node: &RoomNode) -> String {
    format!(
        "  {}  {:<12} ({:>6.1}, {:>6.1})  parents: {:<10} children: {}",
        short_id(node.id),
        node.room_type().name,
        node.position[0],
        node.position[1],
        id_list(node.parent_ids().iter()),
        id_list(node.child_ids().iter()),
    )
}

/// Render every node of a graph, one per line, in creation order
pub fn graph(graph: &RoomNodeGraph) -> String {
    let mut out = format!(
        "Graph '{}' ({} nodes, {} connections)\n",
        graph.name,
        graph.node_count(),
        graph.connection_count()
    );
    for node in graph.nodes() {
        let _ = writeln!(out, "{}", node_line(node));
    }
    out
}

/// Render the registry with each type's capability flags
pub fn room_types(registry: &RoomNodeTypeRegistry, include_hidden: bool) -> String {
    let mut out = String::new();
    for room_type in registry.types() {
        if !room_type.display_in_editor && !include_hidden {
            continue;
        }

        let flags: Vec<&str> = [
            (room_type.is_entrance, "entrance"),
            (room_type.is_corridor, "corridor"),
            (room_type.is_corridor_ns, "ns"),
            (room_type.is_corridor_ew, "ew"),
            (room_type.is_boss_room, "boss"),
            (room_type.is_none, "none"),
            (!room_type.display_in_editor, "hidden"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect();

        let _ = writeln!(out, "{:<12} {}", room_type.name, flags.join(" "));
    }
    out
}

/// Render audit findings, one per line
pub fn violations(violations: &[GraphViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
