// SPDX-License-Identifier: MIT OR Apache-2.0
//! Room node graph model for the dungeon layout editor.
//!
//! A room node graph describes the topology of a procedurally assembled
//! dungeon: one entrance, rooms joined through corridors, and at most one
//! connected boss room. This crate owns the data model and every rule that
//! decides whether an edit is allowed; drawing and input handling live in
//! the editor that calls into it.
//!
//! ## Architecture
//!
//! - [`RoomNodeTypeRegistry`] catalogs the room types and their capability
//!   flags. It is shared read-only through an `Arc`.
//! - [`RoomNodeGraph`] owns the nodes, keeps the id index in step with them,
//!   and performs validated connects, symmetric disconnects, staged
//!   deletions and type changes.
//! - [`RoomNodeGraphDocument`] is the flat on-disk form, stored as RON.

pub mod connection;
pub mod document;
pub mod graph;
pub mod node;
pub mod room_type;
pub mod settings;
pub mod validation;

pub use connection::{Connection, ConnectionRejected};
pub use document::{DocumentError, RoomNodeGraphDocument, RoomNodeRecord};
pub use graph::{CreateNodeError, RoomNodeGraph, TypeChangeRejected};
pub use node::{RoomNode, RoomNodeId};
pub use room_type::{RoomNodeType, RoomNodeTypeRegistry};
pub use settings::{GraphSettings, SettingsError};
pub use validation::GraphViolation;
