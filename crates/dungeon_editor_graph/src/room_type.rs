// SPDX-License-Identifier: MIT OR Apache-2.0
//! Room node types and the registry that catalogs them.
//!
//! A room node type is a named tag carrying capability flags. The graph only
//! ever reads these flags; the registry is built once per editing session and
//! shared read-only between graphs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the built-in unassigned type
pub const NONE_TYPE_NAME: &str = "None";

/// Name of the built-in entrance type
pub const ENTRANCE_TYPE_NAME: &str = "Entrance";

/// Name of the built-in corridor type
pub const CORRIDOR_TYPE_NAME: &str = "Corridor";

/// Name of the built-in boss room type
pub const BOSS_ROOM_TYPE_NAME: &str = "Boss Room";

/// A room type tag with its structural capability flags
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomNodeType {
    /// Unique type name
    pub name: String,
    /// Whether this is the dungeon entrance
    #[serde(default)]
    pub is_entrance: bool,
    /// Whether this is a corridor (connector) type
    #[serde(default)]
    pub is_corridor: bool,
    /// North-south corridor, resolved from a plain corridor at dungeon build time
    #[serde(default)]
    pub is_corridor_ns: bool,
    /// East-west corridor, resolved from a plain corridor at dungeon build time
    #[serde(default)]
    pub is_corridor_ew: bool,
    /// Whether this is the boss room
    #[serde(default)]
    pub is_boss_room: bool,
    /// Whether this is the unassigned placeholder type
    #[serde(default)]
    pub is_none: bool,
    /// Whether the editor offers this type in its type selector
    #[serde(default = "default_display")]
    pub display_in_editor: bool,
}

fn default_display() -> bool {
    true
}

impl RoomNodeType {
    /// Create a plain room type with no capability flags set
    pub fn room(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_entrance: false,
            is_corridor: false,
            is_corridor_ns: false,
            is_corridor_ew: false,
            is_boss_room: false,
            is_none: false,
            display_in_editor: true,
        }
    }

    /// Create an entrance type
    pub fn entrance(name: impl Into<String>) -> Self {
        Self {
            is_entrance: true,
            ..Self::room(name)
        }
    }

    /// Create a corridor type
    pub fn corridor(name: impl Into<String>) -> Self {
        Self {
            is_corridor: true,
            ..Self::room(name)
        }
    }

    /// Create a boss room type
    pub fn boss_room(name: impl Into<String>) -> Self {
        Self {
            is_boss_room: true,
            ..Self::room(name)
        }
    }

    /// Create the unassigned placeholder type
    pub fn none(name: impl Into<String>) -> Self {
        Self {
            is_none: true,
            ..Self::room(name)
        }
    }

    /// Hide this type from the editor's type selector
    pub fn hidden(mut self) -> Self {
        self.display_in_editor = false;
        self
    }

    /// Whether the corridor flag differs between two types
    pub fn corridor_flips(&self, other: &RoomNodeType) -> bool {
        self.is_corridor != other.is_corridor
    }
}

/// Ordered catalog of room node types, keyed by name.
///
/// Stored as a plain list of types; the name index is rebuilt through
/// [`RoomNodeTypeRegistry::register`] on load, so a key can never disagree
/// with the type it maps to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<RoomNodeType>", into = "Vec<RoomNodeType>")]
pub struct RoomNodeTypeRegistry {
    types: IndexMap<String, RoomNodeType>,
}

impl RoomNodeTypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Build the standard dungeon catalog
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(RoomNodeType::room("Small Room"));
        registry.register(RoomNodeType::room("Medium Room"));
        registry.register(RoomNodeType::room("Large Room"));
        registry.register(RoomNodeType::corridor(CORRIDOR_TYPE_NAME));

        // Directional corridors are picked by the dungeon builder, never by hand
        registry.register(RoomNodeType {
            is_corridor_ns: true,
            ..RoomNodeType::corridor("CorridorNS").hidden()
        });
        registry.register(RoomNodeType {
            is_corridor_ew: true,
            ..RoomNodeType::corridor("CorridorEW").hidden()
        });

        registry.register(RoomNodeType::entrance(ENTRANCE_TYPE_NAME));
        registry.register(RoomNodeType::boss_room(BOSS_ROOM_TYPE_NAME));
        registry.register(RoomNodeType::none(NONE_TYPE_NAME).hidden());

        registry
    }

    /// Register a room type, replacing any type of the same name in place
    pub fn register(&mut self, room_type: RoomNodeType) {
        self.types.insert(room_type.name.clone(), room_type);
    }

    /// Get a room type by name
    pub fn get(&self, name: &str) -> Option<&RoomNodeType> {
        self.types.get(name)
    }

    /// All registered types in registry order
    pub fn types(&self) -> impl Iterator<Item = &RoomNodeType> {
        self.types.values()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// First type in registry order matching the predicate
    pub fn find(&self, predicate: impl Fn(&RoomNodeType) -> bool) -> Option<&RoomNodeType> {
        self.types.values().find(|&t| predicate(t))
    }

    /// The unassigned placeholder type
    pub fn none_type(&self) -> Option<&RoomNodeType> {
        self.find(|t| t.is_none)
    }

    /// The entrance type
    pub fn entrance_type(&self) -> Option<&RoomNodeType> {
        self.find(|t| t.is_entrance)
    }

    /// The plain (non-directional) corridor type
    pub fn corridor_type(&self) -> Option<&RoomNodeType> {
        self.find(|t| t.is_corridor && !t.is_corridor_ns && !t.is_corridor_ew)
    }

    /// Names the editor offers in its type selector, in registry order
    pub fn displayable_names(&self) -> Vec<&str> {
        self.types
            .values()
            .filter(|t| t.display_in_editor)
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Load a registry from a RON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let registry = Self::from_ron(&contents).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        tracing::info!("Loaded {} room types from {:?}", registry.len(), path);
        Ok(registry)
    }

    /// Save the registry to a RON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let ron_str = self.to_ron().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, ron_str)
    }
}

impl From<Vec<RoomNodeType>> for RoomNodeTypeRegistry {
    fn from(types: Vec<RoomNodeType>) -> Self {
        let mut registry = Self::new();
        for room_type in types {
            registry.register(room_type);
        }
        registry
    }
}

impl From<RoomNodeTypeRegistry> for Vec<RoomNodeType> {
    fn from(registry: RoomNodeTypeRegistry) -> Self {
        registry.types.into_values().collect()
    }
}
