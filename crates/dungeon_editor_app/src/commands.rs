// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph editing commands.
//!
//! Each command loads a graph document, applies one edit through the graph
//! model and writes the document back. Rejected edits leave the file as it
//! was.

use crate::report;
use clap::Subcommand;
use dungeon_editor_graph::settings::SETTINGS_FILE_NAME;
use dungeon_editor_graph::{
    ConnectionRejected, CreateNodeError, DocumentError, GraphSettings, RoomNodeGraph, RoomNodeId,
    RoomNodeType, RoomNodeTypeRegistry, SettingsError, TypeChangeRejected,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Room type catalog file name
pub const TYPES_FILE_NAME: &str = "room_types.ron";

/// Shortest id prefix accepted on the command line
const MIN_ID_PREFIX: usize = 4;

/// A single editing command
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a new graph document holding only the entrance
    New {
        /// Graph document to create
        file: PathBuf,
        /// Graph name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Add a room node
    Add {
        /// Graph document
        file: PathBuf,
        /// Room type name
        #[arg(long = "type", default_value = "None")]
        type_name: String,
        /// Editor x position
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f32,
        /// Editor y position
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f32,
    },

    /// Connect a child node under a parent node
    Connect {
        /// Graph document
        file: PathBuf,
        /// Parent node id (or unique prefix)
        parent: String,
        /// Child node id (or unique prefix)
        child: String,
    },

    /// Remove the edge between a parent and a child
    Disconnect {
        /// Graph document
        file: PathBuf,
        /// Parent node id (or unique prefix)
        parent: String,
        /// Child node id (or unique prefix)
        child: String,
    },

    /// Delete nodes and every edge touching them
    Delete {
        /// Graph document
        file: PathBuf,
        /// Node ids (or unique prefixes)
        #[arg(required = true)]
        nodes: Vec<String>,
    },

    /// Change the room type of an unconnected node
    SetType {
        /// Graph document
        file: PathBuf,
        /// Node id (or unique prefix)
        node: String,
        /// New room type name
        type_name: String,
    },

    /// Move a node in the editor canvas
    Move {
        /// Graph document
        file: PathBuf,
        /// Node id (or unique prefix)
        node: String,
        /// Horizontal offset
        #[arg(allow_negative_numbers = true)]
        dx: f32,
        /// Vertical offset
        #[arg(allow_negative_numbers = true)]
        dy: f32,
    },

    /// Audit a graph document
    Validate {
        /// Graph document
        file: PathBuf,
    },

    /// Print the nodes and edges of a graph document
    Show {
        /// Graph document
        file: PathBuf,
    },

    /// List the room types
    Types {
        /// Include types hidden from the editor
        #[arg(long)]
        all: bool,
    },

    /// Export a graph document as JSON
    ExportJson {
        /// Graph document
        file: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write default settings and room type files into a directory
    InitConfig {
        /// Target directory
        dir: PathBuf,
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

/// Error type for command execution
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings error
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Document error
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Node creation refused
    #[error("Cannot create node: {0}")]
    CreateNode(#[from] CreateNodeError),

    /// Connection refused
    #[error("Cannot connect: {0}")]
    Connection(#[from] ConnectionRejected),

    /// Type change refused
    #[error("Cannot change type: {0}")]
    TypeChange(#[from] TypeChangeRejected),

    /// Room type not in the registry
    #[error("Unknown room type: {0}")]
    UnknownType(String),

    /// No node matches the given id
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Several nodes match the given id prefix
    #[error("Ambiguous node id '{0}', matches {1} nodes")]
    AmbiguousNode(String, usize),

    /// File would be overwritten
    #[error("{0:?} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    /// Validation found problems
    #[error("{count} problem(s) found\n{report}")]
    InvalidGraph {
        /// Number of violations
        count: usize,
        /// Rendered violation list
        report: String,
    },
}

/// Registry and settings shared by every command of one invocation
pub struct Session {
    registry: Arc<RoomNodeTypeRegistry>,
    settings: GraphSettings,
}

impl Session {
    /// Create a session from an explicit registry and settings
    pub fn new(registry: RoomNodeTypeRegistry, settings: GraphSettings) -> Self {
        Self {
            registry: Arc::new(registry),
            settings,
        }
    }

    /// Load settings and room types, falling back to built-in defaults
    pub fn open(
        settings_path: Option<&Path>,
        types_path: Option<&Path>,
    ) -> Result<Self, CommandError> {
        let settings = match settings_path {
            Some(path) => GraphSettings::load(path)?,
            None => GraphSettings::load_or_default(Path::new(SETTINGS_FILE_NAME))?,
        };
        let registry = match types_path {
            Some(path) => RoomNodeTypeRegistry::load(path)?,
            None => RoomNodeTypeRegistry::with_defaults(),
        };
        Ok(Self::new(registry, settings))
    }

    fn load_graph(&self, path: &Path) -> Result<RoomNodeGraph, CommandError> {
        Ok(RoomNodeGraph::load(
            path,
            Arc::clone(&self.registry),
            self.settings.clone(),
        )?)
    }

    fn room_type(&self, name: &str) -> Result<RoomNodeType, CommandError> {
        self.registry
            .get(name)
            .cloned()
            .ok_or_else(|| CommandError::UnknownType(name.to_string()))
    }

    /// Run a command and return the text to print
    pub fn execute(&self, command: Command) -> Result<String, CommandError> {
        match command {
            Command::New { file, name, force } => {
                if file.exists() && !force {
                    return Err(CommandError::AlreadyExists(file));
                }
                let name = name.unwrap_or_else(|| {
                    file.file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "Untitled".to_string())
                });
                let mut graph =
                    RoomNodeGraph::new(name, Arc::clone(&self.registry), self.settings.clone());
                let entrance_type = self
                    .registry
                    .entrance_type()
                    .cloned()
                    .ok_or(CreateNodeError::NoEntranceType)?;
                let entrance = graph.create_node([0.0, 0.0], &entrance_type)?;
                graph.save(&file)?;
                Ok(format!("Created graph '{}' with entrance {}", graph.name, entrance))
            }

            Command::Add { file, type_name, x, y } => {
                let mut graph = self.load_graph(&file)?;
                let room_type = self.room_type(&type_name)?;
                let id = graph.create_node([x, y], &room_type)?;
                graph.save(&file)?;
                let created = graph.node(id).map_or(type_name, |n| n.room_type().name.clone());
                Ok(format!("Added {created} node {id}"))
            }

            Command::Connect { file, parent, child } => {
                let mut graph = self.load_graph(&file)?;
                let parent = resolve_node(&graph, &parent)?;
                let child = resolve_node(&graph, &child)?;
                graph.try_connect(parent, child)?;
                graph.save(&file)?;
                Ok(format!("Connected {parent} -> {child}"))
            }

            Command::Disconnect { file, parent, child } => {
                let mut graph = self.load_graph(&file)?;
                let parent = resolve_node(&graph, &parent)?;
                let child = resolve_node(&graph, &child)?;
                if graph.disconnect(parent, child) {
                    graph.save(&file)?;
                    Ok(format!("Disconnected {parent} -> {child}"))
                } else {
                    Ok(format!("No edge {parent} -> {child}"))
                }
            }

            Command::Delete { file, nodes } => {
                let mut graph = self.load_graph(&file)?;
                let ids = nodes
                    .iter()
                    .map(|text| resolve_node(&graph, text))
                    .collect::<Result<Vec<_>, _>>()?;
                let removed = graph.delete_nodes(&ids);
                if !removed.is_empty() {
                    graph.save(&file)?;
                }
                let mut output = format!("Deleted {} node(s)", removed.len());
                if graph.entrance().is_some_and(|e| ids.contains(&e.id)) {
                    output.push_str(", kept the entrance");
                }
                Ok(output)
            }

            Command::SetType { file, node, type_name } => {
                let mut graph = self.load_graph(&file)?;
                let node = resolve_node(&graph, &node)?;
                let room_type = self.room_type(&type_name)?;
                graph.change_node_type(node, &room_type)?;
                graph.save(&file)?;
                Ok(format!("Node {node} is now {type_name}"))
            }

            Command::Move { file, node, dx, dy } => {
                let mut graph = self.load_graph(&file)?;
                let node = resolve_node(&graph, &node)?;
                graph.move_node(node, [dx, dy]);
                graph.save(&file)?;
                let position = graph.node(node).map_or([0.0, 0.0], |n| n.position);
                Ok(format!("Node {node} at ({}, {})", position[0], position[1]))
            }

            Command::Validate { file } => {
                let graph = self.load_graph(&file)?;
                let violations = graph.validate();
                if violations.is_empty() {
                    return Ok(format!("Graph '{}' is valid", graph.name));
                }
                for violation in &violations {
                    tracing::warn!("{}", violation);
                }
                Err(CommandError::InvalidGraph {
                    count: violations.len(),
                    report: report::violations(&violations),
                })
            }

            Command::Show { file } => {
                let graph = self.load_graph(&file)?;
                Ok(report::graph(&graph))
            }

            Command::Types { all } => Ok(report::room_types(&self.registry, all)),

            Command::ExportJson { file, output } => {
                let graph = self.load_graph(&file)?;
                let json = graph.to_document().to_json().map_err(DocumentError::from)?;
                match output {
                    Some(path) => {
                        std::fs::write(&path, json)?;
                        tracing::info!("Exported '{}' to {:?}", graph.name, path);
                        Ok(format!("Exported {} node(s) to {}", graph.node_count(), path.display()))
                    }
                    None => Ok(json),
                }
            }

            Command::InitConfig { dir, force } => {
                std::fs::create_dir_all(&dir)?;
                let settings_path = dir.join(SETTINGS_FILE_NAME);
                let types_path = dir.join(TYPES_FILE_NAME);
                for path in [&settings_path, &types_path] {
                    if path.exists() && !force {
                        return Err(CommandError::AlreadyExists(path.clone()));
                    }
                }
                GraphSettings::default().save(&settings_path)?;
                RoomNodeTypeRegistry::with_defaults().save(&types_path)?;
                Ok(format!(
                    "Wrote {} and {}",
                    settings_path.display(),
                    types_path.display()
                ))
            }
        }
    }
}

/// Resolve a full node id or a unique prefix of one
pub fn resolve_node(graph: &RoomNodeGraph, text: &str) -> Result<RoomNodeId, CommandError> {
    if let Ok(id) = text.parse::<RoomNodeId>() {
        return if graph.contains(id) {
            Ok(id)
        } else {
            Err(CommandError::NodeNotFound(text.to_string()))
        };
    }

    if text.len() < MIN_ID_PREFIX {
        return Err(CommandError::NodeNotFound(text.to_string()));
    }

    let prefix = text.to_ascii_lowercase();
    let matches: Vec<_> = graph
        .node_ids()
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CommandError::NodeNotFound(text.to_string())),
        _ => Err(CommandError::AmbiguousNode(text.to_string(), matches.len())),
    }
}
