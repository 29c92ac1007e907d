//! Node definitions exposed to the graph host.
//!
//! The host discovers nodes through [`NodeRegistry::builtin`]. Each
//! descriptor maps a stable id to one of the node structs:
//! - **load**: [`LoadImagesNode`] over path or upload slots
//! - **save**: [`SaveImagesNode`], with or without a manifest

pub mod load;
pub mod save;

pub use load::{DirectorySlots, DirectorySource, LoadImagesNode, LoadInputs, MAX_PATH_COUNT};
pub use save::{SaveImagesNode, SaveInputs, DEFAULT_PREFIX};

use serde::Serialize;
use std::sync::OnceLock;

/// Menu category shared by every node.
pub const CATEGORY: &str = "image/multi-path";

/// Which node struct a descriptor stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    LoadUpload,
    LoadPath,
    Save,
    SaveSimple,
}

/// Static description of one registered node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    /// Writes to disk rather than producing values for downstream nodes
    pub output_node: bool,
    pub kind: NodeKind,
}

/// Registered nodes in registration order.
#[derive(Debug)]
pub struct NodeRegistry {
    nodes: Vec<NodeDescriptor>,
}

impl NodeRegistry {
    /// The built-in registry, constructed on first use.
    pub fn builtin() -> &'static NodeRegistry {
        static REGISTRY: OnceLock<NodeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| NodeRegistry {
            nodes: vec![
                NodeDescriptor {
                    id: "LoadImagesMultiPath_Upload",
                    display_name: "Load Images Multi-Path (Upload)",
                    category: CATEGORY,
                    description: "Load image folders from the upload area as one batch",
                    output_node: false,
                    kind: NodeKind::LoadUpload,
                },
                NodeDescriptor {
                    id: "LoadImagesMultiPath_Path",
                    display_name: "Load Images Multi-Path (Path)",
                    category: CATEGORY,
                    description: "Load image folders by path as one batch",
                    output_node: false,
                    kind: NodeKind::LoadPath,
                },
                NodeDescriptor {
                    id: "SaveImagesMultiPath",
                    display_name: "Save Images Multi-Path",
                    category: CATEGORY,
                    description: "Save a batch split back into its source folders",
                    output_node: true,
                    kind: NodeKind::Save,
                },
                NodeDescriptor {
                    id: "SaveImagesMultiPath_Simple",
                    display_name: "Save Images/Video (Simple)",
                    category: CATEGORY,
                    description: "Save a batch as one image sequence or video",
                    output_node: true,
                    kind: NodeKind::SaveSimple,
                },
            ],
        })
    }

    pub fn get(&self, id: &str) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
