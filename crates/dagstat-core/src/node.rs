//! Decoded node models.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::key::ContentKey;

/// Named outgoing link of a merkle-graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Entry name (empty for unnamed links).
    pub name: CompactString,
    /// Key of the linked block.
    pub target: ContentKey,
    /// Cumulative size hint of the linked subgraph.
    pub size: u64,
}

impl Link {
    /// Create a new link.
    pub fn new(name: impl Into<CompactString>, target: ContentKey, size: u64) -> Self {
        Self {
            name: name.into(),
            target,
            size,
        }
    }

    /// Directory entry key of this link.
    pub fn entry_key(&self) -> DirEntryKey {
        DirEntryKey {
            name: self.name.clone(),
            target: self.target,
        }
    }
}

/// Generic merkle-graph node: ordered links plus an opaque payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DagNode {
    pub links: Vec<Link>,
    pub data: Vec<u8>,
}

impl DagNode {
    pub fn new(links: Vec<Link>, data: Vec<u8>) -> Self {
        Self { links, data }
    }
}

/// Type tag of a file-system node.
///
/// The display form is the key used by the type histogram.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum NodeType {
    Raw,
    Directory,
    File,
    Metadata,
    Symlink,
    #[strum(serialize = "HAMTShard")]
    HamtShard,
}

impl NodeType {
    /// Protobuf wire value of this type.
    pub fn code(self) -> i32 {
        match self {
            NodeType::Raw => 0,
            NodeType::Directory => 1,
            NodeType::File => 2,
            NodeType::Metadata => 3,
            NodeType::Symlink => 4,
            NodeType::HamtShard => 5,
        }
    }

    /// Map a protobuf wire value back to a type.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(NodeType::Raw),
            1 => Some(NodeType::Directory),
            2 => Some(NodeType::File),
            3 => Some(NodeType::Metadata),
            4 => Some(NodeType::Symlink),
            5 => Some(NodeType::HamtShard),
            _ => None,
        }
    }

    /// Check if this is a plain directory.
    pub fn is_dir(self) -> bool {
        self == NodeType::Directory
    }
}

/// File-system view of a graph node's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsNode {
    pub node_type: NodeType,
    /// Inline file or symlink content.
    pub data: Vec<u8>,
    pub file_size: Option<u64>,
    pub block_sizes: Vec<u64>,
    pub hash_type: Option<u64>,
    pub fanout: Option<u64>,
}

impl FsNode {
    /// Create a node of the given type with no type-specific fields.
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            data: Vec::new(),
            file_size: None,
            block_sizes: Vec::new(),
            hash_type: None,
            fanout: None,
        }
    }

    /// Create an empty directory node.
    pub fn directory() -> Self {
        Self::new(NodeType::Directory)
    }

    /// Create a single-block file node carrying `data` inline.
    pub fn file(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        Self {
            file_size: Some(data.len() as u64),
            data,
            ..Self::new(NodeType::File)
        }
    }
}

/// Deduplication key of a directory entry: `(name, target)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirEntryKey {
    pub name: CompactString,
    pub target: ContentKey,
}

impl DirEntryKey {
    pub fn new(name: impl Into<CompactString>, target: ContentKey) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

/// A directory entry with the number of times it occurs across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: CompactString,
    pub target: ContentKey,
    pub count: u64,
}
