//! Protobuf codecs for merkle-graph nodes and file-system nodes.
//!
//! `decode_dag_node` understands the generic `PBNode` envelope (links plus an
//! opaque payload); `decode_fs_node` interprets that payload as a
//! file-system `Data` message.

use compact_str::CompactString;
use prost::Message;
use thiserror::Error;

use dagstat_core::{ContentKey, DagNode, FsNode, Link, NodeType};

#[derive(Clone, PartialEq, Message)]
struct PbLink {
    #[prost(bytes = "vec", optional, tag = "1")]
    hash: Option<Vec<u8>>,
    #[prost(string, optional, tag = "2")]
    name: Option<String>,
    #[prost(uint64, optional, tag = "3")]
    tsize: Option<u64>,
}

#[derive(Clone, PartialEq, Message)]
struct PbNode {
    #[prost(message, repeated, tag = "2")]
    links: Vec<PbLink>,
    #[prost(bytes = "vec", optional, tag = "1")]
    data: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
struct PbData {
    // Kept as a raw integer so unknown type values surface as errors
    // instead of being folded into a default.
    #[prost(int32, optional, tag = "1")]
    data_type: Option<i32>,
    #[prost(bytes = "vec", optional, tag = "2")]
    data: Option<Vec<u8>>,
    #[prost(uint64, optional, tag = "3")]
    filesize: Option<u64>,
    #[prost(uint64, repeated, packed = "false", tag = "4")]
    blocksizes: Vec<u64>,
    #[prost(uint64, optional, tag = "5")]
    hash_type: Option<u64>,
    #[prost(uint64, optional, tag = "6")]
    fanout: Option<u64>,
}

/// Failure to decode a generic graph node.
#[derive(Debug, Error)]
pub enum DagDecodeError {
    /// Bytes are not a `PBNode` message.
    #[error("protobuf: {0}")]
    Protobuf(#[from] prost::DecodeError),

    /// A link carries no target hash.
    #[error("link {index} has no hash")]
    MissingLinkHash { index: usize },

    /// A link target is not a valid content key.
    #[error("link {index} has an invalid hash: {source}")]
    InvalidLinkHash {
        index: usize,
        #[source]
        source: cid::Error,
    },
}

/// Failure to decode a file-system node from a graph node payload.
#[derive(Debug, Error)]
pub enum FsDecodeError {
    /// Payload is not a `Data` message.
    #[error("protobuf: {0}")]
    Schema(#[from] prost::DecodeError),

    /// Payload parsed but the required type field is absent.
    #[error("protobuf: required field Type not set")]
    MissingType,

    /// Type field holds a value outside the known enumeration.
    #[error("unknown data type {0}")]
    UnknownType(i32),
}

impl FsDecodeError {
    /// Whether the payload simply is not a file-system node.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, FsDecodeError::Schema(_) | FsDecodeError::MissingType)
    }
}

/// Decode raw block bytes as a generic graph node.
pub fn decode_dag_node(bytes: &[u8]) -> Result<DagNode, DagDecodeError> {
    let pb = PbNode::decode(bytes)?;

    let links = pb
        .links
        .into_iter()
        .enumerate()
        .map(|(index, link)| -> Result<Link, DagDecodeError> {
            let hash = link
                .hash
                .ok_or(DagDecodeError::MissingLinkHash { index })?;
            let target = ContentKey::from_bytes(&hash)
                .map_err(|source| DagDecodeError::InvalidLinkHash { index, source })?;
            Ok(Link {
                name: link.name.map(CompactString::from).unwrap_or_default(),
                target,
                size: link.tsize.unwrap_or(0),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DagNode {
        links,
        data: pb.data.unwrap_or_default(),
    })
}

/// Decode a graph node payload as a file-system node.
pub fn decode_fs_node(payload: &[u8]) -> Result<FsNode, FsDecodeError> {
    let pb = PbData::decode(payload)?;
    let code = pb.data_type.ok_or(FsDecodeError::MissingType)?;
    let node_type = NodeType::from_code(code).ok_or(FsDecodeError::UnknownType(code))?;

    Ok(FsNode {
        node_type,
        data: pb.data.unwrap_or_default(),
        file_size: pb.filesize,
        block_sizes: pb.blocksizes,
        hash_type: pb.hash_type,
        fanout: pb.fanout,
    })
}

/// Encode a generic graph node.
pub fn encode_dag_node(node: &DagNode) -> Vec<u8> {
    let pb = PbNode {
        links: node
            .links
            .iter()
            .map(|link| PbLink {
                hash: Some(link.target.to_bytes()),
                name: Some(link.name.to_string()),
                tsize: Some(link.size),
            })
            .collect(),
        data: Some(node.data.clone()),
    };
    pb.encode_to_vec()
}

/// Encode a file-system node payload.
pub fn encode_fs_node(node: &FsNode) -> Vec<u8> {
    let pb = PbData {
        data_type: Some(node.node_type.code()),
        data: (!node.data.is_empty()).then(|| node.data.clone()),
        filesize: node.file_size,
        blocksizes: node.block_sizes.clone(),
        hash_type: node.hash_type,
        fanout: node.fanout,
    };
    pb.encode_to_vec()
}

/// Encode a complete block: a file-system node wrapped in a graph node.
pub fn encode_block(node: &FsNode, links: Vec<Link>) -> Vec<u8> {
    encode_dag_node(&DagNode::new(links, encode_fs_node(node)))
}
