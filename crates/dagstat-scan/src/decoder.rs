//! Two-stage block classification.

use dagstat_core::{DecodeFailure, DecodeOutcome};

use crate::codec::{decode_dag_node, decode_fs_node};

/// Classify one raw block.
///
/// The generic graph-node decode runs first; the file-system decode only
/// runs on its payload when that succeeds. Failures are returned as a
/// classification, never as an error.
pub fn decode_block(bytes: &[u8]) -> DecodeOutcome {
    let dag = match decode_dag_node(bytes) {
        Ok(dag) => dag,
        Err(err) => {
            tracing::trace!(error = %err, "block is not a graph node");
            return DecodeOutcome::Failed(DecodeFailure::NotGraphNode);
        }
    };

    match decode_fs_node(&dag.data) {
        Ok(node) => DecodeOutcome::Typed {
            node,
            links: dag.links,
        },
        Err(err) if err.is_schema_mismatch() => {
            tracing::trace!(error = %err, "graph node is not a file-system node");
            DecodeOutcome::Failed(DecodeFailure::NotFilesystemNode)
        }
        Err(err) => DecodeOutcome::Failed(DecodeFailure::Other(err.to_string())),
    }
}
