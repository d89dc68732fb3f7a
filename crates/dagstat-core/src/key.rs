//! Content keys addressing blocks in the store.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use cid::Cid;
use multihash_codetable::{Code, MultihashDigest};
use serde::{Serialize, Serializer};

/// Immutable identifier of a block, derived from its content.
///
/// Wraps a CID. Graph-node links carry the CID byte encoding, and the
/// textual form is the standard CID string (base58btc for v0 keys).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey(Cid);

impl ContentKey {
    /// Wrap an existing CID.
    pub fn new(cid: Cid) -> Self {
        Self(cid)
    }

    /// Parse a key from its binary CID encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, cid::Error> {
        Cid::try_from(bytes).map(Self)
    }

    /// Compute the CIDv0 (sha2-256) key of a block payload.
    pub fn for_block(data: &[u8]) -> Self {
        let hash = Code::Sha2_256.digest(data);
        // A 32-byte sha2-256 digest is always a valid v0 multihash.
        match Cid::new_v0(hash) {
            Ok(cid) => Self(cid),
            Err(_) => Self(Cid::new_v1(DAG_PB_CODEC, hash)),
        }
    }

    /// Binary CID encoding of this key.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    /// The wrapped CID.
    pub fn cid(&self) -> &Cid {
        &self.0
    }
}

/// Multicodec code for protobuf merkle-dag nodes.
const DAG_PB_CODEC: u64 = 0x70;

impl Ord for ContentKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_bytes().cmp(&other.to_bytes())
    }
}

impl PartialOrd for ContentKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey({})", self.0)
    }
}

impl FromStr for ContentKey {
    type Err = cid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cid::from_str(s).map(Self)
    }
}

impl From<Cid> for ContentKey {
    fn from(cid: Cid) -> Self {
        Self(cid)
    }
}

impl Serialize for ContentKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}
