//! Sync service message types.
//!
//! Peers read the chain and propose extensions with these messages. Change
//! sets travel in their canonical byte form so the receiving side decodes
//! them through its own registry.

use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use ows_ledger_core::ChangeSetHash;

/// Message size limits.
pub mod limits {
    /// Max change sets in one `ChangeSets` response.
    pub const MAX_CHANGE_SETS_PER_MESSAGE: usize = 50;
}

/// Requests a peer may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncRequest {
    /// Current head and chain length.
    Head,

    /// The full hash chain, genesis first.
    Hashes,

    /// One change set by hash.
    GetChangeSet { hash: ChangeSetHash },

    /// Change sets recorded after a known hash, oldest first.
    ChangeSetsAfter { hash: ChangeSetHash },

    /// Propose a change set extending the current head.
    Propose {
        #[serde(with = "serde_bytes")]
        change_set: Vec<u8>,
    },
}

/// Responses to a [`SyncRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncResponse {
    Head { head: ChangeSetHash, length: u64 },

    Hashes { hashes: Vec<ChangeSetHash> },

    ChangeSet {
        #[serde(with = "serde_bytes")]
        change_set: Vec<u8>,
    },

    /// Up to [`limits::MAX_CHANGE_SETS_PER_MESSAGE`] change sets. `more` is
    /// set when the peer should ask again from the last one returned.
    ChangeSets { change_sets: Vec<ByteBuf>, more: bool },

    /// The requested hash is not part of this chain.
    NotFound { hash: ChangeSetHash },

    /// The proposal was appended; this is the new head.
    Accepted { head: ChangeSetHash },

    /// The proposal was refused. The ledger is unchanged.
    Rejected { code: RejectCode, message: String },
}

/// Why a proposal was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum RejectCode {
    /// The change set does not extend the chain validly.
    Invalid = 1,
    /// The bytes do not decode to a change set.
    Malformed = 2,
    /// Local failure, such as storage.
    Internal = 3,
}

impl SyncRequest {
    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).expect("CBOR serialization failed");
        buf
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ciborium::de::Error<std::io::Error>> {
        ciborium::from_reader(bytes)
    }
}

impl SyncResponse {
    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).expect("CBOR serialization failed");
        buf
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ciborium::de::Error<std::io::Error>> {
        ciborium::from_reader(bytes)
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, SyncResponse::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_roundtrip() {
        let request = SyncRequest::Propose {
            change_set: vec![0x82, 0x40, 0x80],
        };
        let recovered = SyncRequest::from_bytes(&request.to_bytes()).unwrap();
        assert_eq!(recovered, request);
    }

    #[test]
    fn test_response_wire_roundtrip() {
        let response = SyncResponse::ChangeSets {
            change_sets: vec![ByteBuf::from(vec![1, 2, 3])],
            more: false,
        };
        let recovered = SyncResponse::from_bytes(&response.to_bytes()).unwrap();
        assert_eq!(recovered, response);
    }

    #[test]
    fn test_hashes_travel_as_byte_strings() {
        use ciborium::value::Value;

        let head = ChangeSetHash::from_bytes([7; 32]);
        let response = SyncResponse::Accepted { head };
        let value: Value = ciborium::from_reader(response.to_bytes().as_slice()).unwrap();

        // {"Accepted": {"head": h'0707...'}}
        let Value::Map(outer) = value else {
            panic!("expected a map for the response enum")
        };
        let Value::Map(fields) = &outer[0].1 else {
            panic!("expected variant fields, got {:?}", outer[0].1)
        };
        assert_eq!(fields[0].0, Value::Text("head".into()));
        assert_eq!(fields[0].1, Value::Bytes(vec![7; 32]));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(SyncRequest::from_bytes(&[0xff, 0x00]).is_err());
    }
}
