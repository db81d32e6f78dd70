//! Protocol stamp carried once per stream, and the check a consumer runs
//! before trusting decoded codes.
//!
//! Header (LE, 14 bytes):
//!   magic[4]    = "SYNR"
//!   major[2]    = protocol major
//!   checksum[8] = table checksum of the encoding registry

use crate::consts::{MAGIC_STREAM, PROTOCOL_MAJOR, STREAM_HDR_SIZE};
use crate::errors::{CodecError, VersionError};
use crate::kind::NodeKind;
use crate::registry::Registry;
use crate::utils::{read_u16, read_u64, uvarint_encode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use xxhash_rust::xxh3::Xxh3;

/// xxh3 over the (name, code, category) triples sorted by name, so two
/// registries with the same mapping hash alike whatever their build order.
pub fn table_checksum(kinds: &[NodeKind]) -> u64 {
    let mut sorted: Vec<&NodeKind> = kinds.iter().collect();
    sorted.sort_unstable_by(|a, b| (&a.name, a.code, a.category).cmp(&(&b.name, b.code, b.category)));
    let mut h = Xxh3::new();
    let mut buf = Vec::with_capacity(64);
    for k in sorted {
        buf.clear();
        uvarint_encode(k.name.len() as u64, &mut buf);
        buf.extend_from_slice(k.name.as_bytes());
        uvarint_encode(k.code as u64, &mut buf);
        buf.push(k.category.tag());
        h.update(&buf);
    }
    h.digest()
}

/// Content address of an encoded stream.
pub fn content_key(stream: &[u8]) -> [u8; 32] {
    *blake3::hash(stream).as_bytes()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u16,
    pub table_checksum: u64,
}

impl ProtocolVersion {
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(MAGIC_STREAM);
        out.extend_from_slice(&self.major.to_le_bytes());
        out.extend_from_slice(&self.table_checksum.to_le_bytes());
    }

    /// Parse the stream header, returning it and the bytes after it.
    pub fn read_from(bytes: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let magic_len = MAGIC_STREAM.len();
        let seen = bytes.len().min(magic_len);
        if bytes[..seen] != MAGIC_STREAM[..seen] {
            return Err(CodecError::BadMagic);
        }
        if bytes.len() < STREAM_HDR_SIZE {
            return Err(CodecError::TruncatedStream);
        }
        let mut cur = &bytes[magic_len..STREAM_HDR_SIZE];
        let major = read_u16(&mut cur).map_err(|_| CodecError::TruncatedStream)?;
        let table_checksum = read_u64(&mut cur).map_err(|_| CodecError::TruncatedStream)?;
        Ok((Self { major, table_checksum }, &bytes[STREAM_HDR_SIZE..]))
    }
}

/// Same major, different table: codes known to both sides still decode;
/// others surface as per-node `UnknownCode` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialMismatchWarning {
    pub stream_checksum: u64,
    pub local_checksum: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compatibility {
    Exact,
    PartialMismatch(PartialMismatchWarning),
}

impl Compatibility {
    pub fn is_exact(&self) -> bool {
        matches!(self, Compatibility::Exact)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionGuard {
    pub major: u16,
}

impl Default for VersionGuard {
    fn default() -> Self {
        Self { major: PROTOCOL_MAJOR }
    }
}

impl VersionGuard {
    pub fn new(major: u16) -> Self {
        Self { major }
    }

    pub fn stamp(&self, registry: &Registry) -> ProtocolVersion {
        ProtocolVersion { major: self.major, table_checksum: registry.checksum() }
    }

    pub fn check(&self, stream: &ProtocolVersion, local: &Registry) -> Result<Compatibility, VersionError> {
        if stream.major != self.major {
            return Err(VersionError::IncompatibleMajorVersion { stream: stream.major, local: self.major });
        }
        if stream.table_checksum == local.checksum() {
            return Ok(Compatibility::Exact);
        }
        let w = PartialMismatchWarning {
            stream_checksum: stream.table_checksum,
            local_checksum: local.checksum(),
        };
        warn!(
            stream = format_args!("{:016x}", w.stream_checksum),
            local = format_args!("{:016x}", w.local_checksum),
            "kind table differs from the one that encoded this stream"
        );
        Ok(Compatibility::PartialMismatch(w))
    }
}

pub fn stamp(registry: &Registry) -> ProtocolVersion {
    VersionGuard::default().stamp(registry)
}

pub fn check(stream: &ProtocolVersion, local: &Registry) -> Result<Compatibility, VersionError> {
    VersionGuard::default().check(stream, local)
}
