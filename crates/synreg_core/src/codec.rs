//! Stream codec.
//!
//! Stream: `[ProtocolVersion][root]`, node (pre-order, length-prefixed):
//!   interior: `[code varint][childCount varint][child]*`
//!   token:    `[code varint][0 varint][payloadLen varint][payload]`
//!
//! Only the `Token` kind carries a payload, so the decoder knows from the code
//! alone whether a payload slot follows. Both directions walk with an explicit
//! stack and consult the cancel token once per node, so a call can be
//! abandoned between nodes but never inside one.

use crate::consts::{KindCode, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAYLOAD};
use crate::errors::CodecError;
use crate::kind::NodeKind;
use crate::registry::Registry;
use crate::tree::{SerializedNode, SyntaxNode};
use crate::utils::{uvarint_decode, uvarint_encode, VarintError};
use crate::version::{Compatibility, ProtocolVersion, VersionGuard};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub max_depth: usize,
    pub max_payload_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, max_payload_len: DEFAULT_MAX_PAYLOAD }
    }
}

/// Shared flag a caller flips to abandon in-flight encode/decode calls.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A decoded stream together with what the version check concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub version: ProtocolVersion,
    pub compatibility: Compatibility,
    pub root: SerializedNode,
}

/// Node shapes the encoder accepts.
trait EncodeNode: Sized {
    fn resolve<'r>(&self, registry: &'r Registry) -> Result<&'r NodeKind, CodecError>;
    fn children(&self) -> &[Self];
    fn payload(&self) -> Option<&[u8]>;
}

impl EncodeNode for SyntaxNode {
    fn resolve<'r>(&self, registry: &'r Registry) -> Result<&'r NodeKind, CodecError> {
        registry.by_name(&self.kind).ok_or_else(|| CodecError::UnknownKind(self.kind.clone()))
    }
    fn children(&self) -> &[Self] {
        &self.children
    }
    fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }
}

impl EncodeNode for SerializedNode {
    fn resolve<'r>(&self, registry: &'r Registry) -> Result<&'r NodeKind, CodecError> {
        registry.by_code(self.code).ok_or(CodecError::UnknownCode(self.code))
    }
    fn children(&self) -> &[Self] {
        &self.children
    }
    fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
    guard: VersionGuard,
    cancel: Option<CancelToken>,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn with_guard(mut self, guard: VersionGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a producer tree, resolving kinds by name.
    pub fn encode(&self, node: &SyntaxNode, registry: &Registry) -> Result<Vec<u8>, CodecError> {
        self.encode_tree(node, registry)
    }

    /// Re-encode a decoded tree, checking every code against `registry`.
    pub fn encode_serialized(&self, node: &SerializedNode, registry: &Registry) -> Result<Vec<u8>, CodecError> {
        self.encode_tree(node, registry)
    }

    fn encode_tree<N: EncodeNode>(&self, root: &N, registry: &Registry) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(256);
        self.guard.stamp(registry).write_to(&mut out);

        let mut stack: Vec<(&N, usize)> = vec![(root, 1)];
        while let Some((node, depth)) = stack.pop() {
            self.checkpoint()?;
            if depth > self.config.max_depth {
                return Err(CodecError::DepthExceeded(self.config.max_depth));
            }
            let kind = node.resolve(registry)?;
            let children = node.children();
            uvarint_encode(kind.code as u64, &mut out);
            uvarint_encode(children.len() as u64, &mut out);
            if kind.is_token() {
                if !children.is_empty() {
                    return Err(CodecError::TokenWithChildren(children.len()));
                }
                let payload = node.payload().ok_or(CodecError::MissingPayload)?;
                if payload.len() > self.config.max_payload_len {
                    return Err(CodecError::PayloadTooLarge {
                        len: payload.len() as u64,
                        max: self.config.max_payload_len,
                    });
                }
                uvarint_encode(payload.len() as u64, &mut out);
                out.extend_from_slice(payload);
            } else if node.payload().is_some() {
                return Err(CodecError::UnexpectedPayload(kind.name.to_string()));
            }
            stack.extend(children.iter().rev().map(|c| (c, depth + 1)));
        }
        Ok(out)
    }

    /// Decode a stream, rejecting an incompatible major and logging a table mismatch.
    pub fn decode(&self, bytes: &[u8], registry: &Registry) -> Result<SerializedNode, CodecError> {
        self.decode_stream(bytes, registry).map(|d| d.root)
    }

    pub fn decode_stream(&self, bytes: &[u8], registry: &Registry) -> Result<Decoded, CodecError> {
        let (version, body) = ProtocolVersion::read_from(bytes)?;
        let compatibility = self.guard.check(&version, registry)?;
        let mut rd = Reader { buf: body, pos: bytes.len() - body.len() };

        struct Frame {
            node: SerializedNode,
            remaining: usize,
        }
        let mut stack: Vec<Frame> = Vec::new();

        let root = 'walk: loop {
            self.checkpoint()?;
            if stack.len() >= self.config.max_depth {
                return Err(CodecError::DepthExceeded(self.config.max_depth));
            }
            let raw = rd.varint()?;
            let code = KindCode::try_from(raw).map_err(|_| CodecError::CodeOutOfRange(raw))?;
            let kind = registry.by_code(code).ok_or(CodecError::UnknownCode(code))?;
            let count = rd.varint()?;
            // Every node takes at least two bytes.
            if count > (rd.buf.len() / 2) as u64 {
                return Err(CodecError::TruncatedStream);
            }
            let count = count as usize;

            let payload = if kind.is_token() {
                if count != 0 {
                    return Err(CodecError::TokenWithChildren(count));
                }
                let len = rd.varint()?;
                if len > self.config.max_payload_len as u64 {
                    return Err(CodecError::PayloadTooLarge { len, max: self.config.max_payload_len });
                }
                Some(rd.take(len as usize)?.to_vec())
            } else {
                None
            };

            let node = SerializedNode { code, children: Vec::with_capacity(count), payload };
            if count > 0 {
                stack.push(Frame { node, remaining: count });
                continue;
            }

            // Leaf finished: attach it and close every parent it completes.
            let mut done = node;
            loop {
                let Some(top) = stack.last_mut() else {
                    break 'walk done;
                };
                top.remaining -= 1;
                if top.remaining > 0 {
                    top.node.children.push(done);
                    break;
                }
                let Some(mut frame) = stack.pop() else {
                    return Err(CodecError::TruncatedStream);
                };
                frame.node.children.push(done);
                done = frame.node;
            }
        };

        if !rd.buf.is_empty() {
            return Err(CodecError::TrailingBytes(rd.buf.len()));
        }
        Ok(Decoded { version, compatibility, root })
    }

    #[inline]
    fn checkpoint(&self) -> Result<(), CodecError> {
        match &self.cancel {
            Some(t) if t.is_cancelled() => Err(CodecError::Cancelled),
            _ => Ok(()),
        }
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    /// Offset of `buf` within the whole stream, for error reports.
    pos: usize,
}

impl<'a> Reader<'a> {
    fn varint(&mut self) -> Result<u64, CodecError> {
        match uvarint_decode(self.buf) {
            Ok((v, rest)) => {
                self.pos += self.buf.len() - rest.len();
                self.buf = rest;
                Ok(v)
            }
            Err(VarintError::Truncated) => Err(CodecError::TruncatedStream),
            Err(VarintError::Overflow | VarintError::NonCanonical) => Err(CodecError::MalformedVarint(self.pos)),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.buf.len() {
            return Err(CodecError::TruncatedStream);
        }
        let (head, rest) = self.buf.split_at(n);
        self.buf = rest;
        self.pos += n;
        Ok(head)
    }
}

/// Encode with default limits.
pub fn encode(node: &SyntaxNode, registry: &Registry) -> Result<Vec<u8>, CodecError> {
    Codec::default().encode(node, registry)
}

/// Decode with default limits.
pub fn decode(bytes: &[u8], registry: &Registry) -> Result<SerializedNode, CodecError> {
    Codec::default().decode(bytes, registry)
}
