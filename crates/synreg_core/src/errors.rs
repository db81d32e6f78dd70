use crate::consts::KindCode;
use crate::failure::ExternalToolFailure;
use crate::kind::Category;
use thiserror::Error;

/// Raised while building a [`crate::Registry`]; construction is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate code {0}")]
    DuplicateCode(KindCode),

    #[error("duplicate name `{0}`")]
    DuplicateName(String),

    #[error("`{name}` has code {code}, outside the {expected} range")]
    RangeViolation { name: String, code: KindCode, expected: Category },

    #[error("code {0} is reserved for a primitive kind")]
    ReservedCode(KindCode),

    #[error("`{name}` has code {code}, which no category range covers")]
    UnclassifiedCode { name: String, code: KindCode },

    #[error("category ranges overlap or are malformed: {0}")]
    BadLayout(String),
}

/// Raised while encoding or decoding one stream. Never touches the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unknown node kind `{0}`")]
    UnknownKind(String),

    #[error("unknown node code {0}")]
    UnknownCode(KindCode),

    #[error("stream ended before the declared node content")]
    TruncatedStream,

    #[error("malformed varint at byte {0}")]
    MalformedVarint(usize),

    #[error("code {0} does not fit a kind code")]
    CodeOutOfRange(u64),

    #[error("token node has {0} children")]
    TokenWithChildren(usize),

    #[error("token node has no payload")]
    MissingPayload,

    #[error("`{0}` node carries a payload but is not a token")]
    UnexpectedPayload(String),

    #[error("payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { len: u64, max: usize },

    #[error("{0} bytes left after the root node")]
    TrailingBytes(usize),

    #[error("bad stream magic")]
    BadMagic,

    #[error("tree deeper than {0} levels")]
    DepthExceeded(usize),

    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Version(#[from] VersionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("stream protocol major {stream} is incompatible with local major {local}")]
    IncompatibleMajorVersion { stream: u16, local: u16 },
}

/// A newer table broke append-only evolution relative to an older one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvolutionError {
    #[error("`{0}` was removed")]
    RemovedKind(String),

    #[error("`{name}` moved from code {old} to {new}")]
    ReassignedCode { name: String, old: KindCode, new: KindCode },

    #[error("code {code} was `{old}` and is now `{new}`")]
    ReusedCode { code: KindCode, old: String, new: String },

    #[error("`{name}` changed category from {old} to {new}")]
    Recategorized { name: String, old: Category, new: Category },
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SynregError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Evolution(#[from] EvolutionError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    External(#[from] ExternalToolFailure),
}

pub type Result<T> = std::result::Result<T, SynregError>;
