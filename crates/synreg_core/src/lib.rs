//! Stable node-kind registry and versioned stream codec for concrete syntax trees.

pub mod builtin;
pub mod codec;
pub mod consts;
pub mod current;
pub mod errors;
pub mod failure;
pub mod kind;
pub mod registry;
pub mod table;
pub mod tree;
pub mod utils;
pub mod version;

pub use codec::{decode, encode, CancelToken, Codec, CodecConfig, Decoded};
pub use consts::KindCode;
pub use current::RegistryHandle;
pub use errors::{CodecError, EvolutionError, RegistryError, Result, SynregError, TableError, VersionError};
pub use failure::{ExternalToolFailure, FailureKind};
pub use kind::{Category, CategoryRange, Layout, NodeKind};
pub use registry::Registry;
pub use table::{KindTable, TableEntry};
pub use tree::{SerializedNode, SyntaxNode};
pub use version::{content_key, Compatibility, PartialMismatchWarning, ProtocolVersion, VersionGuard};
