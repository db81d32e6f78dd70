// crates/synreg_core/src/consts.rs

use core::mem::size_of;

pub const MAGIC_STREAM: &[u8; 4] = b"SYNR";
pub const PROTOCOL_MAJOR: u16 = 1;

/// magic[4] + major[2] + table_checksum[8]
pub const STREAM_HDR_SIZE: usize = 14;

pub type KindCode = u32;

pub const CODE_TOKEN: KindCode = 0;
pub const CODE_UNKNOWN: KindCode = 1;

pub const NAME_TOKEN: &str = "Token";
pub const NAME_UNKNOWN: &str = "Unknown";

pub const DECL_RANGE: (KindCode, KindCode) = (2, 1000);
pub const EXPR_RANGE: (KindCode, KindCode) = (1001, 2000);
pub const STMT_RANGE: (KindCode, KindCode) = (2001, 3000);

pub const DEFAULT_MAX_DEPTH: usize = 4096;
pub const DEFAULT_MAX_PAYLOAD: usize = 16 << 20;

const _: () = { assert!(size_of::<[u8; 4]>() + size_of::<u16>() + size_of::<u64>() == STREAM_HDR_SIZE); };
