//! Sizes shared by the writer and reader. Both sides must agree on every
//! value here for blocks to be readable.

/// Number of samples flushed to the byte stream at a time.
pub const CHUNK_SZ: usize = 16;
pub const CHUNK_MASK: usize = 15;

/// 2 (version) + 2 (nchunks) + 2 (ntail) + 8 (series id).
pub const HEADER_SZ: usize = 14;

/// Typical block size handed out by block stores.
pub const BLOCK_SZ: usize = 4096;

/// Current block format version.
pub const BLOCK_VERSION: u16 = 1;

/// Entries in the float predictor table. Must be a power of two.
pub const FCM_TABLE_SZ: usize = 256;
