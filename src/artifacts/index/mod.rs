//! Index (staging area) data structures
//!
//! ## File Format (Version 2)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - Each entry padded to 8-byte alignment
//!   - Contains metadata and path
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod entry_mode;
pub mod index_entry;
pub mod index_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// 4 bytes for marker, 4 for version, 4 for entries_count
pub const HEADER_SIZE: usize = 12;

pub const SIGNATURE: &str = "DIRC";

pub const VERSION: u32 = 2;

/// Block size for entry alignment
pub const ENTRY_BLOCK: usize = 8;

/// Smallest possible entry: fixed fields, a one-byte path and its padding
pub const ENTRY_MIN_SIZE: usize = 64;

/// Path lengths at or above this value are stored as this value in the flags
pub const MAX_PATH_SIZE: usize = 0xfff;
