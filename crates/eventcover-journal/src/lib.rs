//! Append-only journal format for committed ledger entries.
//!
//! This crate provides:
//! - Framed, append-only storage for ledger entry JSON
//! - Reader/writer APIs with strict and permissive truncation handling
//! - An entry identity check used during replay
//!
//! ## Layout
//!
//! ```text
//! header  : "ECJ1" | version u16 LE | flags u16 LE (0) | 8 reserved zero bytes
//! frame*  : kind u8 | 3 reserved zero bytes | len u32 LE | payload[len]
//! ```
//!
//! Frame kind `0x01` carries one UTF-8 JSON entry. Unknown kinds are
//! skipped by readers so older binaries can read newer journals.
//!
//! ## Quick Start
//!
//! ```rust
//! use eventcover_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("ledger.ecj");
//!
//! let mut writer = JournalWriter::open(&path, WriteOptions::default())?;
//! writer.append_entry(&json!({"seq": 1}))?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
//! while let Some(entry) = reader.read_entry()? {
//!     println!("seq {}", entry["seq"]);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Frame structure and serialization.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Entry identity checks.
pub mod verification;
/// Journal writer implementation.
pub mod writer;

pub use errors::JournalError;
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use verification::verify_entry;
pub use writer::{JournalWriter, WriteOptions};

/// Entry payload as stored in the journal.
pub type EntryJson = serde_json::Value;
