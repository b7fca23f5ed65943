//! Journal writer implementation.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame};
use crate::EntryJson;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
        }
    }
}

/// Append-only writer for ledger entries.
///
/// Opening an empty (or new) file writes the header; opening an existing
/// journal validates its header. The file is opened in append mode, and each
/// append first checks that the file still has the length this writer last
/// left it at, so bytes written by anyone else are never overwritten or
/// built upon. Each append is a single frame header plus payload followed by
/// a flush, and an fsync when [`WriteOptions::sync`] is set.
pub struct JournalWriter {
    file: File,
    sync: bool,
    len: u64,
}

impl JournalWriter {
    /// Opens or creates a journal file for appending.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if the file cannot be opened, or if it is
    /// non-empty and does not start with a valid header.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .create(options.create)
            .read(true)
            .append(true)
            .open(path)?;

        let existing = file.metadata()?.len();
        if existing == 0 {
            file.write_all(&JournalHeader::current().encode())?;
            file.flush()?;
            if options.sync {
                file.sync_all()?;
            }
        } else if existing < JournalHeader::SIZE as u64 {
            return Err(JournalError::ShortFile { len: existing });
        } else {
            let mut header = [0u8; JournalHeader::SIZE];
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut header)?;
            JournalHeader::decode(&header)?;
        }

        let len = file.seek(SeekFrom::End(0))?;
        Ok(Self {
            file,
            sync: options.sync,
            len,
        })
    }

    /// Appends one ledger entry as a JSON frame.
    pub fn append_entry(&mut self, entry: &EntryJson) -> Result<(), JournalError> {
        if !entry.is_object() {
            return Err(JournalError::InvalidEntry(
                "entry must be a JSON object".to_string(),
            ));
        }
        let payload = serde_json::to_vec(entry)?;
        self.append_raw(FrameKind::EntryJson, &payload)
    }

    /// Appends a raw frame with the given kind and payload.
    ///
    /// A failed write truncates the file back to its previous length so a
    /// partial frame never survives.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let frame = RecordFrame::new(kind, payload.len())?;
        let start = self.len;
        let found = self.file.metadata()?.len();
        if found != start {
            return Err(JournalError::LengthChanged {
                expected: start,
                found,
            });
        }

        if let Err(e) = write_frame(&mut self.file, &frame.encode(), payload, self.sync) {
            let _ = self.file.set_len(start);
            let _ = self.file.seek(SeekFrom::Start(start));
            return Err(e.into());
        }

        self.len = start + RecordFrame::SIZE as u64 + payload.len() as u64;
        Ok(())
    }

    /// Current file length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True when the journal holds only its header.
    pub fn is_empty(&self) -> bool {
        self.len <= JournalHeader::SIZE as u64
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

fn write_frame(file: &mut File, header: &[u8], payload: &[u8], sync: bool) -> io::Result<()> {
    file.write_all(header)?;
    file.write_all(payload)?;
    file.flush()?;
    if sync {
        file.sync_data()?;
    }
    Ok(())
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.file.flush();
        if self.sync {
            let _ = self.file.sync_all();
        }
    }
}
