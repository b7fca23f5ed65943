//! Journal reader implementation.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame};
use crate::EntryJson;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read mode for handling truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Truncated frames are errors.
    #[default]
    Strict,
    /// Truncation is treated as end-of-file.
    Permissive,
}

/// Sequential reader over a journal file.
pub struct JournalReader {
    inner: BufReader<File>,
    mode: ReadMode,
    position: u64,
}

impl JournalReader {
    /// Opens a journal and validates its header.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut inner = BufReader::new(File::open(path)?);
        let mut header = [0u8; JournalHeader::SIZE];
        inner.read_exact(&mut header).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                JournalError::InvalidHeader("file shorter than header".to_string())
            }
            _ => e.into(),
        })?;
        JournalHeader::decode(&header)?;

        Ok(Self {
            inner,
            mode,
            position: JournalHeader::SIZE as u64,
        })
    }

    /// Byte offset of the next frame.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next frame of any kind.
    ///
    /// Returns `Ok(None)` at end-of-file, and on a truncated tail in
    /// permissive mode.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        let frame_start = self.position;
        let mut header = [0u8; RecordFrame::SIZE];
        match read_fully(&mut self.inner, &mut header)? {
            0 => return Ok(None),
            n if n < header.len() => return self.truncated(frame_start),
            _ => {}
        }
        let frame = RecordFrame::decode(&header, frame_start)?;

        let mut payload = vec![0u8; frame.len as usize];
        if read_fully(&mut self.inner, &mut payload)? < payload.len() {
            return self.truncated(frame_start);
        }

        self.position = frame_start + RecordFrame::SIZE as u64 + u64::from(frame.len);
        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next ledger entry, skipping unknown frame kinds.
    pub fn read_entry(&mut self) -> Result<Option<EntryJson>, JournalError> {
        loop {
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::EntryJson, payload)) => {
                    let text = std::str::from_utf8(&payload)?;
                    return Ok(Some(serde_json::from_str(text)?));
                }
                Some((FrameKind::Unknown(_), _)) => continue,
            }
        }
    }

    fn truncated<T>(&self, offset: u64) -> Result<Option<T>, JournalError> {
        match self.mode {
            ReadMode::Permissive => Ok(None),
            ReadMode::Strict => Err(JournalError::TruncatedFrame { offset }),
        }
    }
}

impl Iterator for JournalReader {
    type Item = Result<EntryJson, JournalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_entry().transpose()
    }
}

/// Reads until `buf` is full or EOF; returns bytes read.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
