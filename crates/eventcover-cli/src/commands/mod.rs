pub mod audit;
pub mod balance;
pub mod list;
pub mod show;
pub mod submit;

use std::path::PathBuf;

use eventcover_store::{LedgerStore, ReadMode, StoreOptions};

use crate::error::CliError;

/// Journal location and write options shared by every command.
pub struct Target {
    pub journal: PathBuf,
    pub sync: bool,
}

impl Target {
    /// Opens the store, creating the journal if needed.
    pub fn open(&self) -> Result<LedgerStore, Box<dyn std::error::Error>> {
        let options = StoreOptions {
            sync: self.sync,
            read_mode: ReadMode::Strict,
        };
        Ok(LedgerStore::open(&self.journal, options)?)
    }

    /// Replays the journal without locking or writing it; the journal must
    /// already exist.
    pub fn open_existing(&self) -> Result<LedgerStore, Box<dyn std::error::Error>> {
        self.require_existing()?;
        Ok(LedgerStore::open_read_only(&self.journal, ReadMode::Strict)?)
    }

    pub fn require_existing(&self) -> Result<(), CliError> {
        if self.journal.exists() {
            Ok(())
        } else {
            Err(CliError::JournalMissing(self.journal.clone()))
        }
    }
}
