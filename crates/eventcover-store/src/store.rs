//! The journal-backed ledger store.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use eventcover_canonical::{Digest, Principal, Timestamp};
use eventcover_core::{
    operations, BlockHeight, Escrow, EventParams, FixedClock, Ledger, OperationReceipt,
    UnitOfWork, WalletEscrow,
};
use eventcover_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
use fs4::fs_std::FileExt;
use tracing::{debug, info, warn};

use crate::chain::ChainVerifier;
use crate::entry::{LedgerEntry, Operation};
use crate::error::StoreError;

/// Options for opening a store.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// fsync after every committed entry.
    pub sync: bool,
    /// How to treat a truncated journal tail on open. In permissive mode
    /// the partial frame is cut off before new entries are appended.
    pub read_mode: ReadMode,
}

/// A committed operation.
#[derive(Debug, Clone)]
pub struct Committed {
    /// The journaled entry.
    pub entry: LedgerEntry,
    /// Ledger receipt; `None` for deposits.
    pub receipt: Option<OperationReceipt>,
}

/// A ledger whose committed history lives in a journal file.
///
/// Every successful operation is appended to the journal before it becomes
/// visible in memory; if the append fails the unit of work rolls back.
///
/// A writable store holds an exclusive lock on `<journal>.lock` for its whole
/// lifetime, so at most one store appends to a journal at a time. Read-only
/// stores take no lock and never touch the journal.
pub struct LedgerStore {
    path: PathBuf,
    ledger: Ledger<WalletEscrow>,
    writer: Option<JournalWriter>,
    chain: ChainVerifier,
    _lock: Option<File>,
}

impl LedgerStore {
    /// Opens (or creates) the journal at `path` for writing and replays it.
    ///
    /// # Errors
    ///
    /// Fails with [`StoreError::Locked`] when another store holds the
    /// journal, and on I/O or framing errors, a broken hash chain, or an
    /// entry that no longer applies to the replayed state.
    pub fn open<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let lock = lock_journal(&path)?;

        let (ledger, chain, valid_len) = load(&path, options.read_mode)?;
        if let Some(valid_len) = valid_len {
            cut_partial_tail(&path, valid_len)?;
        }

        let writer = JournalWriter::open(
            &path,
            WriteOptions {
                sync: options.sync,
                create: true,
            },
        )?;

        Ok(Self {
            path,
            ledger,
            writer: Some(writer),
            chain,
            _lock: Some(lock),
        })
    }

    /// Replays an existing journal without opening it for writing.
    ///
    /// The file is never created, locked or modified; [`execute`](Self::execute)
    /// on the result fails with [`StoreError::ReadOnly`].
    pub fn open_read_only<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        fs::metadata(&path)?;
        let (ledger, chain, _) = load(&path, mode)?;
        Ok(Self {
            path,
            ledger,
            writer: None,
            chain,
            _lock: None,
        })
    }

    /// Runs `operation` for `caller` at `height` and journals it.
    ///
    /// Rejected operations return [`StoreError::Rejected`] and leave both the
    /// journal and the in-memory ledger untouched.
    pub fn execute(
        &mut self,
        caller: &Principal,
        height: BlockHeight,
        operation: Operation,
    ) -> Result<Committed, StoreError> {
        let writer = self.writer.as_mut().ok_or(StoreError::ReadOnly)?;
        if let Some(last) = self.chain.last_height() {
            if height < last {
                return Err(StoreError::ClockRegression {
                    last,
                    requested: height,
                });
            }
        }

        let entry = LedgerEntry::seal(
            self.chain.count() + 1,
            self.chain.tip().cloned(),
            height,
            now_timestamp()?,
            caller.clone(),
            operation,
        )?;
        let raw = serde_json::to_value(&entry)?;

        let receipt = match &entry.operation {
            Operation::Deposit { amount } => {
                self.ledger
                    .escrow()
                    .check_deposit(caller, *amount)
                    .map_err(StoreError::Deposit)?;
                writer.append_entry(&raw)?;
                self.ledger
                    .escrow_mut()
                    .deposit(caller, *amount)
                    .map_err(StoreError::Deposit)?;
                None
            }
            op => {
                let mut uow = self.ledger.begin(&FixedClock(height));
                let receipt = run(&mut uow, caller, op)?;
                // Dropping `uow` on a failed append rolls the operation back.
                writer.append_entry(&raw)?;
                uow.commit();
                Some(receipt)
            }
        };

        self.chain.check(&raw)?;
        debug!(seq = entry.seq, op = entry.operation.name(), caller = %caller, %height, "entry committed");
        Ok(Committed { entry, receipt })
    }

    /// The replayed, live ledger.
    pub fn ledger(&self) -> &Ledger<WalletEscrow> {
        &self.ledger
    }

    /// Committed entries so far.
    pub fn len(&self) -> u64 {
        self.chain.count()
    }

    /// True when nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.chain.count() == 0
    }

    /// ID of the last committed entry.
    pub fn tip(&self) -> Option<&Digest> {
        self.chain.tip()
    }

    /// Height of the last committed entry.
    pub fn last_height(&self) -> Option<BlockHeight> {
        self.chain.last_height()
    }

    /// True when opened with [`open_read_only`](Self::open_read_only).
    pub fn is_read_only(&self) -> bool {
        self.writer.is_none()
    }

    /// Journal location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn run<E: Escrow>(
    uow: &mut UnitOfWork<'_, E>,
    caller: &Principal,
    operation: &Operation,
) -> Result<OperationReceipt, StoreError> {
    let receipt = match *operation {
        Operation::RegisterEvent {
            event_id,
            event_date,
            premium_amount,
            max_participants,
        } => operations::register_event(
            uow,
            caller,
            EventParams {
                event_id,
                event_date,
                premium_amount,
                max_participants,
            },
        )?,
        Operation::PurchaseInsurance { event_id } => {
            operations::purchase_insurance(uow, caller, event_id)?
        }
        Operation::CancelEvent { event_id } => operations::cancel_event(uow, caller, event_id)?,
        Operation::ClaimInsurance { event_id } => {
            operations::claim_insurance(uow, caller, event_id)?
        }
        Operation::Deposit { .. } => {
            return Err(StoreError::Replay {
                seq: 0,
                error: "deposit is not a ledger operation".to_string(),
            })
        }
    };
    Ok(receipt)
}

fn replay(ledger: &mut Ledger<WalletEscrow>, entry: &LedgerEntry) -> Result<(), StoreError> {
    let failed = |error: String| StoreError::Replay {
        seq: entry.seq,
        error,
    };
    match &entry.operation {
        Operation::Deposit { amount } => ledger
            .escrow_mut()
            .deposit(&entry.caller, *amount)
            .map_err(|e| failed(e.to_string())),
        op => {
            let mut uow = ledger.begin(&FixedClock(entry.height));
            run(&mut uow, &entry.caller, op).map_err(|e| failed(e.to_string()))?;
            uow.commit();
            Ok(())
        }
    }
}

/// Replays the journal at `path` into a fresh ledger.
///
/// Returns the byte length of the whole frames read, or `None` when there
/// was no journal to read.
fn load(
    path: &Path,
    mode: ReadMode,
) -> Result<(Ledger<WalletEscrow>, ChainVerifier, Option<u64>), StoreError> {
    let mut ledger = Ledger::new(WalletEscrow::new());
    let mut chain = ChainVerifier::new();

    if !path.exists() || fs::metadata(path)?.len() == 0 {
        return Ok((ledger, chain, None));
    }

    let mut reader = JournalReader::open(path, mode)?;
    while let Some(raw) = reader.read_entry()? {
        let entry = chain.check(&raw)?;
        replay(&mut ledger, &entry)?;
    }
    info!(path = %path.display(), entries = chain.count(), "journal replayed");
    Ok((ledger, chain, Some(reader.position())))
}

/// Takes the store's exclusive lock on `<path>.lock`.
fn lock_journal(path: &Path) -> Result<File, StoreError> {
    let mut lock_path = path.as_os_str().to_owned();
    lock_path.push(".lock");
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(PathBuf::from(lock_path))?;
    FileExt::try_lock_exclusive(&file).map_err(|source| StoreError::Locked {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file)
}

/// Drops bytes after the last whole frame (only present after a permissive read).
fn cut_partial_tail(path: &Path, valid_len: u64) -> Result<(), StoreError> {
    let len = fs::metadata(path)?.len();
    if len > valid_len {
        warn!(path = %path.display(), len, valid_len, "truncating partial journal tail");
        OpenOptions::new().write(true).open(path)?.set_len(valid_len)?;
    }
    Ok(())
}

fn now_timestamp() -> Result<Timestamp, StoreError> {
    let now = chrono::Utc::now();
    Ok(Timestamp::parse(now.format("%Y-%m-%dT%H:%M:%SZ").to_string())?)
}
