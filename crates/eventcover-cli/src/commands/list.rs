//! List command implementation.

use eventcover_canonical::Principal;
use eventcover_core::{BlockHeight, EventId};
use eventcover_store::{
    AndFilter, CallerFilter, EntryFilter, EntryReader, EventFilter, FilteredReader,
    HeightRangeFilter, JournalEntryReader, OperationFilter, ReadMode,
};

use super::Target;
use crate::error::CliError;
use crate::output;

const OPERATIONS: [&str; 5] = [
    "register_event",
    "purchase_insurance",
    "cancel_event",
    "claim_insurance",
    "deposit",
];

/// Optional entry filters, all of which must match.
pub struct Filters {
    pub op: Option<String>,
    pub caller: Option<String>,
    pub event_id: Option<u64>,
    pub from_height: Option<u64>,
    pub to_height: Option<u64>,
}

impl Filters {
    fn build(self) -> Result<AndFilter, Box<dyn std::error::Error>> {
        let mut filters: Vec<Box<dyn EntryFilter>> = Vec::new();
        if let Some(op) = self.op {
            if !OPERATIONS.contains(&op.as_str()) {
                return Err(CliError::UnknownOperation(op).into());
            }
            filters.push(Box::new(OperationFilter { op }));
        }
        if let Some(caller) = self.caller {
            let caller = Principal::parse(caller).map_err(|e| format!("Invalid caller: {}", e))?;
            filters.push(Box::new(CallerFilter { caller }));
        }
        if let Some(id) = self.event_id {
            filters.push(Box::new(EventFilter {
                event_id: EventId(id),
            }));
        }
        if self.from_height.is_some() || self.to_height.is_some() {
            filters.push(Box::new(HeightRangeFilter {
                from: self.from_height.map(BlockHeight),
                to: self.to_height.map(BlockHeight),
            }));
        }
        Ok(AndFilter { filters })
    }
}

pub fn run(target: &Target, json: bool, filters: Filters) -> Result<(), Box<dyn std::error::Error>> {
    target.require_existing()?;
    let reader = JournalEntryReader::open(&target.journal, ReadMode::Strict)
        .map_err(|e| format!("Failed to open journal: {}", e))?;
    let mut reader = FilteredReader::new(reader, filters.build()?);

    if !json {
        output::print_entry_header();
    }
    while let Some(entry) = reader.read_next()? {
        if json {
            println!("{}", serde_json::to_string(&entry)?);
        } else {
            println!("{}", output::format_entry_row(&entry));
        }
    }
    Ok(())
}
