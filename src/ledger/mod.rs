pub mod model;

pub use model::{
    resolve_display_name, EntryValidationError, JobScope, LedgerEntryView, NewLedgerEntry,
    ValidationPolicy, MAX_AMOUNT, MAX_ENTRIES, UNKNOWN_JOB, UNKNOWN_NAME,
};
