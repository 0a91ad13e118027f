pub mod attendee;
pub mod loaders;

pub use attendee::{AttendeeRecord, FailedImport, ImportOutcome, ImportResult, ImportStats};
pub use loaders::{fetch_google_sheet, load_csv_file, to_csv_export_url};
