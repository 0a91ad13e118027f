pub mod csv_loader;

pub use csv_loader::{fetch_google_sheet, load_csv_file, to_csv_export_url};
