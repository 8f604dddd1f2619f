mod catalog;
mod loader;
mod record;

pub use catalog::Catalog;
pub use loader::{load_dir, load_file, parse_records, ELEMENT_FILE_EXT};
pub use record::{ElementSet, OrbitModel, RecordError};
