//! Dataset Loader
//!
//! Reads the movie table, the id cross-reference table, and the historical
//! metadata table into raw records. Nothing is validated here beyond the
//! presence of the required columns. Rows the csv reader cannot decode are
//! skipped and counted, only an unreadable source or a missing column fails.
pub mod loader;
pub mod records;

pub use loader::{load_metadata, load_movies, open_source};
pub use records::{RawMetadataRecord, RawMovieRecord, SourceRows};
