use crate::genres::RawGenres;
use crate::identifier::ExternalRef;
use serde::{Deserialize, Serialize};

/// A movie joined with its cross-reference entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMovieRecord {
    pub local_id: u64,
    pub title: String,
    pub genres: RawGenres,
    /// `None` when the cross-reference table has no usable entry.
    pub external_ref: Option<ExternalRef>,
}

/// One historical title. Numeric fields keep their stored text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMetadataRecord {
    pub external_ref: ExternalRef,
    pub budget: Option<String>,
    pub release_date: Option<String>,
    pub revenue: Option<String>,
    pub genres: Option<RawGenres>,
}

/// Records read from one source, with the rows that never became records.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRows<T> {
    pub records: Vec<T>,
    /// Rows the csv reader could not decode, such as invalid UTF-8.
    pub malformed: usize,
    /// Movie rows without a numeric `movieId`.
    pub invalid_id: usize,
}

impl<T> Default for SourceRows<T> {
    fn default() -> Self {
        SourceRows {
            records: Vec::new(),
            malformed: 0,
            invalid_id: 0,
        }
    }
}
