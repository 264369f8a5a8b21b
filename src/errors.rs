//! Errors
//!
//! Custom error types used throughout the `release_planner` crate.
use thiserror::Error;

/// Errors that can occur while building or querying the revenue planner.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A required input source is missing, unreadable, or lacks a column.
    #[error("Unable to read data source: {0}")]
    DataSource(String),
    /// An external identifier could not be turned into a canonical join key.
    #[error("Unable to normalize identifier: {0}")]
    Normalization(String),
    /// Training data is empty or too small to fit a model.
    #[error("Unable to train model: {0}")]
    Training(String),
    /// A prediction request is malformed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// Unable to write configuration to file.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
    /// Unable to read configuration from file.
    #[error("Unable to read from file: {0}")]
    UnableToRead(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = PlannerError::InvalidParameter("test_fraction".to_string(), "[0, 1)".to_string(), "1.5".to_string());
        assert_eq!(
            e.to_string(),
            "Invalid parameter value passed for test_fraction, expected [0, 1) but 1.5 provided."
        );
        let e = PlannerError::Training("empty".to_string());
        assert_eq!(e.to_string(), "Unable to train model: empty");
    }
}
