//! Identifier Normalizer
//!
//! The movie cross-reference table stores external ids as plain integers
//! (`114709`) while the historical metadata stores them tagged and padded
//! (`tt0114709`). Both reduce to a [`CanonicalId`] used as the join key.
use crate::constants::{TAGGED_ID_PREFIX, TAGGED_ID_WIDTH};
use crate::errors::PlannerError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Raw external identifier, as read from one of the sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternalRef {
    Numeric(i64),
    Tagged(String),
}

/// Normalized join key: decimal digits, no prefix, no leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalId(String);

impl ExternalRef {
    /// Classify raw text. Text made only of ASCII digits that fits an `i64` is
    /// numeric, anything else is kept as tagged text.
    pub fn parse(text: &str) -> ExternalRef {
        let trimmed = text.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = trimmed.parse::<i64>() {
                return ExternalRef::Numeric(n);
            }
        }
        ExternalRef::Tagged(trimmed.to_string())
    }

    pub fn canonicalize(&self) -> Result<CanonicalId, PlannerError> {
        match self {
            ExternalRef::Numeric(n) => {
                if *n < 0 {
                    Err(PlannerError::Normalization(format!("negative identifier {}", n)))
                } else {
                    Ok(CanonicalId(n.to_string()))
                }
            }
            ExternalRef::Tagged(s) => canonicalize_text(s),
        }
    }
}

fn canonicalize_text(text: &str) -> Result<CanonicalId, PlannerError> {
    let trimmed = text.trim();
    let prefix_len = TAGGED_ID_PREFIX.len();
    let body = match trimmed.get(..prefix_len) {
        Some(head) if head.eq_ignore_ascii_case(TAGGED_ID_PREFIX) => &trimmed[prefix_len..],
        _ => trimmed,
    };
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PlannerError::Normalization(format!("'{}' is not a tagged numeric identifier", text)));
    }
    let digits = body.trim_start_matches('0');
    if digits.is_empty() {
        Ok(CanonicalId("0".to_string()))
    } else {
        Ok(CanonicalId(digits.to_string()))
    }
}

impl CanonicalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Padded external form, `tt` followed by at least seven digits.
    pub fn to_tagged(&self) -> String {
        format!("{}{:0>width$}", TAGGED_ID_PREFIX, self.0, width = TAGGED_ID_WIDTH)
    }
}

impl Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
