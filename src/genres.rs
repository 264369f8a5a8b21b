//! Genre label parsing
//!
//! Genres arrive in two encodings: a pipe delimited string on the movie table
//! and a list of named records on the historical metadata. Both reduce to
//! [`GenreLabels`] before any feature is built.
use crate::constants::NO_GENRES_LISTED;
use crate::errors::PlannerError;
use crate::utils::items_to_strings;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const LABEL_DELIMITER: char = '|';

/// Raw genre value, tagged by its encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawGenres {
    /// `Action|Comedy`
    Delimited(String),
    /// `[{"id": 16, "name": "Animation"}]`, JSON or a Python literal.
    Structured(String),
}

/// Ordered, de-duplicated genre names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreLabels(Vec<String>);

#[derive(Deserialize)]
struct NamedRecord {
    name: String,
}

impl GenreLabels {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() || out.iter().any(|l| l == label) {
                continue;
            }
            out.push(label.to_string());
        }
        GenreLabels(out)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|l| l == name)
    }
}

impl RawGenres {
    pub fn parse(&self) -> Result<GenreLabels, PlannerError> {
        match self {
            RawGenres::Delimited(s) => Ok(parse_delimited(s)),
            RawGenres::Structured(s) => parse_structured(s),
        }
    }

    fn is_structured(&self) -> bool {
        matches!(self, RawGenres::Structured(_))
    }
}

fn parse_delimited(s: &str) -> GenreLabels {
    if s.trim() == NO_GENRES_LISTED {
        return GenreLabels::default();
    }
    GenreLabels::new(s.split(LABEL_DELIMITER).filter(|l| l.trim() != NO_GENRES_LISTED))
}

fn parse_structured(s: &str) -> Result<GenreLabels, PlannerError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(GenreLabels::default());
    }
    let records: Vec<NamedRecord> = serde_json::from_str(trimmed)
        .or_else(|_| serde_json::from_str(&python_literal_to_json(trimmed)))
        .map_err(|e| PlannerError::Normalization(format!("malformed genre list '{}': {}", s, e)))?;
    Ok(GenreLabels::new(records.iter().map(|r| r.name.as_str())))
}

/// Rewrite the quoting of a Python literal (single or double quoted strings)
/// into JSON strings. Everything outside of strings is copied as is.
fn python_literal_to_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut quote: Option<char> = None;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match quote {
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                    out.push('"');
                } else {
                    out.push(c);
                }
            }
            Some(q) => {
                if c == '\\' {
                    match chars.next() {
                        Some('\'') => out.push('\''),
                        Some(next) => {
                            out.push('\\');
                            out.push(next);
                        }
                        None => out.push('\\'),
                    }
                } else if c == q {
                    quote = None;
                    out.push('"');
                } else if c == '"' {
                    out.push_str("\\\"");
                } else {
                    out.push(c);
                }
            }
        }
    }
    out
}

/// Which genre encoding wins when a joined row carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GenreSource {
    /// Use the structured metadata list when it yields labels.
    #[default]
    PreferStructured,
    /// Use the delimited movie list when it yields labels.
    PreferDelimited,
}

impl FromStr for GenreSource {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PreferStructured" => Ok(GenreSource::PreferStructured),
            "PreferDelimited" => Ok(GenreSource::PreferDelimited),
            _ => Err(PlannerError::ParseString(
                s.to_string(),
                "GenreSource".to_string(),
                items_to_strings(vec!["PreferStructured", "PreferDelimited"]),
            )),
        }
    }
}

impl GenreSource {
    fn rank(&self, raw: &RawGenres) -> u8 {
        match (self, raw.is_structured()) {
            (GenreSource::PreferStructured, true) | (GenreSource::PreferDelimited, false) => 0,
            _ => 1,
        }
    }

    /// Resolve the labels of a row from every encoding it carries.
    ///
    /// Candidates are tried in preference order and the first one yielding at
    /// least one label wins. When none does, the result is empty, unless a
    /// candidate failed to parse, in which case that error is returned.
    pub fn resolve(&self, candidates: &[&RawGenres]) -> Result<GenreLabels, PlannerError> {
        let mut ordered: Vec<&RawGenres> = candidates.to_vec();
        ordered.sort_by_key(|raw| self.rank(raw));

        let mut first_error = None;
        for raw in ordered {
            match raw.parse() {
                Ok(labels) if !labels.is_empty() => return Ok(labels),
                Ok(_) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(GenreLabels::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited() {
        let labels = RawGenres::Delimited("Adventure|Animation| Children |Animation||".to_string())
            .parse()
            .unwrap();
        assert_eq!(labels.as_slice(), &["Adventure", "Animation", "Children"]);
        assert!(RawGenres::Delimited(NO_GENRES_LISTED.to_string()).parse().unwrap().is_empty());
        assert!(RawGenres::Delimited(String::new()).parse().unwrap().is_empty());
    }

    #[test]
    fn test_structured_both_encodings_agree() {
        let python = RawGenres::Structured("[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': 'Comedy'}]".to_string());
        let json = RawGenres::Structured(r#"[{"id": 16, "name": "Animation"}, {"id": 35, "name": "Comedy"}]"#.to_string());
        let delimited = RawGenres::Delimited("Animation|Comedy".to_string());
        assert_eq!(python.parse().unwrap(), json.parse().unwrap());
        assert_eq!(python.parse().unwrap(), delimited.parse().unwrap());
        assert!(RawGenres::Structured("[]".to_string()).parse().unwrap().is_empty());
    }

    #[test]
    fn test_python_literal_quotes() {
        let raw = RawGenres::Structured(r#"[{'id': 1, 'name': "Children's"}, {'id': 2, 'name': 'Say \'Hi\''}]"#.to_string());
        let labels = raw.parse().unwrap();
        assert_eq!(labels.as_slice(), &["Children's", "Say 'Hi'"]);
    }

    #[test]
    fn test_structured_malformed() {
        let raw = RawGenres::Structured("[{'id': 16, 'name': ".to_string());
        assert!(matches!(raw.parse(), Err(PlannerError::Normalization(_))));
        let raw = RawGenres::Structured("Action|Comedy".to_string());
        assert!(raw.parse().is_err());
    }

    #[test]
    fn test_resolution_order() {
        let delimited = RawGenres::Delimited("Comedy|Romance".to_string());
        let structured = RawGenres::Structured("[{'id': 35, 'name': 'Comedy'}]".to_string());
        let empty = RawGenres::Structured("[]".to_string());
        let broken = RawGenres::Structured("[{".to_string());

        let both = [&delimited, &structured];
        assert_eq!(GenreSource::PreferStructured.resolve(&both).unwrap().as_slice(), &["Comedy"]);
        assert_eq!(
            GenreSource::PreferDelimited.resolve(&both).unwrap().as_slice(),
            &["Comedy", "Romance"]
        );
        // Falls back when the preferred encoding has no labels.
        assert_eq!(GenreSource::PreferStructured.resolve(&[&delimited, &empty]).unwrap().len(), 2);
        assert_eq!(GenreSource::PreferStructured.resolve(&[&delimited, &broken]).unwrap().len(), 2);
        assert!(GenreSource::PreferStructured.resolve(&[&broken]).is_err());
        assert!(GenreSource::PreferStructured.resolve(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_genre_source_from_str() {
        assert_eq!(GenreSource::from_str("PreferDelimited").unwrap(), GenreSource::PreferDelimited);
        assert!(GenreSource::from_str("Either").is_err());
    }
}
