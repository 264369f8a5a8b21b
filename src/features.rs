//! Feature Builder
//!
//! Turns genre labels, a budget and a release month into the numeric row the
//! booster consumes: `[flag_0 .. flag_{k-1}, budget, release_month]`.
use crate::join::JoinedTrainingRow;
use hashbrown::HashMap;
use std::collections::BTreeSet;

/// Fixed, ordered list of genre names with a name to column index.
#[derive(Debug, Clone, Default)]
pub struct GenreVocabulary {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl PartialEq for GenreVocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl GenreVocabulary {
    /// Explicit vocabulary. Duplicates are removed, first occurrence kept.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = GenreVocabulary::default();
        for name in names {
            let name = name.into();
            if !vocab.index.contains_key(&name) {
                vocab.index.insert(name.clone(), vocab.names.len());
                vocab.names.push(name);
            }
        }
        vocab
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Width of a feature row built with this vocabulary.
    pub fn n_features(&self) -> usize {
        self.names.len() + 2
    }
}

/// Every label observed in `rows`, sorted alphabetically.
pub fn build_vocabulary(rows: &[JoinedTrainingRow]) -> GenreVocabulary {
    let labels: BTreeSet<&str> = rows
        .iter()
        .flat_map(|r| r.genre_labels.iter().map(String::as_str))
        .collect();
    GenreVocabulary::from_names(labels)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// One flag per vocabulary item, in vocabulary order.
    pub genre_flags: Vec<bool>,
    pub budget: f64,
    pub release_month: u8,
}

impl FeatureVector {
    pub fn to_row(&self) -> Vec<f64> {
        let mut row: Vec<f64> = self.genre_flags.iter().map(|f| if *f { 1.0 } else { 0.0 }).collect();
        row.push(self.budget);
        row.push(f64::from(self.release_month));
        row
    }

    pub fn n_set(&self) -> usize {
        self.genre_flags.iter().filter(|f| **f).count()
    }
}

fn flags<'a, I>(vocab: &GenreVocabulary, names: I) -> Vec<bool>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut flags = vec![false; vocab.len()];
    for name in names {
        if let Some(i) = vocab.position(name) {
            flags[i] = true;
        }
    }
    flags
}

pub fn build_features(vocab: &GenreVocabulary, row: &JoinedTrainingRow) -> FeatureVector {
    FeatureVector {
        genre_flags: flags(vocab, row.genre_labels.iter().map(String::as_str)),
        budget: row.budget,
        release_month: row.release_month,
    }
}

/// Features of a hypothetical release. Names outside the vocabulary are ignored.
pub fn query_features<S: AsRef<str>>(vocab: &GenreVocabulary, genres: &[S], budget: f64, month: u8) -> FeatureVector {
    FeatureVector {
        genre_flags: flags(vocab, genres.iter().map(|g| g.as_ref())),
        budget,
        release_month: month,
    }
}

/// Column-major matrix data of `vectors`, as expected by `Matrix::new`.
pub fn feature_matrix(vectors: &[FeatureVector]) -> Vec<f64> {
    let cols = match vectors.first() {
        Some(v) => v.genre_flags.len() + 2,
        None => return Vec::new(),
    };
    let rows: Vec<Vec<f64>> = vectors.iter().map(|v| v.to_row()).collect();
    let mut data = Vec::with_capacity(rows.len() * cols);
    for j in 0..cols {
        data.extend(rows.iter().map(|r| r[j]));
    }
    data
}

pub fn column_names(vocab: &GenreVocabulary) -> Vec<String> {
    let mut names: Vec<String> = vocab.names().iter().map(|n| format!("genre_{}", n)).collect();
    names.push("budget".to_string());
    names.push("release_month".to_string());
    names
}
