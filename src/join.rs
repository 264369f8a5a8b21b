//! Join & Clean
//!
//! Combines movie records with deduplicated metadata on the canonical id and
//! keeps only fully typed rows. Every dropped row is counted in a
//! [`DropReport`] under the first check it failed.
use crate::dataset::{RawMetadataRecord, RawMovieRecord};
use crate::genres::{GenreLabels, GenreSource};
use crate::identifier::CanonicalId;
use chrono::{Datelike, NaiveDate};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// A clean training row. Every field is present and well typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedTrainingRow {
    pub canonical_id: CanonicalId,
    pub title: String,
    pub genre_labels: GenreLabels,
    pub budget: f64,
    /// Calendar month, 1 to 12.
    pub release_month: u8,
    pub release_year: i32,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropReport {
    /// Source rows the csv reader could not decode, across all tables.
    pub malformed_source_rows: usize,
    /// Movie rows without a numeric `movieId`, never handed to the join.
    pub invalid_movie_id: usize,
    pub movies_in: usize,
    pub metadata_in: usize,
    pub invalid_metadata_id: usize,
    pub duplicate_metadata: usize,
    pub unmatched: usize,
    pub missing_genres: usize,
    pub malformed_genres: usize,
    pub invalid_budget: usize,
    pub invalid_release_date: usize,
    pub invalid_revenue: usize,
    pub kept: usize,
}

impl DropReport {
    /// Movie records handed to the join but excluded from its output.
    pub fn dropped(&self) -> usize {
        self.unmatched
            + self.missing_genres
            + self.malformed_genres
            + self.invalid_budget
            + self.invalid_release_date
            + self.invalid_revenue
    }
}

impl Display for DropReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "kept {} of {} movies (unmatched={}, missing_genres={}, malformed_genres={}, invalid_budget={}, invalid_release_date={}, invalid_revenue={}); metadata rows={}, invalid_id={}, duplicates={}; skipped source rows: malformed={}, invalid_movie_id={}",
            self.kept,
            self.movies_in,
            self.unmatched,
            self.missing_genres,
            self.malformed_genres,
            self.invalid_budget,
            self.invalid_release_date,
            self.invalid_revenue,
            self.metadata_in,
            self.invalid_metadata_id,
            self.duplicate_metadata,
            self.malformed_source_rows,
            self.invalid_movie_id,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct JoinOutput {
    pub rows: Vec<JoinedTrainingRow>,
    pub report: DropReport,
}

/// Finite, non-negative amount. Anything else is rejected, never coerced.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Calendar date in one of the accepted layouts, or the leading ISO date of a
/// timestamp such as `1995-10-30T00:00:00`.
pub fn parse_release_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }
    match NaiveDate::parse_and_remainder(text, "%Y-%m-%d") {
        Ok((date, rest)) if rest.starts_with('T') || rest.starts_with(' ') => Some(date),
        _ => None,
    }
}

/// Keep the first metadata record of every canonical id, ordered by
/// `(canonical_id, original position)`.
fn dedup_metadata<'a>(
    metadata: &'a [RawMetadataRecord],
    report: &mut DropReport,
) -> HashMap<CanonicalId, &'a RawMetadataRecord> {
    let mut keyed: Vec<(CanonicalId, usize)> = Vec::with_capacity(metadata.len());
    for (position, record) in metadata.iter().enumerate() {
        match record.external_ref.canonicalize() {
            Ok(id) => keyed.push((id, position)),
            Err(_) => report.invalid_metadata_id += 1,
        }
    }
    keyed.sort();

    let mut by_id = HashMap::with_capacity(keyed.len());
    for (id, position) in keyed {
        if by_id.contains_key(&id) {
            report.duplicate_metadata += 1;
        } else {
            by_id.insert(id, &metadata[position]);
        }
    }
    by_id
}

/// Join movies with metadata and drop every row that is not fully typed.
///
/// * `movies` - Movie records, already joined with their cross-reference.
/// * `metadata` - Historical metadata records.
/// * `genre_source` - Which genre encoding wins when both are present.
pub fn join_and_clean(
    movies: &[RawMovieRecord],
    metadata: &[RawMetadataRecord],
    genre_source: GenreSource,
) -> JoinOutput {
    let mut report = DropReport {
        movies_in: movies.len(),
        metadata_in: metadata.len(),
        ..Default::default()
    };
    let by_id = dedup_metadata(metadata, &mut report);

    let mut rows = Vec::new();
    for movie in movies {
        let matched = movie
            .external_ref
            .as_ref()
            .and_then(|r| r.canonicalize().ok())
            .and_then(|id| by_id.get(&id).map(|m| (id, *m)));
        let (canonical_id, meta) = match matched {
            Some(m) => m,
            None => {
                report.unmatched += 1;
                continue;
            }
        };

        let mut candidates = vec![&movie.genres];
        if let Some(g) = &meta.genres {
            candidates.push(g);
        }
        let genre_labels = match genre_source.resolve(&candidates) {
            Ok(labels) if labels.is_empty() => {
                report.missing_genres += 1;
                continue;
            }
            Ok(labels) => labels,
            Err(_) => {
                report.malformed_genres += 1;
                continue;
            }
        };

        let budget = match meta.budget.as_deref().and_then(parse_amount) {
            Some(b) => b,
            None => {
                report.invalid_budget += 1;
                continue;
            }
        };
        let release_date = match meta.release_date.as_deref().and_then(parse_release_date) {
            Some(d) => d,
            None => {
                report.invalid_release_date += 1;
                continue;
            }
        };
        let revenue = match meta.revenue.as_deref().and_then(parse_amount) {
            Some(r) => r,
            None => {
                report.invalid_revenue += 1;
                continue;
            }
        };

        rows.push(JoinedTrainingRow {
            canonical_id,
            title: movie.title.clone(),
            genre_labels,
            budget,
            release_month: release_date.month() as u8,
            release_year: release_date.year(),
            revenue,
        });
    }
    report.kept = rows.len();
    JoinOutput { rows, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_metadata, load_movies, open_source};
    use crate::genres::RawGenres;
    use crate::identifier::ExternalRef;

    fn movie(local_id: u64, genres: &str, external: Option<i64>) -> RawMovieRecord {
        RawMovieRecord {
            local_id,
            title: format!("Movie {}", local_id),
            genres: RawGenres::Delimited(genres.to_string()),
            external_ref: external.map(ExternalRef::Numeric),
        }
    }

    fn meta(id: &str, budget: &str, date: &str, revenue: &str) -> RawMetadataRecord {
        let opt = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
        RawMetadataRecord {
            external_ref: ExternalRef::parse(id),
            budget: opt(budget),
            release_date: opt(date),
            revenue: opt(revenue),
            genres: None,
        }
    }

    #[test]
    fn test_duplicate_metadata_keeps_first() {
        let movies = vec![movie(1, "Drama", Some(114709))];
        let metadata = vec![
            meta("tt0000002", "1", "1995-01-01", "1"),
            meta("tt0114709", "30000000", "1995-10-30", "373554033"),
            meta("0114709", "99", "1995-02-01", "99"),
        ];
        let out = join_and_clean(&movies, &metadata, GenreSource::PreferStructured);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.report.duplicate_metadata, 1);
        assert_eq!(out.rows[0].budget, 30_000_000.0);
        assert_eq!(out.rows[0].release_month, 10);
        assert_eq!(out.rows[0].release_year, 1995);
        assert_eq!(out.rows[0].canonical_id.as_str(), "114709");
    }

    #[test]
    fn test_drop_reasons() {
        let movies = vec![
            movie(1, "Drama", Some(1)),
            movie(2, "Drama", Some(2)),
            movie(3, "Drama", Some(3)),
            movie(4, "Drama", Some(4)),
            movie(5, "(no genres listed)", Some(5)),
            movie(6, "Drama", None),
            movie(7, "Drama", Some(70)),
            movie(8, "Comedy", Some(8)),
        ];
        let metadata = vec![
            meta("tt1", "1e6", "1995-06-01", "2e6"),
            meta("tt2", "unknown", "1995-06-01", "2e6"),
            meta("tt3", "1000", "June 1995", "2e6"),
            meta("tt4", "1000", "1995-06-01", "NaN"),
            meta("tt5", "1000", "1995-06-01", "2e6"),
            meta("bogus", "1000", "1995-06-01", "2e6"),
            meta("tt8", "0", "06/15/1995", "0"),
        ];
        let out = join_and_clean(&movies, &metadata, GenreSource::PreferStructured);
        let r = &out.report;
        assert_eq!(r.movies_in, 8);
        assert_eq!(r.invalid_metadata_id, 1);
        assert_eq!(r.invalid_budget, 1);
        assert_eq!(r.invalid_release_date, 1);
        assert_eq!(r.invalid_revenue, 1);
        assert_eq!(r.missing_genres, 1);
        assert_eq!(r.unmatched, 2);
        assert_eq!(r.kept, 2);
        assert_eq!(r.kept + r.dropped(), r.movies_in);
        // Output keeps the movie table order.
        let ids: Vec<&str> = out.rows.iter().map(|row| row.canonical_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "8"]);
        assert_eq!(out.rows[1].release_month, 6);
    }

    #[test]
    fn test_structured_genres_preferred() {
        let movies = vec![movie(1, "Comedy|Romance", Some(1))];
        let mut m = meta("tt1", "10", "1995-06-01", "20");
        m.genres = Some(RawGenres::Structured("[{'id': 35, 'name': 'Comedy'}]".to_string()));
        let metadata = vec![m];
        let out = join_and_clean(&movies, &metadata, GenreSource::PreferStructured);
        assert_eq!(out.rows[0].genre_labels.as_slice(), &["Comedy"]);
        let out = join_and_clean(&movies, &metadata, GenreSource::PreferDelimited);
        assert_eq!(out.rows[0].genre_labels.as_slice(), &["Comedy", "Romance"]);
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_amount(" 1500.5 "), Some(1500.5));
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("/ff9qCepilowshEtG2GYWwzt2bs4.jpg"), None);
        let expected = NaiveDate::from_ymd_opt(1995, 12, 29);
        assert_eq!(parse_release_date("1995-12-29"), expected);
        assert_eq!(parse_release_date("1995/12/29"), expected);
        assert_eq!(parse_release_date("12/29/1995"), expected);
        assert_eq!(parse_release_date("1995-12-29T00:00:00"), expected);
        assert_eq!(parse_release_date("1995-12-29 10:00"), expected);
        assert_eq!(parse_release_date("1995-13-01"), None);
        assert_eq!(parse_release_date("1995-12-29garbage"), None);
    }

    #[test]
    fn test_join_fixtures() {
        let movies = load_movies(
            open_source("resources/movies.csv").unwrap(),
            open_source("resources/links.csv").unwrap(),
        )
        .unwrap()
        .records;
        let metadata = load_metadata(open_source("resources/movies_metadata.csv").unwrap())
            .unwrap()
            .records;
        let out = join_and_clean(&movies, &metadata, GenreSource::PreferStructured);
        let r = &out.report;
        assert_eq!(r.invalid_metadata_id, 2);
        assert_eq!(r.duplicate_metadata, 1);
        assert_eq!(r.unmatched, 1);
        assert_eq!(r.missing_genres, 1);
        assert_eq!(r.invalid_budget, 2);
        assert_eq!(r.invalid_release_date, 1);
        assert_eq!(r.invalid_revenue, 1);
        assert_eq!(r.kept, 38);

        let toy_story = &out.rows[0];
        assert_eq!(toy_story.budget, 5_000_000.0);
        assert!(toy_story.genre_labels.contains("Family"));
        // Malformed structured genres fall back to the delimited list.
        let get_shorty = out.rows.iter().find(|r| r.title.starts_with("Get Shorty")).unwrap();
        assert_eq!(get_shorty.genre_labels.as_slice(), &["Comedy", "Crime", "Thriller"]);
    }
}
