use crate::dataset::records::{RawMetadataRecord, RawMovieRecord, SourceRows};
use crate::errors::PlannerError;
use crate::genres::RawGenres;
use crate::identifier::ExternalRef;
use csv::StringRecord;
use hashbrown::HashMap;
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const MOVIE_COLUMNS: [&str; 3] = ["movieId", "title", "genres"];
const LINK_COLUMNS: [&str; 2] = ["movieId", "imdbId"];
const METADATA_COLUMNS: [&str; 5] = ["imdb_id", "budget", "release_date", "revenue", "genres"];

/// Open a source file, mapping any IO failure to a data source error.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<File, PlannerError> {
    let path = path.as_ref();
    File::open(path).map_err(|e| PlannerError::DataSource(format!("{}: {}", path.display(), e)))
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(source)
}

fn column_positions<R: Read>(
    rdr: &mut csv::Reader<R>,
    names: &[&str],
    source: &str,
) -> Result<Vec<usize>, PlannerError> {
    let headers = rdr
        .headers()
        .map_err(|e| PlannerError::DataSource(format!("{}: {}", source, e)))?
        .clone();
    names
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h.trim() == *name)
                .ok_or_else(|| PlannerError::DataSource(format!("{} lacks column '{}'", source, name)))
        })
        .collect()
}

/// The decoded record, or `None` when the row is malformed and was counted.
/// IO failures stop the read.
fn decode(
    result: Result<StringRecord, csv::Error>,
    source: &str,
    malformed: &mut usize,
) -> Result<Option<StringRecord>, PlannerError> {
    match result {
        Ok(record) => Ok(Some(record)),
        Err(e) if e.is_io_error() => Err(PlannerError::DataSource(format!("{}: {}", source, e))),
        Err(e) => {
            warn!("Skipping malformed row of the {}: {}", source, e);
            *malformed += 1;
            Ok(None)
        }
    }
}

/// Trimmed field, `None` when absent or blank.
fn field(record: &StringRecord, pos: usize) -> Option<&str> {
    record.get(pos).map(str::trim).filter(|s| !s.is_empty())
}

fn read_links<R: Read>(source: R, malformed: &mut usize) -> Result<HashMap<u64, ExternalRef>, PlannerError> {
    let mut rdr = reader(source);
    let pos = column_positions(&mut rdr, &LINK_COLUMNS, "cross-reference table")?;
    let mut links = HashMap::new();
    for result in rdr.records() {
        let Some(record) = decode(result, "cross-reference table", malformed)? else {
            continue;
        };
        let local_id = field(&record, pos[0]).and_then(|s| s.parse::<u64>().ok());
        let external = field(&record, pos[1]).map(ExternalRef::parse);
        if let (Some(local_id), Some(external)) = (local_id, external) {
            links.entry(local_id).or_insert(external);
        }
    }
    debug!("Read {} cross-reference entries.", links.len());
    Ok(links)
}

/// Read the movie table and left join it with the cross-reference table on
/// the local movie id. Rows without a numeric id are skipped and counted,
/// as are malformed rows of either table.
pub fn load_movies<M: Read, L: Read>(movies: M, links: L) -> Result<SourceRows<RawMovieRecord>, PlannerError> {
    let mut out = SourceRows::default();
    let links = read_links(links, &mut out.malformed)?;
    let mut rdr = reader(movies);
    let pos = column_positions(&mut rdr, &MOVIE_COLUMNS, "movie table")?;

    for result in rdr.records() {
        let Some(record) = decode(result, "movie table", &mut out.malformed)? else {
            continue;
        };
        let local_id = match field(&record, pos[0]).and_then(|s| s.parse::<u64>().ok()) {
            Some(id) => id,
            None => {
                out.invalid_id += 1;
                continue;
            }
        };
        out.records.push(RawMovieRecord {
            local_id,
            title: field(&record, pos[1]).unwrap_or_default().to_string(),
            genres: RawGenres::Delimited(field(&record, pos[2]).unwrap_or_default().to_string()),
            external_ref: links.get(&local_id).cloned(),
        });
    }
    if out.invalid_id > 0 {
        warn!("Skipped {} movie rows without a numeric movieId.", out.invalid_id);
    }
    debug!("Read {} movie rows.", out.records.len());
    Ok(out)
}

/// Read the historical metadata table. Every row is kept, the identifier and
/// numeric fields are validated later by the join.
pub fn load_metadata<R: Read>(source: R) -> Result<SourceRows<RawMetadataRecord>, PlannerError> {
    let mut rdr = reader(source);
    let pos = column_positions(&mut rdr, &METADATA_COLUMNS, "metadata table")?;

    let mut out = SourceRows::default();
    for result in rdr.records() {
        let Some(record) = decode(result, "metadata table", &mut out.malformed)? else {
            continue;
        };
        out.records.push(RawMetadataRecord {
            external_ref: ExternalRef::parse(record.get(pos[0]).unwrap_or_default()),
            budget: field(&record, pos[1]).map(String::from),
            release_date: field(&record, pos[2]).map(String::from),
            revenue: field(&record, pos[3]).map(String::from),
            genres: field(&record, pos[4]).map(|g| RawGenres::Structured(g.to_string())),
        });
    }
    debug!("Read {} metadata rows.", out.records.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_fixtures() {
        let movies = load_movies(
            open_source("resources/movies.csv").unwrap(),
            open_source("resources/links.csv").unwrap(),
        )
        .unwrap();
        assert_eq!(movies.invalid_id, 1);
        assert_eq!(movies.malformed, 0);
        let movies = movies.records;
        assert_eq!(movies.len(), 44);
        assert_eq!(movies[0].title, "Toy Story (1995)");
        assert_eq!(movies[0].external_ref, Some(ExternalRef::Numeric(114709)));
        assert_eq!(
            movies[0].genres,
            RawGenres::Delimited("Adventure|Animation|Children|Comedy|Fantasy".to_string())
        );
        // Movie 8 has an empty cross-reference.
        assert_eq!(movies[7].external_ref, None);

        let metadata = load_metadata(open_source("resources/movies_metadata.csv").unwrap())
            .unwrap()
            .records;
        assert_eq!(metadata.len(), 48);
        assert_eq!(metadata[0].external_ref, ExternalRef::Tagged("tt0114709".to_string()));
        assert_eq!(metadata[0].budget.as_deref(), Some("5000000"));
        assert_eq!(metadata[13].revenue, None);
        assert!(matches!(metadata[0].genres, Some(RawGenres::Structured(_))));
    }

    #[test]
    fn test_missing_column() {
        let movies = "movieId,name\n1,Heat\n";
        let links = "movieId,imdbId\n1,113277\n";
        let err = load_movies(movies.as_bytes(), links.as_bytes()).unwrap_err();
        assert!(matches!(err, PlannerError::DataSource(ref m) if m.contains("'title'")));

        let metadata = "imdb_id,budget,revenue,genres\ntt1,1,1,[]\n";
        assert!(matches!(load_metadata(metadata.as_bytes()), Err(PlannerError::DataSource(_))));
    }

    #[test]
    fn test_missing_source() {
        assert!(matches!(
            open_source("resources/does_not_exist.csv"),
            Err(PlannerError::DataSource(_))
        ));
    }

    #[test]
    fn test_short_rows_and_first_link_wins() {
        let movies = "movieId,title,genres\n1,Heat (1995)\n2,Casino (1995),Crime|Drama\n";
        let links = "movieId,imdbId\n1,113277\n1,999\n";
        let records = load_movies(movies.as_bytes(), links.as_bytes()).unwrap().records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].genres, RawGenres::Delimited(String::new()));
        assert_eq!(records[0].external_ref, Some(ExternalRef::Numeric(113277)));
        assert_eq!(records[1].external_ref, None);
    }

    #[test]
    fn test_invalid_utf8_rows_are_skipped() {
        let mut metadata = b"imdb_id,budget,release_date,revenue,genres\n".to_vec();
        metadata.extend_from_slice(b"tt0113277,60000000,1995-12-15,187436818,[]\n");
        metadata.extend_from_slice(b"tt0112641,52000000,1995-11-22,116112375,\xff\n");
        metadata.extend_from_slice(b"tt0114709,30000000,1995-10-30,373554033,[]\n");
        let out = load_metadata(metadata.as_slice()).unwrap();
        assert_eq!(out.malformed, 1);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[1].external_ref, ExternalRef::Tagged("tt0114709".to_string()));

        let mut movies = b"movieId,title,genres\n1,Heat (1995),Crime\n".to_vec();
        movies.extend_from_slice(b"2,Casino \xfe(1995),Crime|Drama\nx,Bad id,Drama\n");
        let links = b"movieId,imdbId\n1,113277\n\xff,1\n";
        let out = load_movies(movies.as_slice(), links.as_slice()).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.malformed, 2);
        assert_eq!(out.invalid_id, 1);
        assert_eq!(out.records[0].external_ref, Some(ExternalRef::Numeric(113277)));
    }
}
