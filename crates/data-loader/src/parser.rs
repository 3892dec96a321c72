//! Parser for the catalog CSV file.
//!
//! The file is a standard comma-separated export with a header row and
//! quoted fields (cast lists and genre listings contain commas).
//! Only the columns in [`REQUIRED_COLUMNS`] are needed; everything else
//! in the header is ignored.
//!
//! Rust concepts you'll learn here:
//! - Using the `csv` crate with serde for typed records
//! - Error handling with `?` operator and `From` conversions
//! - Converting between types (parsing strings to numbers)

use crate::error::{DataLoadError, Result};
use crate::types::RawRecord;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::debug;

/// Columns the feature builder depends on
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "type",
    "director",
    "cast",
    "country",
    "rating",
    "duration",
    "listed_in",
    "release_year",
];

/// Parse the catalog CSV at `path` into raw records.
///
/// A missing file is reported as [`DataLoadError::FileNotFound`] so callers
/// can tell it apart from a malformed file.
pub fn parse_catalog(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    parse_reader(BufReader::new(file), &path.display().to_string())
}

/// Parse catalog records from any reader.
///
/// `source` is only used in error messages.
pub fn parse_reader<R: Read>(reader: R, source: &str) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Validate the header before touching any rows
    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataLoadError::MissingColumn {
                file: source.to_string(),
                column: column.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for result in rdr.deserialize::<RawRecord>() {
        records.push(result?);
    }

    debug!("Parsed {} records from {}", records.len(), source);
    Ok(records)
}

/// Parse a release year cell.
///
/// Accepts plain integers and float-formatted integers ("2019.0"),
/// which some spreadsheet exports produce.
pub fn parse_release_year(value: &str, row: usize) -> Result<i32> {
    let trimmed = value.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Ok(year);
    }
    match trimmed.parse::<f64>() {
        Ok(year) if year.fract() == 0.0 => Ok(year as i32),
        _ => Err(DataLoadError::InvalidValue {
            field: "release_year".to_string(),
            row,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description
s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,,United States,\"September 25, 2021\",2020,PG-13,90 min,Documentaries,\"A father, a daughter.\"
s2,TV Show,Blood & Water,,\"Ama Qamata, Khosi Ngema\",South Africa,\"September 24, 2021\",2021,TV-MA,2 Seasons,\"International TV Shows, TV Dramas, TV Mysteries\",Teens.
";

    #[test]
    fn test_parse_quoted_fields() {
        let records = parse_reader(SAMPLE.as_bytes(), "sample.csv").unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.content_type.as_deref(), Some("Movie"));
        assert_eq!(first.director.as_deref(), Some("Kirsten Johnson"));
        assert_eq!(first.duration.as_deref(), Some("90 min"));

        let second = &records[1];
        assert_eq!(second.cast.as_deref(), Some("Ama Qamata, Khosi Ngema"));
        assert_eq!(
            second.listed_in.as_deref(),
            Some("International TV Shows, TV Dramas, TV Mysteries")
        );
    }

    #[test]
    fn test_empty_cells_are_none() {
        let records = parse_reader(SAMPLE.as_bytes(), "sample.csv").unwrap();
        assert!(records[0].cast.is_none());
        assert!(records[1].director.is_none());
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "type,director,cast,country,rating,duration,release_year\nMovie,a,b,c,R,90 min,2020\n";
        let err = parse_reader(csv.as_bytes(), "broken.csv").unwrap_err();
        match err {
            DataLoadError::MissingColumn { column, .. } => assert_eq!(column, "listed_in"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = parse_catalog(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_release_year() {
        assert_eq!(parse_release_year("2019", 1).unwrap(), 2019);
        assert_eq!(parse_release_year("2019.0", 1).unwrap(), 2019);
        assert!(parse_release_year("soon", 1).is_err());
    }
}
