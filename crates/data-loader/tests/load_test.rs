//! Loading a catalog file from disk end to end.

use data_loader::{Catalog, DataLoadError, NullableColumn};
use std::io::Write;
use tempfile::NamedTempFile;

const CATALOG: &str = "\
show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description
s1,Movie,Alpha,Jane Roe,\"Ann Lee, Bo Kim\",United States,\"May 1, 2021\",2020,PG-13,90 min,\"Comedies, Dramas\",x
s2,TV Show,Beta,,Cy Ray,India,\"May 2, 2021\",2019,TV-MA,2 Seasons,International TV Shows,y
s3,Movie,Gamma,Jane Roe,,,\"May 3, 2021\",2018,,100 min,Horror Movies,z
";

fn write_catalog(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[test]
fn test_load_from_file_imputes_missing_cells() {
    let file = write_catalog(CATALOG);
    let catalog = Catalog::load_from_file(file.path()).unwrap();

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.source(), file.path());

    let rows = catalog.rows();
    assert_eq!(rows[1].director, "Jane Roe");
    // "Ann Lee, Bo Kim" and "Cy Ray" tie; the smaller value wins
    assert_eq!(rows[2].cast, "Ann Lee, Bo Kim");
    assert_eq!(rows[2].country, "India");
    assert_eq!(rows[2].rating, "PG-13");

    let rating = catalog.imputation(NullableColumn::Rating).unwrap();
    assert_eq!(rating.filled, 1);
}

#[test]
fn test_load_missing_file() {
    let err = Catalog::load_from_file(std::path::Path::new("no/such/catalog.csv")).unwrap_err();
    assert!(matches!(err, DataLoadError::FileNotFound { .. }));
}

#[test]
fn test_load_header_only_file_is_empty_error() {
    let file = write_catalog(
        "type,title,director,cast,country,release_year,rating,duration,listed_in\n",
    );
    let err = Catalog::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, DataLoadError::Empty(_)));
}
