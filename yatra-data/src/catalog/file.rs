use camino::Utf8Path;
use yatra_core::RawWaypointRecord;

use super::CatalogError;

/// Load a catalog exported as a JSON array of records.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] when the file cannot be read and
/// [`CatalogError::Decode`] when it is not a JSON array of records.
pub fn read_catalog(path: &Utf8Path) -> Result<Vec<RawWaypointRecord>, CatalogError> {
    let text = yatra_fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<RawWaypointRecord> =
        serde_json::from_str(&text).map_err(|err| CatalogError::Decode {
            origin: path.to_string(),
            message: err.to_string(),
        })?;
    log::debug!("loaded {} catalog records from {path}", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[fixture]
    fn catalog_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(
            br#"[
                {"id": 2, "name": "Simhachalam", "latitude": "17.7665", "longitude": 83.2505,
                 "dtname": "Visakhapatnam", "god_categy": "Vishnu"},
                {"id": 1, "name": "Kanaka Durga", "latitude": 16.5158, "longitude": 80.6050,
                 "dtname": "Krishna", "god_categy": "Shakti"}
            ]"#,
        )
        .expect("write fixture");
        file
    }

    fn utf8(file: &NamedTempFile) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(file.path().to_path_buf()).expect("UTF-8 temp path")
    }

    #[rstest]
    fn reads_records_in_file_order(catalog_file: NamedTempFile) {
        let records = read_catalog(&utf8(&catalog_file)).expect("valid catalog");

        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
        let first = records.first().expect("two records");
        assert_eq!(first.district.as_deref(), Some("Visakhapatnam"));
        assert_eq!(first.deity_category.as_deref(), Some("Vishnu"));
    }

    #[rstest]
    fn missing_file_is_an_io_error() {
        let err = read_catalog(Utf8Path::new("/nonexistent/yatra/catalog.json"))
            .expect_err("no such file");
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[rstest]
    fn malformed_json_is_a_decode_error() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(br#"{"id": 1}"#).expect("write fixture");

        let err = read_catalog(&utf8(&file)).expect_err("not an array");

        assert!(matches!(err, CatalogError::Decode { .. }));
    }
}
