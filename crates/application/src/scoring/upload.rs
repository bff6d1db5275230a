use crate::{ApplicationError, ApplicationResult};
use std::collections::BTreeMap;

/// One uploaded row: column name to raw cell value.
pub type UploadRow = BTreeMap<String, String>;

/// Parse an uploaded CSV file into rows.
///
/// The first record is the header. Empty cells become empty strings. A file
/// that is not CSV, has no header, or has no data rows is rejected.
pub fn parse_upload(contents: &[u8]) -> ApplicationResult<Vec<UploadRow>> {
    let invalid = |err: csv::Error| {
        ApplicationError::ValidationFailed(format!("Upload is not a valid CSV file: {err}"))
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(contents);

    let headers = reader.headers().map_err(invalid)?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(ApplicationError::ValidationFailed(
            "Upload has no header row".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(invalid)?;
        let row: UploadRow = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ApplicationError::ValidationFailed(
            "Upload contains no rows".to_string(),
        ));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let rows = parse_upload(b"question, gpt_fluency\nhi,4\n\"a, b\",\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["question"], "hi");
        assert_eq!(rows[0]["gpt_fluency"], "4");
        assert_eq!(rows[1]["question"], "a, b");
        assert_eq!(rows[1]["gpt_fluency"], "");
    }

    #[test]
    fn test_empty_upload_rejected() {
        assert!(matches!(parse_upload(b""), Err(ApplicationError::ValidationFailed(_))));
    }

    #[test]
    fn test_header_only_rejected() {
        let err = parse_upload(b"a,b\n").unwrap_err();
        assert_eq!(err.to_string(), "Upload contains no rows");
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(matches!(
            parse_upload(b"a,b\n1,2,3\n"),
            Err(ApplicationError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert!(parse_upload(b"a,b\n\xff\xfe,1\n").is_err());
    }
}
