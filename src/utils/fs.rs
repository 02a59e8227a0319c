//! IO helpers: read the document from a file or from standard input

use std::{fs::File, io::BufReader, path::Path};

use serde_json::Value;

use crate::model::data_core::AppError;

/// Read and parse a JSON document from a file.
pub fn read_json_file(p: &Path) -> Result<Value, AppError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: Value = serde_json::from_reader(rdr)?;
    Ok(v)
}

/// Read and parse a JSON document from stdin (consumed to EOF).
pub fn read_json_stdin() -> Result<Value, AppError> {
    let stdin = std::io::stdin();
    let v: Value = serde_json::from_reader(stdin.lock())?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn reads_valid_json() {
        let file = json_file(r#"{"name": "test", "value": 42}"#);
        let v = read_json_file(file.path()).unwrap();
        assert_eq!(v["name"], "test");
        assert_eq!(v["value"], 42);
    }

    #[test]
    fn rejects_invalid_json() {
        let file = json_file(r#"{"invalid": json content}"#);
        assert!(matches!(read_json_file(file.path()), Err(AppError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_json_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
