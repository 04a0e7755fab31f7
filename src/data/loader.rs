use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{Column, RecordTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the crop dataset from a comma-separated file with a header row.
///
/// Every header becomes a column; types are inferred per column
/// (see [`Column::infer`]). Ragged rows and unreadable files are errors.
pub fn load_csv(path: &Path) -> Result<RecordTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening dataset {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        bail!("{}: CSV has no header row", path.display());
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(value.to_string());
        }
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, values)| Column::infer(name, values))
        .collect();

    Ok(RecordTable::from_columns(columns))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::{ColumnData, Feature};

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_crop_csv() {
        let file = write_csv(
            "Nitrogen,Phosphorus,Potassium,Temperature,Humidity,pH_Value,Rainfall,Crop\n\
             90,42,43,20.88,82.00,6.50,202.94,Rice\n\
             85,58,41,21.77,80.32,7.04,226.66,Maize\n",
        );
        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.schema().require_features().is_ok());
        assert!(table.schema().has_crop);
        assert!(matches!(
            table.column("Nitrogen").unwrap().data,
            ColumnData::Integer(_)
        ));
        assert_eq!(
            table.feature_values(Feature::Rainfall).unwrap(),
            vec![202.94, 226.66]
        );
        assert_eq!(table.crop_labels().unwrap(), vec!["Rice", "Maize"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("opening dataset"));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let file = write_csv("a,b\n1,2\n3\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 1"));
    }

    #[test]
    fn missing_crop_column_still_loads() {
        let file = write_csv("Temperature,Humidity\n20.5,80.1\n");
        let table = load_csv(file.path()).unwrap();
        assert!(!table.schema().has_crop);
        assert!(table.crop_labels().is_none());
    }
}
