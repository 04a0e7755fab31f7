use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Feature – the seven named model inputs
// ---------------------------------------------------------------------------

/// Name of the categorical label column.
pub const CROP_COLUMN: &str = "Crop";

/// One of the seven numeric columns the recommender consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    PhValue,
    Rainfall,
}

impl Feature {
    /// All features in model input order.
    pub const ALL: [Feature; 7] = [
        Feature::Nitrogen,
        Feature::Phosphorus,
        Feature::Potassium,
        Feature::Temperature,
        Feature::Humidity,
        Feature::PhValue,
        Feature::Rainfall,
    ];

    /// Exact column name in the CSV file and in the model artifact.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::Nitrogen => "Nitrogen",
            Feature::Phosphorus => "Phosphorus",
            Feature::Potassium => "Potassium",
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::PhValue => "pH_Value",
            Feature::Rainfall => "Rainfall",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Feature::PhValue => "pH Value",
            other => other.column_name(),
        }
    }

    /// Soil nutrients are integer ppm readings; everything else is real-valued.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Feature::Nitrogen | Feature::Phosphorus | Feature::Potassium
        )
    }

    /// Caption of the input slider in the recommendation view.
    pub fn slider_text(self) -> String {
        match self {
            Feature::PhValue => "Select pH Value".to_string(),
            other => format!("Select {} value", other.label()),
        }
    }

    /// Slider step for this feature.
    pub fn step(self) -> f64 {
        if self.is_integer() {
            1.0
        } else {
            0.1
        }
    }

    pub fn index(self) -> usize {
        Feature::ALL
            .iter()
            .position(|f| *f == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Cells read as "no label" (empty or one of the usual NA spellings).
pub fn is_missing_label(label: &str) -> bool {
    matches!(
        label.trim(),
        "" | "NA" | "N/A" | "NaN" | "nan" | "null" | "None"
    )
}

// ---------------------------------------------------------------------------
// Column – one typed column of the table
// ---------------------------------------------------------------------------

/// Column storage, typed by what every cell of the column parsed as.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<i64>),
    /// Empty cells are stored as NaN.
    Float(Vec<f64>),
    Text(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Infer the column type from its raw cells.
    ///
    /// * the crop label column → `Text`, whatever its cells look like
    /// * every cell is an integer → `Integer`
    /// * every non-empty cell is a number → `Float` (empty → NaN)
    /// * otherwise → `Text`
    pub fn infer(name: &str, cells: Vec<String>) -> Self {
        let data = if name == CROP_COLUMN {
            ColumnData::Text(cells)
        } else if !cells.is_empty() && cells.iter().all(|c| c.trim().parse::<i64>().is_ok()) {
            ColumnData::Integer(
                cells
                    .iter()
                    .filter_map(|c| c.trim().parse::<i64>().ok())
                    .collect(),
            )
        } else if cells.iter().any(|c| !c.trim().is_empty())
            && cells.iter().all(|c| {
                let c = c.trim();
                c.is_empty() || c.parse::<f64>().is_ok()
            })
        {
            ColumnData::Float(
                cells
                    .iter()
                    .map(|c| c.trim().parse::<f64>().unwrap_or(f64::NAN))
                    .collect(),
            )
        } else {
            ColumnData::Text(cells)
        };
        Column {
            name: name.to_string(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    /// Numeric view of the column; `None` for text columns.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match &self.data {
            ColumnData::Integer(v) => Some(v.iter().map(|&i| i as f64).collect()),
            ColumnData::Float(v) => Some(v.clone()),
            ColumnData::Text(_) => None,
        }
    }

    /// Cell rendered for the table view.
    pub fn cell_text(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Integer(v) => v.get(row).map(|i| i.to_string()),
            ColumnData::Float(v) => v.get(row).map(|f| {
                if f.is_nan() {
                    "NaN".to_string()
                } else {
                    format!("{f:.4}")
                }
            }),
            ColumnData::Text(v) => v.get(row).cloned(),
        }
        .unwrap_or_default()
    }

    /// Text view of the column, used for the categorical label.
    pub fn as_labels(&self) -> Vec<String> {
        (0..self.len()).map(|row| self.cell_text(row)).collect()
    }
}

// ---------------------------------------------------------------------------
// Schema – which of the expected columns are present
// ---------------------------------------------------------------------------

/// The expected columns absent from a loaded table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required columns: {}", .columns.join(", "))]
pub struct MissingColumns {
    pub columns: Vec<String>,
}

/// Result of checking a table against the fixed crop schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    pub missing_features: BTreeSet<Feature>,
    pub has_crop: bool,
}

impl SchemaReport {
    /// Error naming every absent feature column, if any.
    pub fn require_features(&self) -> Result<(), MissingColumns> {
        if self.missing_features.is_empty() {
            Ok(())
        } else {
            Err(MissingColumns {
                columns: self
                    .missing_features
                    .iter()
                    .map(|f| f.column_name().to_string())
                    .collect(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// RecordTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded dataset, stored column-wise in file order.
#[derive(Debug, Clone)]
pub struct RecordTable {
    columns: Vec<Column>,
    rows: usize,
    schema: SchemaReport,
}

impl RecordTable {
    /// Build the table and its schema report. All columns must share a length.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let missing_features = Feature::ALL
            .into_iter()
            .filter(|f| !columns.iter().any(|c| c.name == f.column_name()))
            .collect();
        let has_crop = columns.iter().any(|c| c.name == CROP_COLUMN);
        RecordTable {
            columns,
            rows,
            schema: SchemaReport {
                missing_features,
                has_crop,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn schema(&self) -> &SchemaReport {
        &self.schema
    }

    /// Numeric values of a feature column, `None` when absent or non-numeric.
    pub fn feature_values(&self, feature: Feature) -> Option<Vec<f64>> {
        self.column(feature.column_name()).and_then(Column::as_f64)
    }

    /// Raw crop cells, `None` when the column is absent. Missing labels are
    /// kept in place so the result lines up with the feature columns.
    pub fn crop_labels(&self) -> Option<Vec<String>> {
        self.column(CROP_COLUMN).map(Column::as_labels)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a table from `(name, cells)` pairs.
    pub fn table(cols: &[(&str, &[&str])]) -> RecordTable {
        RecordTable::from_columns(
            cols.iter()
                .map(|(name, cells)| {
                    Column::infer(name, cells.iter().map(|c| c.to_string()).collect())
                })
                .collect(),
        )
    }

    /// A small table carrying the full crop schema.
    pub fn crop_table() -> RecordTable {
        table(&[
            ("Nitrogen", &["90", "85", "60", "74", "78"]),
            ("Phosphorus", &["42", "58", "55", "35", "42"]),
            ("Potassium", &["43", "41", "44", "40", "42"]),
            ("Temperature", &["20.87", "21.77", "23.00", "26.49", "20.13"]),
            ("Humidity", &["82.00", "80.31", "82.32", "80.15", "81.60"]),
            ("pH_Value", &["6.50", "7.03", "7.84", "6.98", "7.62"]),
            ("Rainfall", &["202.93", "226.65", "263.96", "242.86", "262.71"]),
            ("Crop", &["Rice", "Rice", "Maize", "Wheat", "Rice"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn column_types_are_inferred_from_cells() {
        let t = table(&[
            ("a", &["1", "2"]),
            ("b", &["1.5", ""]),
            ("c", &["x", "2"]),
        ]);
        assert!(matches!(t.column("a").unwrap().data, ColumnData::Integer(_)));
        match &t.column("b").unwrap().data {
            ColumnData::Float(v) => {
                assert_eq!(v[0], 1.5);
                assert!(v[1].is_nan());
            }
            other => panic!("expected float column, got {other:?}"),
        }
        assert!(t.column("c").unwrap().as_f64().is_none());
    }

    #[test]
    fn schema_report_lists_missing_features() {
        let t = table(&[("Nitrogen", &["1"]), ("Temperature", &["2.0"])]);
        let report = t.schema();
        assert!(!report.has_crop);
        assert_eq!(report.missing_features.len(), 5);
        let err = report.require_features().unwrap_err();
        assert_eq!(
            err.columns,
            vec!["Phosphorus", "Potassium", "Humidity", "pH_Value", "Rainfall"]
        );
        assert!(err.to_string().contains("pH_Value"));
    }

    #[test]
    fn full_schema_passes() {
        let t = crop_table();
        assert!(t.schema().has_crop);
        assert!(t.schema().require_features().is_ok());
        assert_eq!(t.len(), 5);
        assert_eq!(t.column_names().last(), Some(&"Crop"));
    }

    #[test]
    fn feature_names_match_dataset_columns() {
        let names: Vec<_> = Feature::ALL.iter().map(|f| f.column_name()).collect();
        assert_eq!(
            names,
            [
                "Nitrogen",
                "Phosphorus",
                "Potassium",
                "Temperature",
                "Humidity",
                "pH_Value",
                "Rainfall"
            ]
        );
        assert_eq!(Feature::PhValue.label(), "pH Value");
        assert_eq!(Feature::Rainfall.index(), 6);
        assert_eq!(Feature::Potassium.step(), 1.0);
        assert_eq!(Feature::Humidity.step(), 0.1);
    }

    #[test]
    fn slider_text_names_each_feature() {
        assert_eq!(Feature::Nitrogen.slider_text(), "Select Nitrogen value");
        assert_eq!(Feature::Rainfall.slider_text(), "Select Rainfall value");
        assert_eq!(Feature::PhValue.slider_text(), "Select pH Value");
    }

    #[test]
    fn crop_column_is_never_numeric() {
        let t = table(&[("Crop", &["1", "1", "", "2"])]);
        assert!(matches!(t.column("Crop").unwrap().data, ColumnData::Text(_)));
        assert_eq!(t.crop_labels().unwrap(), vec!["1", "1", "", "2"]);
        assert_eq!(t.column("Crop").unwrap().cell_text(0), "1");
    }

    #[test]
    fn missing_labels_are_recognised() {
        assert!(is_missing_label(""));
        assert!(is_missing_label("NaN"));
        assert!(is_missing_label(" NA "));
        assert!(!is_missing_label("Rice"));
        assert!(!is_missing_label("1"));
    }
}
