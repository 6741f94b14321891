//! Dataset types for dq-agent.
//!
//! Provides [`OrderDataset`], an in-memory snapshot of one day's order
//! records loaded from a delimited text file. Every cell is kept as its
//! original string so reports can show exactly what was in the file;
//! numeric and date views are derived later, per cell, by the detectors.

use std::{
    io::{Read, Seek, SeekFrom},
    path::Path,
    sync::Arc,
};

use arrow::{
    array::{Array, RecordBatch, StringArray},
    datatypes::{DataType, Field, Schema, SchemaRef},
};

use crate::error::{Error, Result};

/// An in-memory dataset backed by Arrow RecordBatches with text columns.
///
/// The dataset is immutable once loaded: detectors only read from it, so a
/// check run is free to evaluate them in any order. Row indices are
/// positional within the original file (0 = first data row) and every
/// finding produced from this dataset refers back to one of them.
///
/// # Example
///
/// ```no_run
/// use dq_agent::OrderDataset;
///
/// let dataset = OrderDataset::from_csv("data/sales_2025_10_25.csv").unwrap();
/// println!("{} rows, {} columns", dataset.len(), dataset.column_names().len());
/// ```
#[derive(Debug, Clone)]
pub struct OrderDataset {
    batches: Vec<RecordBatch>,
    schema: SchemaRef,
    row_count: usize,
}

impl OrderDataset {
    /// Creates a dataset from already-built RecordBatches.
    ///
    /// All batches must share one schema and every column must be `Utf8`;
    /// the loader guarantees this, direct callers have to as well.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch list is empty, schemas disagree, or a
    /// column is not a text column.
    pub fn new(batches: Vec<RecordBatch>) -> Result<Self> {
        if batches.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let schema = batches[0].schema();
        Self::from_parts(schema, batches)
    }

    pub(crate) fn from_parts(schema: SchemaRef, batches: Vec<RecordBatch>) -> Result<Self> {
        if schema.fields().is_empty() || schema.fields().iter().all(|f| f.name().trim().is_empty())
        {
            return Err(Error::MissingHeader);
        }
        for field in schema.fields() {
            if field.data_type() != &DataType::Utf8 {
                return Err(Error::Format(format!(
                    "column '{}' is not a text column",
                    field.name()
                )));
            }
        }
        for (i, batch) in batches.iter().enumerate() {
            if batch.schema() != schema {
                return Err(Error::Format(format!(
                    "batch {} has a different schema than the header",
                    i
                )));
            }
        }

        let row_count = batches.iter().map(|b| b.num_rows()).sum();

        Ok(Self {
            batches,
            schema,
            row_count,
        })
    }

    /// Loads a dataset from a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or has no usable
    /// header. Malformed cell values are not errors; they surface later as
    /// findings or as exclusions from numeric computations.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_csv_with_options(path, CsvOptions::default())
    }

    /// Loads a dataset from a CSV file with options.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or has no usable
    /// header.
    pub fn from_csv_with_options(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        Self::load_csv(std::io::BufReader::new(file), &options)
    }

    /// Loads a dataset from a CSV string. Mostly useful in tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the string has no usable header.
    pub fn from_csv_str(data: &str) -> Result<Self> {
        Self::load_csv(std::io::Cursor::new(data.as_bytes()), &CsvOptions::default())
    }

    fn load_csv<R: Read + Seek>(mut reader: R, options: &CsvOptions) -> Result<Self> {
        use arrow_csv::{reader::Format, ReaderBuilder};

        // Infer only the header names; the value schema is forced to text so
        // the original string of every cell survives for the report layer.
        let mut format = Format::default()
            .with_header(true)
            .with_truncated_rows(true);
        if let Some(delim) = options.delimiter {
            format = format.with_delimiter(delim);
        }
        let (inferred, _) = format
            .infer_schema(&mut reader, Some(1000))
            .map_err(Error::Arrow)?;
        if inferred.fields().is_empty() {
            return Err(Error::MissingHeader);
        }

        let fields: Vec<Field> = inferred
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect();
        let schema = Arc::new(Schema::new(fields));

        reader
            .seek(SeekFrom::Start(0))
            .map_err(Error::io_no_path)?;

        let mut builder = ReaderBuilder::new(schema.clone())
            .with_header(true)
            .with_batch_size(options.batch_size)
            .with_truncated_rows(true);
        if let Some(delim) = options.delimiter {
            builder = builder.with_delimiter(delim);
        }

        let csv_reader = builder.build(reader).map_err(Error::Arrow)?;
        let batches: Vec<RecordBatch> = csv_reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Arrow)?;

        // A header with zero data rows is a valid (empty) dataset, not an
        // error: the run still completes and reports zero findings.
        Self::from_parts(schema, batches)
    }

    /// Returns the total number of data rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    /// Returns true if the dataset contains no data rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Returns the schema of the dataset.
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Returns the column names in file order.
    pub fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Returns the index of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema
            .fields()
            .iter()
            .position(|f| f.name() == name)
    }

    /// Returns all values of one column in row order.
    ///
    /// `None` marks a missing cell: either a null from a truncated row or
    /// an empty/whitespace-only string. Present values keep their original,
    /// untrimmed text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] if the column does not exist.
    pub fn column_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| Error::column_not_found(name))?;

        let mut values = Vec::with_capacity(self.row_count);
        for batch in &self.batches {
            let array = batch
                .column(idx)
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| {
                    Error::Format(format!("column '{}' is not a text column", name))
                })?;
            for i in 0..array.len() {
                if array.is_null(i) || array.value(i).trim().is_empty() {
                    values.push(None);
                } else {
                    values.push(Some(array.value(i).to_string()));
                }
            }
        }
        Ok(values)
    }

    /// Returns one row as ordered `(column, raw value)` pairs.
    ///
    /// Unlike [`Self::column_values`], nothing is normalized here: a null
    /// cell becomes an empty string and original text is kept verbatim,
    /// because this is what the report layer displays.
    pub fn row(&self, index: usize) -> Option<Vec<(String, String)>> {
        if index >= self.row_count {
            return None;
        }

        let mut offset = index;
        for batch in &self.batches {
            if offset < batch.num_rows() {
                let mut fields = Vec::with_capacity(batch.num_columns());
                for (col_idx, field) in self.schema.fields().iter().enumerate() {
                    let value = batch
                        .column(col_idx)
                        .as_any()
                        .downcast_ref::<StringArray>()
                        .map(|arr| {
                            if arr.is_null(offset) {
                                String::new()
                            } else {
                                arr.value(offset).to_string()
                            }
                        })
                        .unwrap_or_default();
                    fields.push((field.name().clone(), value));
                }
                return Some(fields);
            }
            offset -= batch.num_rows();
        }
        None
    }
}

/// Options for CSV parsing.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: comma).
    pub delimiter: Option<u8>,
    /// Rows per RecordBatch (default: 8192).
    pub batch_size: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            batch_size: 8192,
        }
    }
}

impl CsvOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Sets the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
order_id,order_date,quantity
1001,2025-10-25,2
1002,2025/10/25,x
1003,,
";

    #[test]
    fn test_from_csv_str() {
        let ds = OrderDataset::from_csv_str(SAMPLE).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(!ds.is_empty());
        assert_eq!(ds.column_names(), vec!["order_id", "order_date", "quantity"]);
    }

    #[test]
    fn test_raw_values_preserved() {
        let ds = OrderDataset::from_csv_str(SAMPLE).unwrap();
        let row = ds.row(1).unwrap();
        assert_eq!(row[1], ("order_date".to_string(), "2025/10/25".to_string()));
        assert_eq!(row[2], ("quantity".to_string(), "x".to_string()));
        assert!(ds.row(3).is_none());
    }

    #[test]
    fn test_column_values_normalizes_missing() {
        let ds = OrderDataset::from_csv_str(SAMPLE).unwrap();
        let dates = ds.column_values("order_date").unwrap();
        assert_eq!(dates[0].as_deref(), Some("2025-10-25"));
        assert!(dates[2].is_none());

        // Whitespace-only counts as missing too.
        let quantities = ds.column_values("quantity").unwrap();
        assert!(quantities[2].is_none());
    }

    #[test]
    fn test_column_not_found() {
        let ds = OrderDataset::from_csv_str(SAMPLE).unwrap();
        let err = ds.column_values("nope").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { .. }));
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let ds = OrderDataset::from_csv_str("order_id,quantity\n").unwrap();
        assert_eq!(ds.len(), 0);
        assert!(ds.is_empty());
        assert_eq!(ds.column_names().len(), 2);
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(OrderDataset::from_csv_str("").is_err());
    }

    #[test]
    fn test_from_csv_missing_file() {
        let err = OrderDataset::from_csv("/nonexistent/path/sales.csv").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_custom_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("semi.csv");
        std::fs::write(&path, "a;b\n1;2\n").unwrap();

        let ds =
            OrderDataset::from_csv_with_options(&path, CsvOptions::new().with_delimiter(b';'))
                .unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b"]);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_truncated_row_becomes_missing() {
        let ds = OrderDataset::from_csv_str("a,b,c\n1,2,3\n4,5\n").unwrap();
        assert_eq!(ds.len(), 2);
        let c = ds.column_values("c").unwrap();
        assert_eq!(c[0].as_deref(), Some("3"));
        assert!(c[1].is_none());
    }
}
