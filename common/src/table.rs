use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::NS_PER_MS;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Read benchmark table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse benchmark table: {0}")]
    Parse(#[from] csv::Error),
}

/// One benchmark trial. The `_op` columns come from the results file as
/// nanoseconds per operation; the `_ms` columns are filled by
/// [`BenchTable::derive_millis`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchRecord {
    pub row_count: u64,
    pub direct_upsert_op: f64,
    pub staging_copy_op: f64,
    #[serde(skip_deserializing)]
    pub direct_upsert_ms: f64,
    #[serde(skip_deserializing)]
    pub staging_copy_ms: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BenchTable {
    pub records: Vec<BenchRecord>,
}

impl BenchTable {
    /// Loads the whole results file into memory, keeping source row order.
    /// Columns beyond the three named ones are ignored.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);
        let records = reader
            .deserialize()
            .collect::<Result<Vec<BenchRecord>, _>>()?;
        debug!("Loaded {} benchmark rows from {}", records.len(), path.display());
        Ok(Self { records })
    }

    /// Appends the derived millisecond columns, ns/op -> ms/op.
    pub fn derive_millis(&mut self) {
        for record in &mut self.records {
            record.direct_upsert_ms = record.direct_upsert_op / NS_PER_MS;
            record.staging_copy_ms = record.staging_copy_op / NS_PER_MS;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn table_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_in_source_order() {
        let file = table_file(
            "row_count,direct_upsert_op,staging_copy_op\n\
             100,500000,1200000\n\
             1000,520000,1300000\n\
             10000,600000,1500000\n",
        );
        let table = BenchTable::from_csv(file.path()).unwrap();
        assert_eq!(
            table.records.iter().map(|r| r.row_count).collect::<Vec<_>>(),
            vec![100, 1000, 10000]
        );
        assert_eq!(table.records[0].direct_upsert_op, 500000.0);
        assert_eq!(table.records[2].staging_copy_op, 1500000.0);
    }

    #[test]
    fn derive_millis_converts_exactly() {
        let file = table_file(
            "row_count,direct_upsert_op,staging_copy_op\n\
             100,500000,1200000\n\
             1000,520000,1300000\n\
             10000,600000,1500000\n",
        );
        let mut table = BenchTable::from_csv(file.path()).unwrap();
        table.derive_millis();
        let direct: Vec<f64> = table.records.iter().map(|r| r.direct_upsert_ms).collect();
        let staging: Vec<f64> = table.records.iter().map(|r| r.staging_copy_ms).collect();
        assert_eq!(direct, vec![0.5, 0.52, 0.6]);
        assert_eq!(staging, vec![1.2, 1.3, 1.5]);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let file = table_file(
            "row_count,direct_upsert_op,staging_copy_op,allocs_per_op\n\
             100,500000,1200000,42\n",
        );
        let table = BenchTable::from_csv(file.path()).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].row_count, 100);
    }

    #[test]
    fn missing_column_is_a_parse_error() {
        let file = table_file(
            "row_count,direct_upsert_op\n\
             100,500000\n",
        );
        let err = BenchTable::from_csv(file.path()).unwrap_err();
        assert!(matches!(err, TableError::Parse(_)), "{err}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = BenchTable::from_csv("no/such/data.csv").unwrap_err();
        assert!(matches!(err, TableError::Io(_)), "{err}");
    }

    #[test]
    fn header_only_file_loads_empty() {
        let file = table_file("row_count,direct_upsert_op,staging_copy_op\n");
        let table = BenchTable::from_csv(file.path()).unwrap();
        assert!(table.records.is_empty());
    }

    #[test]
    fn derived_columns_default_to_zero_before_derive() {
        let file = table_file(
            "row_count,direct_upsert_op,staging_copy_op\n\
             100,500000,1200000\n",
        );
        let table = BenchTable::from_csv(file.path()).unwrap();
        assert_eq!(table.records[0].direct_upsert_ms, 0.0);
        assert_eq!(table.records[0].staging_copy_ms, 0.0);
    }
}
