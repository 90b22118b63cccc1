#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use mapping_ledger::{MappingColumn, MappingRecord, MappingStatus};
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Copies a fixture from `tests/data` into the workspace so it can be rewritten.
    pub fn copy_fixture(&self, name: &str) -> PathBuf {
        let contents = std::fs::read_to_string(fixture_path(name)).expect("read fixture");
        self.write(name, &contents)
    }
}

/// Builds a column from `MALCODE.table.column`.
pub fn column(qualified: &str) -> MappingColumn {
    let mut parts = qualified.splitn(3, '.');
    let malcode = parts.next().unwrap_or_default();
    let table = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();
    MappingColumn::new(malcode, table, name, "string")
}

/// A draft mapping between two `MALCODE.table.column` references.
pub fn mapping(id: &str, source: &str, target: &str, transformation: Option<&str>) -> MappingRecord {
    let record = MappingRecord::new(id, column(source), column(target));
    match transformation {
        Some(expr) => record.with_transformation(expr),
        None => record,
    }
}

/// Twelve rows spread over two pods and all four statuses.
pub fn sample_rows() -> Vec<MappingRecord> {
    let statuses = [
        MappingStatus::Approved,
        MappingStatus::Pending,
        MappingStatus::Rejected,
        MappingStatus::Draft,
    ];
    (0..12)
        .map(|i| {
            let table = if i % 2 == 0 { "customer" } else { "orders" };
            let pod = if i % 3 == 0 { "Pod: Finance" } else { "Pod: Growth" };
            let transformation = (i % 4 != 0).then(|| format!("TRIM(col_{i:02})"));
            let record = mapping(
                &format!("m-{i:02}"),
                &format!("CRM_001.{table}.col_{i:02}"),
                &format!("DW_010.dim_{table}.attr_{i:02}"),
                transformation.as_deref(),
            );
            record
                .with_status(statuses[i % 4])
                .with_comment("Reviewed in sprint 4")
                .with_comment(pod)
        })
        .collect()
}

pub fn ids<'a>(rows: impl IntoIterator<Item = &'a MappingRecord>) -> Vec<String> {
    rows.into_iter().map(|row| row.id.clone()).collect()
}
