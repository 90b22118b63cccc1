//! Queryable mapping columns and the accessor seam used by filtering and sorting.
//!
//! The query engine never reaches into a record directly. It asks a
//! [`ColumnAccessor`] for the string value of a named column, so pseudo-columns
//! such as `pod` (read out of free-text comments) live here rather than in the
//! filter or sort code.

use std::fmt;

use anyhow::Result;
use heck::{ToLowerCamelCase, ToTitleCase};
use log::info;

use crate::{model::MappingRecord, table};

pub const POD_TAG: &str = "Pod:";
pub const MALCODE_TAG: &str = "Malcode:";

/// Extracts the string value of a named column from a record.
///
/// Implementations must be total: unknown columns yield an empty string.
pub trait ColumnAccessor<R> {
    fn column_value(&self, record: &R, column: &str) -> String;
}

impl<R, F> ColumnAccessor<R> for F
where
    F: Fn(&R, &str) -> String,
{
    fn column_value(&self, record: &R, column: &str) -> String {
        self(record, column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    SourceMalcode,
    SourceTable,
    SourceColumn,
    SourceDataType,
    TargetMalcode,
    TargetTable,
    TargetColumn,
    TargetDataType,
    Transformation,
    Join,
    Status,
    Pod,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::SourceMalcode,
        Column::SourceTable,
        Column::SourceColumn,
        Column::SourceDataType,
        Column::TargetMalcode,
        Column::TargetTable,
        Column::TargetColumn,
        Column::TargetDataType,
        Column::Transformation,
        Column::Join,
        Column::Status,
        Column::Pod,
    ];

    /// Columns shown by the default table view, in display order.
    pub const DISPLAY: [Column; 10] = [
        Column::SourceMalcode,
        Column::SourceTable,
        Column::SourceColumn,
        Column::TargetMalcode,
        Column::TargetTable,
        Column::TargetColumn,
        Column::Transformation,
        Column::Join,
        Column::Status,
        Column::Pod,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::SourceMalcode => "sourceMalcode",
            Column::SourceTable => "sourceTable",
            Column::SourceColumn => "sourceColumn",
            Column::SourceDataType => "sourceDataType",
            Column::TargetMalcode => "targetMalcode",
            Column::TargetTable => "targetTable",
            Column::TargetColumn => "targetColumn",
            Column::TargetDataType => "targetDataType",
            Column::Transformation => "transformation",
            Column::Join => "join",
            Column::Status => "status",
            Column::Pod => "pod",
        }
    }

    pub fn title(self) -> String {
        self.name().to_title_case()
    }

    pub fn description(self) -> &'static str {
        match self {
            Column::SourceMalcode => {
                "Source Management Area Logical Code - unique identifier for the source business area"
            }
            Column::SourceTable => "The source database table name",
            Column::SourceColumn => "The source database column name",
            Column::SourceDataType => "Declared data type of the source column",
            Column::TargetMalcode => {
                "Target Management Area Logical Code - unique identifier for the target business area"
            }
            Column::TargetTable => "The target database table name",
            Column::TargetColumn => "The target database column name to map to",
            Column::TargetDataType => "Declared data type of the target column",
            Column::Transformation => "Logic applied to transform source data to target format",
            Column::Join => "Join conditions used in the mapping",
            Column::Status => "Current review status of the mapping",
            Column::Pod => "Owning pod, read from the first 'Pod:' comment",
        }
    }

    /// Resolves a column name, accepting camelCase, snake_case, kebab-case, or spaced titles.
    pub fn from_name(name: &str) -> Option<Column> {
        let normalized = name.trim().to_lower_camel_case();
        Column::ALL
            .into_iter()
            .find(|column| column.name() == normalized)
    }

    pub fn value_of(self, record: &MappingRecord) -> String {
        match self {
            Column::SourceMalcode => record.source_column.malcode.clone(),
            Column::SourceTable => record.source_column.table.clone(),
            Column::SourceColumn => record.source_column.column.clone(),
            Column::SourceDataType => record.source_column.data_type.clone(),
            Column::TargetMalcode => record.target_column.malcode.clone(),
            Column::TargetTable => record.target_column.table.clone(),
            Column::TargetColumn => record.target_column.column.clone(),
            Column::TargetDataType => record.target_column.data_type.clone(),
            Column::Transformation => record.transformation.clone().unwrap_or_default(),
            Column::Join => record.join.clone().unwrap_or_default(),
            Column::Status => record.status.as_str().to_string(),
            Column::Pod => pod_from_comments(&record.comments).to_string(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default accessor for [`MappingRecord`] rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingColumns;

impl ColumnAccessor<MappingRecord> for MappingColumns {
    fn column_value(&self, record: &MappingRecord, column: &str) -> String {
        Column::from_name(column)
            .map(|column| column.value_of(record))
            .unwrap_or_default()
    }
}

/// Value of the first comment starting with `tag`, minus the tag and leading whitespace.
pub fn comment_tag<'a>(comments: &'a [String], tag: &str) -> &'a str {
    comments
        .iter()
        .find_map(|comment| comment.strip_prefix(tag))
        .map(str::trim_start)
        .unwrap_or("")
}

pub fn pod_from_comments(comments: &[String]) -> &str {
    comment_tag(comments, POD_TAG)
}

pub fn execute() -> Result<()> {
    let headers = vec![
        "#".to_string(),
        "name".to_string(),
        "title".to_string(),
        "description".to_string(),
    ];
    let rows = Column::ALL
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            vec![
                (idx + 1).to_string(),
                column.name().to_string(),
                column.title(),
                column.description().to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    info!("Listed {} queryable column(s)", Column::ALL.len());
    Ok(())
}
