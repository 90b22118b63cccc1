//! Mapping records as exchanged with the mapping workbench.
//!
//! Field names follow the camelCase JSON shape of the workbench so files
//! exported from it load without translation. The core query and lineage
//! code only ever reads these records.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Edge and cell label used when a mapping carries no transformation.
pub const DIRECT_COPY_LABEL: &str = "Direct Copy";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MappingStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl MappingStatus {
    pub const ALL: [MappingStatus; 4] = [
        MappingStatus::Draft,
        MappingStatus::Pending,
        MappingStatus::Approved,
        MappingStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MappingStatus::Draft => "draft",
            MappingStatus::Pending => "pending",
            MappingStatus::Approved => "approved",
            MappingStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for MappingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MappingStatus {
    type Err = LedgerError;

    fn from_str(value: &str) -> LedgerResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(MappingStatus::Draft),
            "pending" => Ok(MappingStatus::Pending),
            "approved" => Ok(MappingStatus::Approved),
            "rejected" => Ok(MappingStatus::Rejected),
            _ => Err(LedgerError::UnknownStatus(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub malcode_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_description: Option<String>,
}

/// One side of a mapping: a column addressed by business area, table, and name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MappingColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub malcode: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_metadata: Option<BusinessMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl MappingColumn {
    pub fn new(
        malcode: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        MappingColumn {
            malcode: malcode.into(),
            table: table.into(),
            column: column.into(),
            data_type: data_type.into(),
            ..MappingColumn::default()
        }
    }

    /// `malcode.table.column`, the identity used by lineage nodes.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.malcode, self.table, self.column)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MappingRecord {
    pub id: String,
    pub source_column: MappingColumn,
    pub target_column: MappingColumn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,
    #[serde(default)]
    pub status: MappingStatus,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl MappingRecord {
    pub fn new(id: impl Into<String>, source: MappingColumn, target: MappingColumn) -> Self {
        MappingRecord {
            id: id.into(),
            source_column: source,
            target_column: target,
            transformation: None,
            join: None,
            status: MappingStatus::Draft,
            comments: Vec::new(),
            created_by: None,
            created_at: None,
            updated_at: None,
            reviewer: None,
            reviewed_at: None,
        }
    }

    pub fn with_transformation(mut self, expression: impl Into<String>) -> Self {
        self.transformation = Some(expression.into());
        self
    }

    pub fn with_status(mut self, status: MappingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    /// The transformation expression, or `None` when the mapping is a direct copy.
    pub fn transformation_expr(&self) -> Option<&str> {
        self.transformation
            .as_deref()
            .map(str::trim)
            .filter(|expr| !expr.is_empty())
    }

    pub fn is_direct_copy(&self) -> bool {
        self.transformation_expr().is_none()
    }

    pub fn transformation_label(&self) -> &str {
        self.transformation_expr().unwrap_or(DIRECT_COPY_LABEL)
    }

    pub fn set_status(&mut self, status: MappingStatus, reviewer: &str, at: DateTime<Utc>) {
        self.status = status;
        self.reviewer = Some(reviewer.to_string());
        self.reviewed_at = Some(at);
        self.updated_at = Some(at);
    }

    pub fn add_comment(&mut self, comment: impl Into<String>, at: DateTime<Utc>) {
        self.comments.push(comment.into());
        self.updated_at = Some(at);
    }
}

/// A named mapping sheet between two systems.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MappingFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub source_system: String,
    #[serde(default)]
    pub target_system: String,
    #[serde(default)]
    pub status: MappingStatus,
    #[serde(default)]
    pub rows: Vec<MappingRecord>,
}

impl MappingFile {
    pub fn from_rows(rows: Vec<MappingRecord>) -> Self {
        MappingFile {
            rows,
            ..MappingFile::default()
        }
    }

    pub fn record(&self, id: &str) -> LedgerResult<&MappingRecord> {
        self.rows
            .iter()
            .find(|row| row.id == id)
            .ok_or_else(|| LedgerError::RecordNotFound(id.to_string()))
    }

    pub fn record_mut(&mut self, id: &str) -> LedgerResult<&mut MappingRecord> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| LedgerError::RecordNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Approved".parse::<MappingStatus>().unwrap(),
            MappingStatus::Approved
        );
        assert_eq!(
            " pending ".parse::<MappingStatus>().unwrap(),
            MappingStatus::Pending
        );
        assert!(matches!(
            "shipped".parse::<MappingStatus>(),
            Err(LedgerError::UnknownStatus(_))
        ));
    }

    #[test]
    fn blank_transformation_is_direct_copy() {
        let record = MappingRecord::new(
            "r1",
            MappingColumn::new("A", "T1", "c1", "string"),
            MappingColumn::new("B", "T2", "c1", "string"),
        )
        .with_transformation("   ");
        assert!(record.is_direct_copy());
        assert_eq!(record.transformation_label(), DIRECT_COPY_LABEL);
    }

    #[test]
    fn record_deserializes_from_workbench_json() {
        let json = r#"{
            "id": "m-1",
            "sourceColumn": {"malcode": "CRM_001", "table": "customer", "column": "cust_id", "dataType": "int"},
            "targetColumn": {"malcode": "DW_010", "table": "dim_customer", "column": "customer_key", "dataType": "bigint",
                             "businessMetadata": {"columnDescription": "Surrogate key"}},
            "transformation": "CAST(cust_id AS BIGINT)",
            "status": "pending",
            "comments": ["Pod: Data Platform"],
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let record: MappingRecord = serde_json::from_str(json).expect("parse record");
        assert_eq!(record.source_column.qualified_name(), "CRM_001.customer.cust_id");
        assert_eq!(record.status, MappingStatus::Pending);
        assert_eq!(
            record
                .target_column
                .business_metadata
                .as_ref()
                .and_then(|m| m.column_description.as_deref()),
            Some("Surrogate key")
        );
        assert!(record.join.is_none());
        assert!(record.created_at.is_some());
    }
}
