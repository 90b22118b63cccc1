use thiserror::Error;

/// Failures raised while interpreting user supplied query text or addressing rows.
///
/// The query engine and lineage builder themselves never fail; these errors only
/// come from parsing directives and looking records up by id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Empty filter expression")]
    EmptyFilter,
    #[error("Failed to parse filter expression '{0}'")]
    MalformedFilter(String),
    #[error("Filter expression '{0}' is missing a column name")]
    MissingFilterColumn(String),
    #[error("Unknown filter operator '{0}'")]
    UnknownOperator(String),
    #[error("Sort directive is missing a column name")]
    MissingSortColumn,
    #[error("Unknown sort direction '{0}'")]
    UnknownSortDirection(String),
    #[error("Unknown mapping status '{0}' (expected draft, pending, approved, or rejected)")]
    UnknownStatus(String),
    #[error("Mapping row '{0}' not found")]
    RecordNotFound(String),
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
