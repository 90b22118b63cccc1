use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{model::MappingStatus, paginate::DEFAULT_PAGE_SIZE};

#[derive(Debug, Parser)]
#[command(author, version, about = "Query, review, and trace data mapping sheets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Filter, sort, and page through mapping rows
    List(ListArgs),
    /// Derive the source-to-target lineage graph
    Lineage(LineageArgs),
    /// Count mapping rows by review status
    Summary(SummaryArgs),
    /// List the column names accepted by --filter and --sort
    Columns,
    /// Record a review decision for one mapping row
    Review(ReviewArgs),
    /// Append a comment to one mapping row
    Comment(CommentArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum LineageLevel {
    #[default]
    Column,
    Table,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Mapping sheet to read (.json, .yaml, or .yml)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Free-text search across malcodes, tables, columns, and transformations
    #[arg(short = 'q', long = "search")]
    pub search: Option<String>,
    /// Only rows with this review status
    #[arg(long, value_parser = parse_status)]
    pub status: Option<MappingStatus>,
    /// Column filters such as `sourceTable contains cust` or `status = approved`
    #[arg(long = "filter", action = clap::ArgAction::Append)]
    pub filters: Vec<String>,
    /// Sort directives `column[:asc|desc]`; repeating a bare column flips its direction
    #[arg(long = "sort", action = clap::ArgAction::Append)]
    pub sort: Vec<String>,
    /// 1-based page to display
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Rows per page
    #[arg(long = "page-size", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
    /// Truncate table cells wider than this many characters (0 disables)
    #[arg(long = "max-width", default_value_t = crate::table::DEFAULT_MAX_CELL_WIDTH)]
    pub max_width: usize,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct LineageArgs {
    /// Mapping sheet to read (.json, .yaml, or .yml)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Graph granularity
    #[arg(long, value_enum, default_value = "column")]
    pub level: LineageLevel,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Mapping sheet to read (.json, .yaml, or .yml)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Mapping sheet to update
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination sheet (defaults to rewriting the input)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Id of the mapping row
    #[arg(long)]
    pub id: String,
    /// New review status
    #[arg(long, value_parser = parse_status)]
    pub status: MappingStatus,
    /// Name recorded as reviewer
    #[arg(long, default_value = "Current User")]
    pub reviewer: String,
}

#[derive(Debug, Args)]
pub struct CommentArgs {
    /// Mapping sheet to update
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination sheet (defaults to rewriting the input)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Id of the mapping row
    #[arg(long)]
    pub id: String,
    /// Comment text; `Pod: <name>` comments feed the pod column
    #[arg(long)]
    pub text: String,
}

pub fn parse_status(value: &str) -> Result<MappingStatus, String> {
    value.parse().map_err(|err: crate::error::LedgerError| err.to_string())
}
