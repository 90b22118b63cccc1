pub mod cli;
pub mod columns;
pub mod error;
pub mod filter;
pub mod lineage;
pub mod lineage_cmd;
pub mod list;
pub mod model;
pub mod paginate;
pub mod query;
pub mod review;
pub mod search;
pub mod sort;
pub mod store;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

pub use crate::{
    columns::{ColumnAccessor, MappingColumns},
    error::LedgerError,
    filter::{FilterOperator, FilterPredicate},
    lineage::{LineageEdge, LineageGraph, LineageNode, TableLineage},
    model::{MappingColumn, MappingFile, MappingRecord, MappingStatus},
    paginate::{Gap, PageSlot},
    query::{QueryPage, TableQuery},
    sort::{SortDirection, SortKey},
};

use crate::{
    cli::{Cli, Commands},
    search::StatusCounts,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("mapping_ledger", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::List(args) => list::execute(&args),
        Commands::Lineage(args) => lineage_cmd::execute(&args),
        Commands::Summary(args) => handle_summary(&args),
        Commands::Columns => columns::execute(),
        Commands::Review(args) => review::execute_review(&args),
        Commands::Comment(args) => review::execute_comment(&args),
    }
}

fn handle_summary(args: &cli::SummaryArgs) -> Result<()> {
    let sheet = store::load_mapping_file(&args.input)?;
    let counts = StatusCounts::tally(&sheet.rows);
    let headers = vec!["status".to_string(), "rows".to_string()];
    let mut rows = MappingStatus::ALL
        .iter()
        .map(|status| vec![status.to_string(), counts.get(*status).to_string()])
        .collect::<Vec<_>>();
    rows.push(vec!["total".to_string(), counts.total().to_string()]);
    table::print_table(&headers, &rows);
    info!(
        "Summarised {} mapping row(s) from {:?}",
        counts.total(),
        args.input
    );
    Ok(())
}
