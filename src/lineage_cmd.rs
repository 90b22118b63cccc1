//! `lineage` subcommand: builds the column or table lineage graph for a sheet
//! and prints it as an edge listing, JSON, or YAML.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    cli::{LineageArgs, LineageLevel, OutputFormat},
    lineage::{LineageGraph, TableLineage},
    store, table,
};

pub fn execute(args: &LineageArgs) -> Result<()> {
    let sheet = store::load_mapping_file(&args.input)?;
    if sheet.rows.is_empty() {
        info!("No mapping rows in {:?}; lineage is empty", args.input);
    }
    match args.level {
        LineageLevel::Column => {
            let graph = LineageGraph::build(&sheet.rows);
            info!(
                "Column lineage: {} node(s), {} edge(s) from {} row(s)",
                graph.nodes.len(),
                graph.edges.len(),
                sheet.rows.len()
            );
            emit(&graph, args.format, || column_listing(&graph))
        }
        LineageLevel::Table => {
            let lineage = TableLineage::build(&sheet.rows);
            info!(
                "Table lineage: {} node(s), {} edge(s) from {} row(s)",
                lineage.nodes.len(),
                lineage.edges.len(),
                sheet.rows.len()
            );
            emit(&lineage, args.format, || table_listing(&lineage))
        }
    }
}

fn emit<T, F>(value: &T, format: OutputFormat, listing: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Table => print!("{}", listing()),
        OutputFormat::Json => {
            let rendered =
                serde_json::to_string_pretty(value).context("Serializing lineage as JSON")?;
            println!("{rendered}");
        }
        OutputFormat::Yaml => {
            let rendered = serde_yaml::to_string(value).context("Serializing lineage as YAML")?;
            print!("{rendered}");
        }
    }
    Ok(())
}

pub fn column_listing(graph: &LineageGraph) -> String {
    if graph.is_empty() {
        return "No mapping data available.\n".to_string();
    }
    let headers = ["source", "source type", "target", "target type", "transformation"]
        .map(String::from)
        .to_vec();
    let rows = graph
        .edges
        .iter()
        .filter_map(|edge| {
            let source = graph.node(&edge.source_node_id)?;
            let target = graph.node(&edge.target_node_id)?;
            Some(vec![
                source.qualified_name(),
                source.data_type.clone(),
                target.qualified_name(),
                target.data_type.clone(),
                edge.label.clone(),
            ])
        })
        .collect::<Vec<_>>();
    table::render_table(&headers, &rows)
}

pub fn table_listing(lineage: &TableLineage) -> String {
    if lineage.is_empty() {
        return "No mapping data available.\n".to_string();
    }
    let headers = ["source table", "target table", "mappings", "pod", "malcode tag"]
        .map(String::from)
        .to_vec();
    let rows = lineage
        .edges
        .iter()
        .filter_map(|edge| {
            let source = lineage.node(&edge.source_node_id)?;
            let target = lineage.node(&edge.target_node_id)?;
            Some(vec![
                source.qualified_name(),
                target.qualified_name(),
                edge.mapping_count.to_string(),
                edge.label.clone(),
                source.comment_malcode.clone().unwrap_or_default(),
            ])
        })
        .collect::<Vec<_>>();
    table::render_table(&headers, &rows)
}
