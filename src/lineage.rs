//! Lineage graphs derived from mapping rows.
//!
//! [`LineageGraph`] has one node per distinct column on each side and one edge
//! per distinct source to target column pair. [`TableLineage`] rolls the same
//! rows up to table granularity. Both are rebuilt from scratch on every call
//! and keep nodes and edges in the order they were first seen.

use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
};

use log::debug;
use serde::Serialize;

use crate::{
    columns::{MALCODE_TAG, comment_tag, pod_from_comments},
    model::{MappingColumn, MappingRecord},
};

pub const SOURCE_X: f64 = 50.0;
pub const TARGET_X: f64 = 450.0;
pub const ROW_SPACING: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Target => "target",
        }
    }

    fn x(self) -> f64 {
        match self {
            Side::Source => SOURCE_X,
            Side::Target => TARGET_X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Nodes stack vertically in their side's column, one slot per node.
    pub fn for_slot(side: Side, slot: usize) -> Self {
        Position {
            x: side.x(),
            y: slot as f64 * ROW_SPACING,
        }
    }
}

/// Backslash-escapes `.`, `>` and backslashes inside one part of a node key.
fn id_segment(part: &str) -> Cow<'_, str> {
    if !part.contains(['\\', '.', '>']) {
        return Cow::Borrowed(part);
    }
    let mut escaped = String::with_capacity(part.len() + 2);
    for ch in part.chars() {
        if matches!(ch, '\\' | '.' | '>') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    Cow::Owned(escaped)
}

fn column_key(column: &MappingColumn) -> String {
    format!(
        "{}.{}.{}",
        id_segment(&column.malcode),
        id_segment(&column.table),
        id_segment(&column.column)
    )
}

fn table_key(malcode: &str, table: &str) -> String {
    format!("{}.{}", id_segment(malcode), id_segment(table))
}

/// Hands out sequential layout slots per side.
#[derive(Debug, Default)]
struct SlotCounter {
    source: usize,
    target: usize,
}

impl SlotCounter {
    fn next(&mut self, side: Side) -> usize {
        let counter = match side {
            Side::Source => &mut self.source,
            Side::Target => &mut self.target,
        };
        let slot = *counter;
        *counter += 1;
        slot
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageNode {
    /// `<side>-<malcode>.<table>.<column>`, with dots, `>` and backslashes
    /// inside a part escaped by a backslash.
    pub id: String,
    pub side: Side,
    pub malcode: String,
    pub table: String,
    pub column: String,
    pub data_type: String,
    pub slot: usize,
    pub position: Position,
}

impl LineageNode {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.malcode, self.table, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageEdge {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub label: String,
    /// Row that created the edge; later rows with the same endpoints are folded in.
    pub record_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineageGraph {
    pub nodes: Vec<LineageNode>,
    pub edges: Vec<LineageEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ColumnKey<'a> {
    side: Side,
    malcode: &'a str,
    table: &'a str,
    column: &'a str,
}

impl LineageGraph {
    /// Column-level lineage. The first row seen for a source/target pair
    /// supplies the edge label.
    pub fn build(records: &[MappingRecord]) -> Self {
        let mut graph = LineageGraph::default();
        let mut node_index: HashMap<ColumnKey<'_>, usize> = HashMap::new();
        let mut seen_edges: HashSet<(usize, usize)> = HashSet::new();
        let mut slots = SlotCounter::default();

        for record in records {
            let source = graph.intern_node(
                &mut node_index,
                &mut slots,
                Side::Source,
                &record.source_column,
            );
            let target = graph.intern_node(
                &mut node_index,
                &mut slots,
                Side::Target,
                &record.target_column,
            );
            if !seen_edges.insert((source, target)) {
                continue;
            }
            let edge = LineageEdge {
                id: format!(
                    "{}->{}",
                    column_key(&record.source_column),
                    column_key(&record.target_column)
                ),
                source_node_id: graph.nodes[source].id.clone(),
                target_node_id: graph.nodes[target].id.clone(),
                label: record.transformation_label().to_string(),
                record_id: record.id.clone(),
            };
            graph.edges.push(edge);
        }

        debug!(
            "Built column lineage with {} node(s) and {} edge(s) from {} row(s)",
            graph.nodes.len(),
            graph.edges.len(),
            records.len()
        );
        graph
    }

    fn intern_node<'r>(
        &mut self,
        index: &mut HashMap<ColumnKey<'r>, usize>,
        slots: &mut SlotCounter,
        side: Side,
        column: &'r MappingColumn,
    ) -> usize {
        let key = ColumnKey {
            side,
            malcode: &column.malcode,
            table: &column.table,
            column: &column.column,
        };
        *index.entry(key).or_insert_with(|| {
            let slot = slots.next(side);
            self.nodes.push(LineageNode {
                id: format!("{}-{}", side.as_str(), column_key(column)),
                side,
                malcode: column.malcode.clone(),
                table: column.table.clone(),
                column: column.column.clone(),
                data_type: column.data_type.clone(),
                slot,
                position: Position::for_slot(side, slot),
            });
            self.nodes.len() - 1
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&LineageNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_on(&self, side: Side) -> impl Iterator<Item = &LineageNode> {
        self.nodes.iter().filter(move |node| node.side == side)
    }

    pub fn edges_from<'g>(&'g self, node_id: &'g str) -> impl Iterator<Item = &'g LineageEdge> {
        self.edges
            .iter()
            .filter(move |edge| edge.source_node_id == node_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableNode {
    pub id: String,
    pub side: Side,
    pub malcode: String,
    pub table: String,
    /// Distinct column names in first-seen order.
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,
    /// Malcode named by the first `Malcode:` comment; source tables only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_malcode: Option<String>,
    pub position: Position,
}

impl TableNode {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.malcode, self.table)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEdge {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub label: String,
    pub mapping_count: usize,
}

/// Table-level roll-up of the column lineage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableLineage {
    pub nodes: Vec<TableNode>,
    pub edges: Vec<TableEdge>,
}

impl TableLineage {
    pub fn build(records: &[MappingRecord]) -> Self {
        let mut lineage = TableLineage::default();
        let mut node_index: HashMap<(Side, &str, &str), usize> = HashMap::new();
        let mut edge_index: HashMap<(usize, usize), usize> = HashMap::new();
        let mut slots = SlotCounter::default();

        for record in records {
            let pod = non_empty(pod_from_comments(&record.comments));
            let source = lineage.intern_table(
                &mut node_index,
                &mut slots,
                Side::Source,
                &record.source_column,
                (pod.clone(), non_empty(comment_tag(&record.comments, MALCODE_TAG))),
            );
            let target = lineage.intern_table(
                &mut node_index,
                &mut slots,
                Side::Target,
                &record.target_column,
                (None, None),
            );
            let existing = edge_index.get(&(source, target)).copied();
            match existing {
                Some(edge) => lineage.edges[edge].mapping_count += 1,
                None => {
                    edge_index.insert((source, target), lineage.edges.len());
                    let edge = TableEdge {
                        id: format!(
                            "{}->{}",
                            table_key(&record.source_column.malcode, &record.source_column.table),
                            table_key(&record.target_column.malcode, &record.target_column.table)
                        ),
                        source_node_id: lineage.nodes[source].id.clone(),
                        target_node_id: lineage.nodes[target].id.clone(),
                        label: pod.unwrap_or_default(),
                        mapping_count: 1,
                    };
                    lineage.edges.push(edge);
                }
            }
        }

        debug!(
            "Built table lineage with {} node(s) and {} edge(s)",
            lineage.nodes.len(),
            lineage.edges.len()
        );
        lineage
    }

    fn intern_table<'r>(
        &mut self,
        index: &mut HashMap<(Side, &'r str, &'r str), usize>,
        slots: &mut SlotCounter,
        side: Side,
        column: &'r MappingColumn,
        (pod, comment_malcode): (Option<String>, Option<String>),
    ) -> usize {
        let idx = *index
            .entry((side, column.malcode.as_str(), column.table.as_str()))
            .or_insert_with(|| {
                let slot = slots.next(side);
                self.nodes.push(TableNode {
                    id: format!("{}-{}", side.as_str(), table_key(&column.malcode, &column.table)),
                    side,
                    malcode: column.malcode.clone(),
                    table: column.table.clone(),
                    columns: Vec::new(),
                    pod,
                    comment_malcode,
                    position: Position::for_slot(side, slot),
                });
                self.nodes.len() - 1
            });
        let node = &mut self.nodes[idx];
        if !node.columns.contains(&column.column) {
            node.columns.push(column.column.clone());
        }
        idx
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&TableNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
