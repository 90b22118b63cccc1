use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::{
    cli::{ListArgs, OutputFormat},
    columns::{Column, MappingColumns},
    filter::parse_filters,
    model::MappingRecord,
    paginate::PageSlot,
    query::{QueryPage, TableQuery},
    search::QuickSearch,
    sort::SortDirective,
    store, table,
};

pub fn execute(args: &ListArgs) -> Result<()> {
    let sheet = store::load_mapping_file(&args.input)?;
    let search = QuickSearch::new(args.search.as_deref().unwrap_or(""), args.status);
    let candidates = if search.is_noop() {
        sheet.rows
    } else {
        search.apply(&sheet.rows)
    };

    let query = build_query(&args.filters, &args.sort, args.page)?;
    let page = query.evaluate(&candidates, &MappingColumns, args.page_size);
    info!(
        "Showing page {} of {} ({} matching row(s)) from {:?}",
        page.current_page(),
        page.total_pages(),
        page.total_items(),
        args.input
    );

    match args.format {
        OutputFormat::Table => {
            print!("{}", render_page(&page, args.max_width));
        }
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&ListReport::from(&page))
                .context("Serializing page as JSON")?;
            println!("{rendered}");
        }
        OutputFormat::Yaml => {
            let rendered = serde_yaml::to_string(&ListReport::from(&page))
                .context("Serializing page as YAML")?;
            print!("{rendered}");
        }
    }
    Ok(())
}

/// Replays command-line filters and sorts onto a fresh query, then selects `page`.
pub fn build_query(filters: &[String], sorts: &[String], page: usize) -> Result<TableQuery> {
    let mut query = TableQuery::new();
    for predicate in parse_filters(filters)? {
        if Column::from_name(&predicate.column).is_none() {
            warn!(
                "Filter column '{}' is not a known mapping column; it matches empty values only",
                predicate.column
            );
        }
        query.apply_filter(predicate);
    }
    for spec in sorts
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let directive: SortDirective = spec.parse()?;
        query.apply_sort_directive(&directive);
    }
    query.set_page(page);
    Ok(query)
}

pub fn render_page(page: &QueryPage<'_, MappingRecord>, max_width: usize) -> String {
    let mut headers = vec!["#".to_string()];
    headers.extend(Column::DISPLAY.iter().map(|column| column.title()));
    let rows = page
        .items
        .iter()
        .enumerate()
        .map(|(offset, record)| {
            let mut row = vec![(page.start_index() + offset + 1).to_string()];
            row.extend(Column::DISPLAY.iter().map(|column| display_value(*column, record)));
            row
        })
        .collect::<Vec<_>>();

    if rows.is_empty() {
        return "No mapping rows match the current filters.\n".to_string();
    }
    let limit = (max_width > 0).then_some(max_width);
    let mut output = table::render_table_with_limit(&headers, &rows, limit);
    output.push_str(&table::render_pager(&page.window, &page.page_numbers()));
    output
}

fn display_value(column: Column, record: &MappingRecord) -> String {
    match column {
        Column::Transformation => record.transformation_label().to_string(),
        Column::Join => record
            .join
            .clone()
            .filter(|join| !join.trim().is_empty())
            .unwrap_or_else(|| "-".to_string()),
        other => other.value_of(record),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListReport<'a> {
    page: usize,
    page_size: usize,
    total_items: usize,
    total_pages: usize,
    start_index: usize,
    end_index: usize,
    pages: Vec<PageSlot>,
    rows: &'a [&'a MappingRecord],
}

impl<'a> From<&'a QueryPage<'a, MappingRecord>> for ListReport<'a> {
    fn from(page: &'a QueryPage<'a, MappingRecord>) -> Self {
        ListReport {
            page: page.current_page(),
            page_size: page.page_size(),
            total_items: page.total_items(),
            total_pages: page.total_pages(),
            start_index: page.start_index(),
            end_index: page.end_index(),
            pages: page.page_numbers(),
            rows: &page.items,
        }
    }
}
