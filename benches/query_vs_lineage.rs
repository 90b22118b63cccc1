use std::path::PathBuf;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use mapping_ledger::list::build_query;
use mapping_ledger::store::{load_mapping_file, save_mapping_file};
use mapping_ledger::{
    LineageGraph, MappingColumn, MappingColumns, MappingFile, MappingRecord, MappingStatus,
    TableLineage,
};
use tempfile::TempDir;

fn generate_sheet(rows: usize) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let sheet_path = temp_dir.path().join("mappings.json");
    let records = (0..rows)
        .map(|i| {
            let status = match i % 4 {
                0 => MappingStatus::Approved,
                1 => MappingStatus::Pending,
                2 => MappingStatus::Rejected,
                _ => MappingStatus::Draft,
            };
            let table = format!("table_{:03}", i % 200);
            let source = MappingColumn::new("SRC_001", &table, format!("col_{}", i % 40), "varchar");
            let target = MappingColumn::new(
                "TGT_002",
                format!("dim_{}", table),
                format!("attr_{i}"),
                "varchar",
            );
            let record = MappingRecord::new(format!("m-{i}"), source, target)
                .with_status(status)
                .with_comment(format!("Pod: Team {}", i % 7));
            if i % 5 == 0 {
                record
            } else {
                record.with_transformation(format!("UPPER(col_{})", i % 40))
            }
        })
        .collect();
    save_mapping_file(&sheet_path, &MappingFile::from_rows(records)).expect("save sheet");
    (temp_dir, sheet_path)
}

fn bench_query_vs_lineage(c: &mut Criterion) {
    let (temp_dir, sheet_path) = generate_sheet(20_000);
    let sheet = load_mapping_file(&sheet_path).expect("load sheet");
    let query = build_query(
        &["sourceTable contains table_1".to_string(), "pod = Team 3".to_string()],
        &["targetColumn:desc".to_string()],
        3,
    )
    .expect("build query");

    let mut group = c.benchmark_group("mapping_sheet");

    group.bench_function("filter_sort_page", |b| {
        b.iter(|| query.evaluate(&sheet.rows, &MappingColumns, 25).total_items());
    });

    group.bench_function("column_lineage", |b| {
        b.iter_batched(
            || (),
            |_| LineageGraph::build(&sheet.rows),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("table_lineage", |b| {
        b.iter_batched(
            || (),
            |_| TableLineage::build(&sheet.rows),
            BatchSize::SmallInput,
        );
    });

    drop(temp_dir);
    group.finish();
}

criterion_group!(benches, bench_query_vs_lineage);
criterion_main!(benches);
