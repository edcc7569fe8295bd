// crates/molt-cli/src/report.rs
//
// End-of-run summary table, printed to stderr so stdout stays a pure
// provenance stream.

use molt_migrate::MigrationReport;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "root")]
    root: String,
    #[tabled(rename = "shards")]
    shards: usize,
    #[tabled(rename = "transferred")]
    transferred: usize,
}

/// Print one row per migrated record, plus totals.
pub fn print_summary(report: &MigrationReport) {
    if report.records.is_empty() {
        eprintln!("no records migrated (empty input)");
        return;
    }

    let rows: Vec<Row> = report
        .records
        .iter()
        .map(|r| Row {
            root: r.root.clone(),
            shards: r.shards,
            transferred: r.transferred,
        })
        .collect();

    eprintln!("{}", Table::new(rows));
    eprintln!(
        "migrated {} upload(s): {} shard(s) registered, {} byte transfer(s)",
        report.records.len(),
        report.total_shards(),
        report.total_transferred()
    );
}
