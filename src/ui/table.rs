use tabled::{settings::Style, Table, Tabled};
use crate::coordinator::StoreStats;
use crate::record::NameRecord;
use crate::ui::output::shown_name;

#[derive(Tabled)]
struct NameRow<'a> {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: &'a str,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Store")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn names_table(records: &[NameRecord]) -> String {
    let rows = records.iter().map(|record| NameRow {
        id: record.id,
        name: shown_name(record),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &StoreStats) -> String {
    let size = stats
        .backing_bytes
        .map(|bytes| format!("{} bytes", bytes))
        .unwrap_or_else(|| "-".to_string());
    let rows = [
        StatRow { field: "Records", value: stats.records.to_string() },
        StatRow { field: "Backing file", value: stats.backing_path.display().to_string() },
        StatRow { field: "Size", value: size },
        StatRow { field: "Handle generation", value: stats.generation.to_string() },
    ];
    Table::new(rows).with(Style::rounded()).to_string()
}
