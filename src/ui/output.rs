use crate::record::NameRecord;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

/// Placeholder shown for records whose name is NULL
pub const UNNAMED: &str = "(unnamed)";

pub fn header(text: &str) {
    println!("{} {}", Icons::BOOK, text.style(theme().title));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().done));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().failed));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().caution));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().note),
        label.style(theme().label),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().title));
}

/// Name as printed, with NULL shown as [`UNNAMED`]
pub fn shown_name(record: &NameRecord) -> &str {
    record.name.as_deref().unwrap_or(UNNAMED)
}

/// Render the current list, one record per line
pub fn name_list(records: &[NameRecord]) {
    if records.is_empty() {
        println!("{} {}", Icons::EMPTY, "No names yet.".style(theme().label));
        return;
    }
    for record in records {
        println!(
            "  {} {}",
            format!("#{:<4}", record.id).style(theme().record_id),
            shown_name(record).style(theme().name_style(record))
        );
    }
}
