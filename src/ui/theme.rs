use owo_colors::Style;
use std::sync::OnceLock;
use crate::record::NameRecord;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for the pieces namebook prints: status lines, labels and records
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub label: Style,
    pub done: Style,
    pub failed: Style,
    pub caution: Style,
    pub note: Style,
    pub record_id: Style,
    pub record_name: Style,
    /// NULL names, which only arrive through imported snapshots
    pub unnamed: Style,
}

impl Theme {
    /// Colors when `colored`, every style empty otherwise
    pub fn new(colored: bool) -> Self {
        let pick = |style: Style| if colored { style } else { Style::new() };
        Self {
            title: pick(Style::new().cyan().bold()),
            label: pick(Style::new().dimmed()),
            done: pick(Style::new().green().bold()),
            failed: pick(Style::new().red().bold()),
            caution: pick(Style::new().yellow()),
            note: pick(Style::new().magenta()),
            record_id: pick(Style::new().bright_black()),
            record_name: pick(Style::new().bold()),
            unnamed: pick(Style::new().italic().dimmed()),
        }
    }

    pub fn name_style(&self, record: &NameRecord) -> Style {
        match record.name {
            Some(_) => self.record_name,
            None => self.unnamed,
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(|| Theme::new(console::Term::stdout().is_term()))
}
