pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, name_list, section, shown_name, success, warn};
pub use progress::Spinner;
pub use table::{names_table, stats_table};
pub use theme::{theme, Theme};
