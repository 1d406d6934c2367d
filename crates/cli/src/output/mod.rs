pub mod banner;
pub mod confirm;
mod format;
pub mod spinner;
mod table;
pub mod theme;

pub use format::{print_error, print_json, print_success, print_warning, OutputMode};
pub use table::{build_table, failures_table, rules_table};
