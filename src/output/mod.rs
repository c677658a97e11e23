pub mod export;
pub mod formatter;

pub use export::{render, write_export, ExportFormat};
pub use formatter::{
    format_announcement, format_csv, format_mode_list, format_payouts, format_standings_table,
    format_text_export, format_time, format_tsv, format_value, should_use_colors, strip_styles,
};
