//! Output formatting helpers for the CLI.
//!
//! Documents print as pretty JSON; listings print as a table on a terminal
//! and as tab-separated rows otherwise. `--json` switches to machine output.

mod json;
mod mode;
mod text;

// Re-export public API
pub use json::{page_json, print_json, schema_json, schemas_json};
pub use mode::OutputMode;
pub use text::{page_table, schemas_table};
