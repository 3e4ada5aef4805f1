pub mod list;
pub mod show;

pub use list::handle_schemas;
pub use show::handle_schema;
