pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod patch;
pub mod replace;

pub use create::handle_create;
pub use delete::handle_delete;
pub use get::handle_get;
pub use list::handle_list;
pub use patch::handle_patch;
pub use replace::handle_replace;
