pub mod cache_daemon;
pub mod flush_cache;

pub use cache_daemon::handle_internal_cache_daemon;
pub use flush_cache::handle_flush_cache;
