use crate::app::AppContext;
use crate::cache::{cache_clear, cache_socket_path};
use crate::config::CacheBackend;

pub async fn handle_flush_cache(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let backend = ctx.config()?.cache.backend;
    if backend != CacheBackend::Daemon {
        if !ctx.quiet() {
            println!("Cache backend is not the daemon; nothing to flush.");
        }
        return Ok(());
    }

    let flushed = cache_clear(&cache_socket_path()?).await?;
    if !ctx.quiet() {
        if flushed {
            println!("Cache flushed.");
        } else {
            println!("Cache daemon is not running.");
        }
    }
    Ok(())
}
