use std::path::PathBuf;
use std::time::Duration;

use crate::cache::run_cache_daemon;
use crate::cli::InternalCacheDaemonArgs;

pub async fn handle_internal_cache_daemon(args: &InternalCacheDaemonArgs) -> anyhow::Result<()> {
    let socket_path = PathBuf::from(&args.socket);
    run_cache_daemon(&socket_path, Duration::from_secs(args.idle_seconds)).await
}
