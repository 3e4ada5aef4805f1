//! Local cache daemon and the `Cache` client that talks to it.
//!
//! The daemon keeps a [`MemoryCache`] alive between CLI invocations and serves
//! a one-request-per-connection line protocol over a Unix socket:
//!
//! ```text
//! PING                      -> PONG
//! GET <key>                 -> VALUE <value> | NOT_FOUND
//! SET <key> <ttl> <value>   -> OK
//! DEL <key>                 -> OK
//! CLEAR                     -> OK
//! ```
//!
//! Keys and values are base64-encoded; `ttl` is whole seconds, 0 for none.
//! Anything malformed gets `ERROR`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, warn};

use easyrest_core::cache::CacheResult;
use easyrest_core::{Cache, CacheError, MemoryCache};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Longest a single client may hold the daemon.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(2);

/// [`Cache`] backed by the local cache daemon.
///
/// Reads against a daemon that is not running are misses; the first write
/// spawns it.
pub struct DaemonCache {
    socket_path: PathBuf,
    namespace: String,
    idle: Duration,
}

impl DaemonCache {
    /// `store_identity` namespaces keys so stores sharing a daemon never see
    /// each other's entries.
    pub fn new(socket_path: PathBuf, store_identity: &str, idle: Duration) -> Self {
        Self {
            socket_path,
            namespace: namespace_for(store_identity),
            idle,
        }
    }

    fn encoded_key(&self, key: &str) -> String {
        STANDARD.encode(format!("{}:{}", self.namespace, key))
    }

    async fn ensure_daemon_running(&self) -> CacheResult<()> {
        if cache_ping(&self.socket_path).await? {
            return Ok(());
        }

        let exe = std::env::current_exe()?;
        debug!(socket = %self.socket_path.display(), "spawning cache daemon");
        std::process::Command::new(exe)
            .arg("internal-cache-daemon")
            .arg("--socket")
            .arg(&self.socket_path)
            .arg("--idle-seconds")
            .arg(self.idle.as_secs().to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CacheError::new(format!("Failed to spawn cache daemon: {}", e)))?;

        for _ in 0..40 {
            if cache_ping(&self.socket_path).await? {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        Err(CacheError::new("Cache daemon did not become ready in time"))
    }
}

#[async_trait]
impl Cache for DaemonCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let request = format!("GET {}", self.encoded_key(key));
        let Some(response) = send_request(&self.socket_path, &request).await? else {
            return Ok(None);
        };
        if let Some(encoded) = response.strip_prefix("VALUE ") {
            return decode(encoded)
                .map(Some)
                .ok_or_else(|| CacheError::new("Cache daemon returned an undecodable value"));
        }
        if response == "NOT_FOUND" {
            return Ok(None);
        }
        Err(unexpected_response(&response))
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
        self.ensure_daemon_running().await?;
        let request = format!(
            "SET {} {} {}",
            self.encoded_key(key),
            ttl.map(ttl_seconds).unwrap_or(0),
            STANDARD.encode(value)
        );
        match send_request(&self.socket_path, &request).await? {
            Some(response) if response == "OK" => Ok(()),
            Some(response) => Err(unexpected_response(&response)),
            None => Err(CacheError::new("Cache daemon went away")),
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let request = format!("DEL {}", self.encoded_key(key));
        match send_request(&self.socket_path, &request).await? {
            Some(response) if response != "OK" => Err(unexpected_response(&response)),
            _ => Ok(()),
        }
    }
}

/// Drop every entry the daemon holds. Returns false when no daemon is running.
pub async fn cache_clear(socket_path: &Path) -> CacheResult<bool> {
    match send_request(socket_path, "CLEAR").await? {
        Some(response) if response == "OK" => Ok(true),
        Some(response) => Err(unexpected_response(&response)),
        None => Ok(false),
    }
}

pub async fn cache_ping(socket_path: &Path) -> CacheResult<bool> {
    Ok(send_request(socket_path, "PING")
        .await?
        .is_some_and(|response| response == "PONG"))
}

/// Serve the cache protocol on `socket_path` until the cache has been empty
/// and no client has connected for `idle`.
pub async fn run_cache_daemon(socket_path: &Path, idle: Duration) -> anyhow::Result<()> {
    let parent = socket_path.parent().ok_or_else(|| {
        anyhow::anyhow!(
            "Cache socket path has no parent directory: {}",
            socket_path.display()
        )
    })?;
    std::fs::create_dir_all(parent).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create cache socket directory {}: {}",
            parent.display(),
            e
        )
    })?;
    if socket_path.exists() {
        let _ = std::fs::remove_file(socket_path);
    }

    let listener = UnixListener::bind(socket_path)
        .map_err(|e| anyhow::anyhow!("Cache bind failed: {}", e))?;
    set_socket_permissions(socket_path)?;
    debug!(socket = %socket_path.display(), "cache daemon listening");

    let cache = MemoryCache::new();
    let mut last_activity = Instant::now();

    loop {
        match tokio::time::timeout(POLL_INTERVAL, listener.accept()).await {
            Ok(Ok((stream, _addr))) => {
                match tokio::time::timeout(CONNECTION_TIMEOUT, serve_connection(stream, &cache))
                    .await
                {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => warn!(error = %err, "cache daemon connection failed"),
                    Err(_) => warn!("cache daemon dropped a stalled connection"),
                }
                last_activity = Instant::now();
            }
            Ok(Err(err)) => return Err(anyhow::anyhow!("Cache accept failed: {}", err)),
            Err(_) => {}
        }

        cache.purge_expired()?;
        if cache.is_empty()? && last_activity.elapsed() >= idle {
            break;
        }
    }

    let _ = std::fs::remove_file(socket_path);
    Ok(())
}

pub fn cache_socket_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let base = std::env::var("TMPDIR").unwrap_or_else(|_| "/tmp".to_string());
        Ok(PathBuf::from(base).join("easyrest-cache.sock"))
    }

    #[cfg(not(target_os = "macos"))]
    {
        if let Ok(value) = std::env::var("XDG_RUNTIME_DIR") {
            if !value.trim().is_empty() {
                return Ok(PathBuf::from(value).join("easyrest").join("cache.sock"));
            }
        }
        let uid = unsafe { libc::geteuid() };
        Ok(PathBuf::from(format!("/tmp/easyrest-{}", uid)).join("cache.sock"))
    }
}

async fn serve_connection(mut stream: UnixStream, cache: &MemoryCache) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.split();
    let mut line = String::new();
    BufReader::new(reader).read_line(&mut line).await?;
    let response = handle_request(line.trim(), cache).await;
    writer.write_all(response.as_bytes()).await?;
    writer.shutdown().await?;
    Ok(())
}

async fn handle_request(request: &str, cache: &MemoryCache) -> String {
    let mut parts = request.split(' ');
    let command = parts.next().unwrap_or("");
    let outcome = match command {
        "PING" => return "PONG\n".to_string(),
        "CLEAR" => cache.clear().map(|_| "OK\n".to_string()),
        "GET" => {
            let Some(key) = parts.next().and_then(decode) else {
                return "ERROR\n".to_string();
            };
            cache.get(&key).await.map(|value| match value {
                Some(value) => format!("VALUE {}\n", STANDARD.encode(value)),
                None => "NOT_FOUND\n".to_string(),
            })
        }
        "SET" => {
            let key = parts.next().and_then(decode);
            let ttl = parts.next().and_then(|raw| raw.parse::<u64>().ok());
            let value = parts.next().and_then(decode);
            let (Some(key), Some(ttl), Some(value)) = (key, ttl, value) else {
                return "ERROR\n".to_string();
            };
            cache
                .set(&key, value, Some(Duration::from_secs(ttl)))
                .await
                .map(|_| "OK\n".to_string())
        }
        "DEL" => {
            let Some(key) = parts.next().and_then(decode) else {
                return "ERROR\n".to_string();
            };
            cache.delete(&key).await.map(|_| "OK\n".to_string())
        }
        _ => return "ERROR\n".to_string(),
    };
    outcome.unwrap_or_else(|_| "ERROR\n".to_string())
}

/// Send one request line and read the whole response.
///
/// `None` means no daemon is listening.
async fn send_request(socket_path: &Path, line: &str) -> CacheResult<Option<String>> {
    let mut stream = match UnixStream::connect(socket_path).await {
        Ok(stream) => stream,
        Err(err)
            if matches!(
                err.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused
            ) =>
        {
            return Ok(None)
        }
        Err(err) => return Err(CacheError::new(format!("Cache connect failed: {}", err))),
    };
    stream
        .write_all(format!("{}\n", line).as_bytes())
        .await
        .map_err(|e| CacheError::new(format!("Cache write failed: {}", e)))?;
    stream.shutdown().await?;

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .map_err(|e| CacheError::new(format!("Cache read failed: {}", e)))?;
    Ok(Some(response.trim().to_string()))
}

fn decode(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

fn unexpected_response(response: &str) -> CacheError {
    CacheError::new(format!("Unexpected cache daemon response: {}", response))
}

/// Whole seconds, rounded up so a sub-second TTL never turns into "no expiry".
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0)
}

fn namespace_for(store_identity: &str) -> String {
    let hash = blake3::hash(store_identity.as_bytes());
    hash.to_hex()[..16].to_string()
}

fn set_socket_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}
