//! Resolving connection strings to providers.

use super::local::LocalFileSystem;
use super::memory::{self, MemoryFileSystem};
use super::provider::FileSystem;
use crate::error::{StoreError, StoreResult};
use crate::options::StorageOptions;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Splits `"proto://rest"` into `(Some("proto"), "rest")`.
///
/// Strings without `://` have no protocol.
#[must_use]
pub fn split_protocol(url: &str) -> (Option<&str>, &str) {
    match url.split_once("://") {
        Some((protocol, rest)) if !protocol.is_empty() => (Some(protocol), rest),
        _ => (None, url),
    }
}

/// Resolves a connection string to a provider and a root path.
///
/// Supported forms:
///
/// | Connection string | Provider | Root |
/// |---|---|---|
/// | `/data/x`, `data/x` | [`LocalFileSystem`] | absolute path |
/// | `file:///data/x` | [`LocalFileSystem`] | `/data/x` |
/// | `memory://data/x` | new [`MemoryFileSystem`] | `/data/x` |
///
/// Every `memory://` resolution creates a separate tree. To share one, build
/// the store with [`FileSystemStore::with_filesystem`].
///
/// The returned root never ends in `/`; the filesystem root is returned as
/// an empty string.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedProtocol`] for any other protocol and
/// [`StoreError::InvalidUrl`] for a malformed `file://` URL.
///
/// [`FileSystemStore::with_filesystem`]: crate::FileSystemStore::with_filesystem
pub fn url_to_fs(url: &str, options: &StorageOptions) -> StoreResult<(Arc<dyn FileSystem>, String)> {
    let (protocol, rest) = split_protocol(url);
    debug!(url, ?protocol, "resolving filesystem");

    match protocol {
        None => {
            let fs: Arc<dyn FileSystem> =
                Arc::new(LocalFileSystem::new().with_sync_on_write(options.sync_on_write));
            Ok((fs, local_root(Path::new(rest))?))
        }
        Some("file") => {
            let parsed = Url::parse(url).map_err(|err| StoreError::InvalidUrl(err.to_string()))?;
            let path = parsed
                .to_file_path()
                .map_err(|()| StoreError::InvalidUrl(url.to_string()))?;
            let fs: Arc<dyn FileSystem> =
                Arc::new(LocalFileSystem::new().with_sync_on_write(options.sync_on_write));
            Ok((fs, local_root(&path)?))
        }
        Some("memory") => {
            let root = memory::normalize(rest).trim_end_matches('/').to_string();
            let fs: Arc<dyn FileSystem> = Arc::new(MemoryFileSystem::new());
            Ok((fs, root))
        }
        Some(other) => Err(StoreError::UnsupportedProtocol {
            protocol: other.to_string(),
        }),
    }
}

fn local_root(path: &Path) -> StoreResult<String> {
    let absolute = std::path::absolute(path)?;
    Ok(absolute
        .to_string_lossy()
        .trim_end_matches('/')
        .to_string())
}
