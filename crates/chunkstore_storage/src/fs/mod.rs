//! Filesystem providers and the store built on them.
//!
//! [`FileSystemStore`] maps keys to files under a root directory of any
//! [`FileSystem`] provider. Providers shipped here:
//!
//! - [`LocalFileSystem`] - the OS filesystem
//! - [`MemoryFileSystem`] - an in-process directory tree (`memory://`)
//!
//! Remote object stores plug in by implementing [`FileSystem`].

mod local;
mod memory;
mod provider;
mod resolve;
mod store;

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;
pub use provider::{is_missing, parent, FileInfo, FileKind, FileSystem};
pub use resolve::{split_protocol, url_to_fs};
pub use store::FileSystemStore;
