//! # smbfs
//!
//! A hierarchical-filesystem adapter over SMB shares.
//!
//! One authenticated session to one share on one server is presented as a
//! mountable file system with paths, directory listing, attributes and
//! seekable byte channels. Key components:
//!
//! - [`SmbFileSystemProvider`] - Registry of open file systems, keyed by
//!   `user@host/share`, and dispatch of path operations
//! - [`SmbFileSystem`] - One mounted share
//! - [`SmbPath`] - Path algebra with the `\` separator
//! - [`SmbByteChannel`] - Positioned reads and writes on a remote file
//! - [`DirectoryStream`] - One-shot filtered directory listing
//! - [`session`] - The remote session capability the file system drives
//! - [`backends::MemoryServer`] - In-memory share server
//!
//! ## Design Decisions
//!
//! - **Blocking calls**: every remote operation blocks the caller. No
//!   timeouts or retries are layered on top of the session.
//! - **Transient share connections**: each operation connects to the
//!   share and disconnects on every exit path. Channels hold theirs until
//!   closed.
//! - **Explicit not-implemented**: operations a share cannot express fail
//!   with [`SmbFsError::NotImplemented`] instead of answering wrongly.

pub mod backends;
mod channel;
mod config;
mod dir_stream;
mod error;
mod filesystem;
mod ops;
mod path;
mod provider;
pub mod session;
mod types;
mod uri;

#[cfg(test)]
mod testing;

pub use channel::SmbByteChannel;
pub use config::{DEFAULT_COPY_BUFFER_SIZE, FsConfig};
pub use dir_stream::DirectoryStream;
pub use error::{SmbFsError, SmbFsResult};
pub use filesystem::SmbFileSystem;
pub use ops::{FileSystemLike, PathLike};
pub use path::{SEPARATOR, SmbPath};
pub use provider::{SCHEME, SmbFileSystemProvider};
pub use session::{DEFAULT_PORT, NtStatus, ProtocolError};
pub use types::{
    AccessMode, AttributeView, BasicFileAttributes, CopyOptions, FileAttribute, OpenOptions,
};
pub use uri::ShareUri;
