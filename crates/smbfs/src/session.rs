//! Remote session capability.
//!
//! The wire protocol (framing, negotiation, the authentication handshake)
//! lives behind these traits. The filesystem layer only needs to open a
//! connection, authenticate a session, connect to a share and issue a
//! handful of file calls against it.
//!
//! All calls block the caller. Implementations must be `Send + Sync` so a
//! single [`Session`] can serve concurrent share connections.

use bitflags::bitflags;
use std::fmt;
use std::io;
use std::time::SystemTime;
use strum::Display;
use thiserror::Error;

/// Standard SMB port, used when neither the URI nor the config names one.
pub const DEFAULT_PORT: u16 = 445;

/// Status codes a share can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NtStatus {
    #[strum(serialize = "STATUS_OBJECT_NAME_NOT_FOUND")]
    ObjectNameNotFound,
    #[strum(serialize = "STATUS_OBJECT_PATH_NOT_FOUND")]
    ObjectPathNotFound,
    #[strum(serialize = "STATUS_OBJECT_NAME_COLLISION")]
    ObjectNameCollision,
    #[strum(serialize = "STATUS_ACCESS_DENIED")]
    AccessDenied,
    #[strum(serialize = "STATUS_LOGON_FAILURE")]
    LogonFailure,
    #[strum(serialize = "STATUS_BAD_NETWORK_NAME")]
    BadNetworkName,
    #[strum(serialize = "STATUS_FILE_IS_A_DIRECTORY")]
    FileIsADirectory,
    #[strum(serialize = "STATUS_NOT_A_DIRECTORY")]
    NotADirectory,
    #[strum(serialize = "STATUS_FILE_CLOSED")]
    FileClosed,
    #[strum(serialize = "STATUS_NETWORK_SESSION_EXPIRED")]
    NetworkSessionExpired,
    #[strum(serialize = "STATUS_INVALID_PARAMETER")]
    InvalidParameter,
}

impl NtStatus {
    /// The 32-bit status value carried in response headers.
    pub fn code(&self) -> u32 {
        match self {
            NtStatus::ObjectNameNotFound => 0xC000_0034,
            NtStatus::ObjectPathNotFound => 0xC000_003A,
            NtStatus::ObjectNameCollision => 0xC000_0035,
            NtStatus::AccessDenied => 0xC000_0022,
            NtStatus::LogonFailure => 0xC000_006D,
            NtStatus::BadNetworkName => 0xC000_00CC,
            NtStatus::FileIsADirectory => 0xC000_00BA,
            NtStatus::NotADirectory => 0xC000_0103,
            NtStatus::FileClosed => 0xC000_0128,
            NtStatus::NetworkSessionExpired => 0xC000_035C,
            NtStatus::InvalidParameter => 0xC000_000D,
        }
    }
}

/// Failure reported by the remote side or the transport beneath it.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The server answered with an error status.
    #[error("{status} (0x{code:08x}) on {path}", code = .status.code())]
    Status { status: NtStatus, path: String },

    /// A response could not be decoded.
    #[error("malformed response buffer: {0}")]
    Buffer(String),

    /// Socket-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}

impl ProtocolError {
    /// Create a Status error.
    pub fn status(status: NtStatus, path: impl Into<String>) -> Self {
        Self::Status {
            status,
            path: path.into(),
        }
    }

    /// The status code, if the server sent one.
    pub fn nt_status(&self) -> Option<NtStatus> {
        match self {
            ProtocolError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

bitflags! {
    /// Permissions requested when opening a remote handle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessMask: u32 {
        const FILE_READ_DATA = 0x0000_0001;
        const FILE_WRITE_DATA = 0x0000_0002;
        const FILE_APPEND_DATA = 0x0000_0004;
    }
}

bitflags! {
    /// Extra behaviour requested at open time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CreateOptions: u32 {
        const FILE_WRITE_THROUGH = 0x0000_0002;
    }
}

/// What the server does when the target does or does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[repr(u32)]
pub enum CreateDisposition {
    /// Replace if present, create otherwise.
    Supersede = 0,
    /// Open only if present.
    Open = 1,
    /// Create only if absent.
    Create = 2,
    /// Open if present, create otherwise.
    OpenIf = 3,
    /// Open and truncate, fail if absent.
    Overwrite = 4,
    /// Open and truncate, create if absent.
    OverwriteIf = 5,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdBothDirInfo {
    pub name: String,
    pub is_directory: bool,
    pub end_of_file: u64,
}

/// Remote file information, as returned by a query-info call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAllInformation {
    pub is_directory: bool,
    /// Logical file size in bytes.
    pub end_of_file: u64,
    pub creation_time: SystemTime,
    pub last_access_time: SystemTime,
    pub last_write_time: SystemTime,
    pub change_time: SystemTime,
}

/// Credentials presented when authenticating a session.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub username: String,
    pub password: String,
    pub domain: Option<String>,
}

impl AuthContext {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("domain", &self.domain)
            .finish()
    }
}

/// Entry point to a remote host.
pub trait Client: Send + Sync {
    /// Open a transport connection and negotiate a dialect.
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn Connection>, ProtocolError>;
}

/// A negotiated transport connection.
pub trait Connection: Send + Sync {
    /// Run the authentication handshake and return the resulting session.
    fn authenticate(&self, auth: &AuthContext) -> Result<Box<dyn Session>, ProtocolError>;

    fn close(&self) -> Result<(), ProtocolError>;
}

/// An authenticated session on a connection.
pub trait Session: Send + Sync {
    /// Tree-connect to a named share.
    fn connect_share(&self, name: &str) -> Result<Box<dyn Share>, ProtocolError>;

    fn logoff(&self) -> Result<(), ProtocolError>;
}

/// A tree connection to one share.
///
/// Paths are in canonical form, `\`-separated, relative to the share root.
pub trait Share: Send + Sync {
    /// List a directory, including the `.` and `..` entries.
    fn list(&self, path: &str) -> Result<Vec<FileIdBothDirInfo>, ProtocolError>;

    fn file_information(&self, path: &str) -> Result<FileAllInformation, ProtocolError>;

    fn open_file(
        &self,
        path: &str,
        access: AccessMask,
        disposition: CreateDisposition,
        options: CreateOptions,
    ) -> Result<Box<dyn RemoteFile>, ProtocolError>;

    /// Tree-disconnect.
    fn close(&self) -> Result<(), ProtocolError>;
}

/// An open remote file handle.
pub trait RemoteFile: Send + Sync {
    /// Read at `offset`. Returns 0 at end of file.
    fn read(&self, buf: &mut [u8], offset: u64) -> Result<usize, ProtocolError>;

    /// Write at `offset`, extending the file as needed.
    fn write(&self, buf: &[u8], offset: u64) -> Result<usize, ProtocolError>;

    fn length(&self) -> Result<u64, ProtocolError>;

    fn set_length(&self, length: u64) -> Result<(), ProtocolError>;

    /// Server-side copy of this file's content into `target`.
    fn remote_copy_to(&self, target: &dyn RemoteFile) -> Result<(), ProtocolError>;

    fn close(&self) -> Result<(), ProtocolError>;
}
