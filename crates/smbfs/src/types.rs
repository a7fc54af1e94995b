//! Core filesystem types.
//!
//! Generic open/copy option sets and the attribute value returned to
//! callers, plus the translation from open options to the access mask,
//! disposition and create options a share understands.

use bitflags::bitflags;
use std::time::SystemTime;
use strum::{Display, EnumString};

use crate::error::{SmbFsError, SmbFsResult};
use crate::session::{AccessMask, CreateDisposition, CreateOptions, FileAllInformation};

bitflags! {
    /// Open options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OpenOptions: u16 {
        /// Read access requested.
        const READ = 1 << 0;
        /// Write access requested.
        const WRITE = 1 << 1;
        /// Writes go to the end of the file.
        const APPEND = 1 << 2;
        /// Create if not exists.
        const CREATE = 1 << 3;
        /// Exclusive create (fail if exists).
        const CREATE_NEW = 1 << 4;
        /// Truncate to zero on open (with WRITE).
        const TRUNCATE_EXISTING = 1 << 5;
        /// Content and metadata written through.
        const SYNC = 1 << 6;
        /// Content written through.
        const DSYNC = 1 << 7;
        /// Not supported.
        const DELETE_ON_CLOSE = 1 << 8;
    }
}

impl OpenOptions {
    /// Options used by `new_output_stream` when the caller passes none.
    pub fn output_default() -> Self {
        Self::CREATE | Self::TRUNCATE_EXISTING | Self::WRITE
    }

    /// Access mask for the remote open.
    ///
    /// WRITE grants write-data, or append-data when APPEND is also set.
    /// Read-data is granted for READ, and also when neither READ nor WRITE
    /// is set. Callers building output streams often pass only WRITE.
    pub fn access_mask(&self) -> SmbFsResult<AccessMask> {
        if self.contains(Self::DELETE_ON_CLOSE) {
            return Err(SmbFsError::not_implemented("DELETE_ON_CLOSE"));
        }

        let read = self.contains(Self::READ);
        let write = self.contains(Self::WRITE);
        let append = write && self.contains(Self::APPEND);

        let mut mask = AccessMask::empty();
        if append {
            mask |= AccessMask::FILE_APPEND_DATA;
        } else if write {
            mask |= AccessMask::FILE_WRITE_DATA;
        }
        if read || !write {
            mask |= AccessMask::FILE_READ_DATA;
        }
        Ok(mask)
    }

    /// Create disposition for the remote open.
    pub fn create_disposition(&self) -> CreateDisposition {
        if self.contains(Self::CREATE_NEW) {
            CreateDisposition::Create
        } else if self.contains(Self::WRITE | Self::TRUNCATE_EXISTING) {
            CreateDisposition::OverwriteIf
        } else if self.contains(Self::CREATE) {
            CreateDisposition::OpenIf
        } else {
            CreateDisposition::Open
        }
    }

    /// Create options for the remote open.
    pub fn create_options(&self) -> CreateOptions {
        if self.intersects(Self::SYNC | Self::DSYNC) {
            CreateOptions::FILE_WRITE_THROUGH
        } else {
            CreateOptions::empty()
        }
    }
}

bitflags! {
    /// Copy options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CopyOptions: u8 {
        const REPLACE_EXISTING = 1 << 0;
        const COPY_ATTRIBUTES = 1 << 1;
        const ATOMIC_MOVE = 1 << 2;
        const NOFOLLOW_LINKS = 1 << 3;
    }
}

/// Access modes accepted by `check_access`. Only existence is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AccessMode {
    Read,
    Write,
    Execute,
}

/// Attribute views a caller may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AttributeView {
    Basic,
    Dos,
    Posix,
    Acl,
    Owner,
    User,
}

/// An initial attribute to apply when creating a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttribute {
    pub name: String,
    pub value: String,
}

impl FileAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Basic file attributes (size and type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicFileAttributes {
    is_directory: bool,
    size: u64,
    creation_time: SystemTime,
    last_access_time: SystemTime,
    last_modified_time: SystemTime,
}

impl BasicFileAttributes {
    pub fn is_regular_file(&self) -> bool {
        !self.is_directory
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Always false; shares are not asked about reparse points.
    pub fn is_symbolic_link(&self) -> bool {
        false
    }

    pub fn is_other(&self) -> bool {
        false
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Always `None`: shares expose no stable file key.
    pub fn file_key(&self) -> Option<u64> {
        None
    }

    pub fn creation_time(&self) -> SystemTime {
        self.creation_time
    }

    pub fn last_access_time(&self) -> SystemTime {
        self.last_access_time
    }

    pub fn last_modified_time(&self) -> SystemTime {
        self.last_modified_time
    }
}

impl From<FileAllInformation> for BasicFileAttributes {
    fn from(info: FileAllInformation) -> Self {
        Self {
            is_directory: info.is_directory,
            size: info.end_of_file,
            creation_time: info.creation_time,
            last_access_time: info.last_access_time,
            last_modified_time: info.last_write_time,
        }
    }
}
