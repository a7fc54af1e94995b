//! Path and filesystem capability traits.
//!
//! [`PathLike`] is the hierarchical-name algebra, [`FileSystemLike`] the set
//! of operations a mounted share answers. Operations the share cannot
//! express have default bodies that fail with
//! [`SmbFsError::NotImplemented`], so callers can tell "unsupported" apart
//! from a negative answer.

use std::convert::Infallible;
use std::fmt;

use crate::dir_stream::DirectoryStream;
use crate::error::{SmbFsError, SmbFsResult};
use crate::types::{AccessMode, BasicFileAttributes, FileAttribute, OpenOptions};

/// Immutable hierarchical name.
pub trait PathLike: Sized + Clone + fmt::Display + Ord {
    /// True when the path hangs off the filesystem root.
    fn is_absolute(&self) -> bool;

    /// The filesystem root for absolute paths, `None` otherwise.
    fn root(&self) -> Option<Self>;

    /// Last segment as a relative path. `None` for the root.
    fn file_name(&self) -> Option<Self>;

    /// All but the last segment.
    ///
    /// A single-segment absolute path has the root as parent; a
    /// single-segment relative path has none.
    fn parent(&self) -> Option<Self>;

    /// Number of segments. Zero for the root.
    fn name_count(&self) -> usize;

    /// Segment `index` as a relative single-segment path.
    fn name(&self, index: usize) -> SmbFsResult<Self>;

    /// Segments `[begin, end)` as a relative path.
    fn subpath(&self, begin: usize, end: usize) -> SmbFsResult<Self>;

    /// Resolve `other` against this path.
    fn resolve(&self, other: &Self) -> Self;

    /// This path, made absolute.
    fn to_absolute_path(&self) -> SmbFsResult<Self>;

    fn starts_with(&self, other: &Self) -> SmbFsResult<bool> {
        let _ = other;
        Err(SmbFsError::not_implemented("starts_with"))
    }

    fn ends_with(&self, other: &Self) -> SmbFsResult<bool> {
        let _ = other;
        Err(SmbFsError::not_implemented("ends_with"))
    }

    fn normalize(&self) -> SmbFsResult<Self> {
        Err(SmbFsError::not_implemented("normalize"))
    }

    fn relativize(&self, other: &Self) -> SmbFsResult<Self> {
        let _ = other;
        Err(SmbFsError::not_implemented("relativize"))
    }

    fn resolve_sibling(&self, other: &Self) -> SmbFsResult<Self> {
        let _ = other;
        Err(SmbFsError::not_implemented("resolve_sibling"))
    }

    fn to_uri(&self) -> SmbFsResult<String> {
        Err(SmbFsError::not_implemented("to_uri"))
    }

    fn to_real_path(&self) -> SmbFsResult<Self> {
        Err(SmbFsError::not_implemented("to_real_path"))
    }

    /// Watch registration.
    fn register(&self) -> SmbFsResult<Infallible> {
        Err(SmbFsError::not_implemented("register"))
    }
}

/// Operations of one mounted share.
pub trait FileSystemLike {
    type Path: PathLike;
    type Channel;

    fn separator(&self) -> &'static str;

    /// The single root of the share.
    fn root_directories(&self) -> Vec<Self::Path>;

    /// Build a relative path from segments.
    fn get_path(&self, first: &str, more: &[&str]) -> SmbFsResult<Self::Path>;

    fn is_open(&self) -> bool;

    fn is_read_only(&self) -> bool;

    /// Deregister and release the session.
    fn close(&self) -> SmbFsResult<()>;

    /// List `dir`, keeping the entries `filter` accepts.
    fn new_directory_stream<F>(
        &self,
        dir: &Self::Path,
        filter: F,
    ) -> SmbFsResult<DirectoryStream<Self::Path>>
    where
        F: FnMut(&Self::Path) -> bool;

    fn read_attributes(&self, path: &Self::Path) -> SmbFsResult<BasicFileAttributes>;

    /// Succeeds iff the path exists. Modes are not checked.
    fn check_access(&self, path: &Self::Path, modes: &[AccessMode]) -> SmbFsResult<()>;

    fn new_byte_channel(
        &self,
        path: &Self::Path,
        options: OpenOptions,
        attrs: &[FileAttribute],
    ) -> SmbFsResult<Self::Channel>;

    /// Server-side copy within this share. The target must not exist.
    fn copy(&self, source: &Self::Path, target: &Self::Path) -> SmbFsResult<()>;

    fn file_stores(&self) -> SmbFsResult<Infallible> {
        Err(SmbFsError::not_implemented("file_stores"))
    }

    fn supported_file_attribute_views(&self) -> SmbFsResult<Infallible> {
        Err(SmbFsError::not_implemented("supported_file_attribute_views"))
    }

    fn path_matcher(&self, syntax_and_pattern: &str) -> SmbFsResult<Infallible> {
        let _ = syntax_and_pattern;
        Err(SmbFsError::not_implemented("path_matcher"))
    }

    fn user_principal_lookup_service(&self) -> SmbFsResult<Infallible> {
        Err(SmbFsError::not_implemented("user_principal_lookup_service"))
    }

    fn new_watch_service(&self) -> SmbFsResult<Infallible> {
        Err(SmbFsError::not_implemented("new_watch_service"))
    }
}
