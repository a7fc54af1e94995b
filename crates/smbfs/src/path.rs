//! Share paths.
//!
//! A path is an ordered list of name segments tied to the file system that
//! produced it. The share root is a distinguished value with no segments;
//! it renders as `\` yet is not itself absolute. Every other path is either
//! absolute (hangs off the root) or relative.
//!
//! Equality, ordering and hashing use the canonical `\`-joined form,
//! compared without regard to case, because shares resolve names
//! case-insensitively.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{SmbFsError, SmbFsResult};
use crate::filesystem::SmbFileSystem;
use crate::ops::PathLike;

/// Name separator on a share.
pub const SEPARATOR: &str = "\\";

/// Split user input on either separator, dropping empty segments.
fn segments(s: &str) -> impl Iterator<Item = &str> {
    s.split(['\\', '/']).filter(|seg| !seg.is_empty())
}

/// A path on an SMB share.
#[derive(Clone)]
pub struct SmbPath {
    fs: SmbFileSystem,
    absolute: bool,
    /// `None` for the share root.
    elements: Option<Vec<String>>,
}

impl SmbPath {
    /// The root of `fs`.
    pub(crate) fn root_of(fs: SmbFileSystem) -> Self {
        Self {
            fs,
            absolute: false,
            elements: None,
        }
    }

    /// Build a path from literal segments.
    ///
    /// Fails with `InvalidArgument` when `elements` is empty or a segment
    /// is empty or contains a separator.
    pub fn of<I, S>(fs: &SmbFileSystem, absolute: bool, elements: I) -> SmbFsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements: Vec<String> = elements.into_iter().map(Into::into).collect();
        if elements.is_empty() {
            return Err(SmbFsError::invalid_argument("path needs at least one element"));
        }
        if let Some(bad) = elements
            .iter()
            .find(|e| e.is_empty() || e.contains(['\\', '/']))
        {
            return Err(SmbFsError::invalid_argument(format!(
                "invalid path element: {bad:?}"
            )));
        }
        Ok(Self {
            fs: fs.clone(),
            absolute,
            elements: Some(elements),
        })
    }

    /// Parse user input into a relative path. Both separators split
    /// segments and empty segments are dropped, so leading separators do
    /// not make the result absolute.
    pub(crate) fn parse(fs: &SmbFileSystem, first: &str, more: &[&str]) -> SmbFsResult<Self> {
        let elements: Vec<String> = std::iter::once(first)
            .chain(more.iter().copied())
            .flat_map(segments)
            .map(str::to_string)
            .collect();

        if elements.is_empty() {
            return Err(SmbFsError::invalid_argument("empty path"));
        }
        Ok(Self {
            fs: fs.clone(),
            absolute: false,
            elements: Some(elements),
        })
    }

    fn with_elements(&self, absolute: bool, elements: Vec<String>) -> Self {
        Self {
            fs: self.fs.clone(),
            absolute,
            elements: Some(elements),
        }
    }

    /// The file system this path belongs to.
    pub fn file_system(&self) -> &SmbFileSystem {
        &self.fs
    }

    pub fn is_root(&self) -> bool {
        self.elements.is_none()
    }

    /// Segments as a slice. Empty for the root.
    pub fn elements(&self) -> &[String] {
        self.elements.as_deref().unwrap_or_default()
    }

    /// Each segment as a relative path, in order.
    pub fn names(&self) -> impl Iterator<Item = SmbPath> + '_ {
        self.elements()
            .iter()
            .map(|e| self.with_elements(false, vec![e.clone()]))
    }

    /// Append one listing entry name.
    pub(crate) fn child(&self, name: &str) -> Self {
        match &self.elements {
            None => self.with_elements(true, vec![name.to_string()]),
            Some(els) => {
                let mut els = els.clone();
                els.push(name.to_string());
                self.with_elements(self.absolute, els)
            }
        }
    }

    /// Parse `other` on this file system and resolve it against `self`.
    /// An empty string yields `self`; a leading separator resolves against
    /// the share root instead.
    pub fn resolve_str(&self, other: &str) -> SmbFsResult<Self> {
        if other.is_empty() {
            return Ok(self.clone());
        }
        let base = if other.starts_with(['\\', '/']) {
            Self::root_of(self.fs.clone())
        } else {
            self.clone()
        };
        if segments(other).next().is_none() {
            return Ok(base);
        }
        let other = Self::parse(&self.fs, other, &[])?;
        Ok(base.resolve(&other))
    }

    fn canonical(&self) -> String {
        match &self.elements {
            None => SEPARATOR.to_string(),
            Some(els) if self.absolute => format!("{SEPARATOR}{}", els.join(SEPARATOR)),
            Some(els) => els.join(SEPARATOR),
        }
    }

    fn folded(&self) -> String {
        self.canonical().to_lowercase()
    }

    fn check_index(&self, index: usize) -> SmbFsResult<&[String]> {
        match &self.elements {
            Some(els) if index < els.len() => Ok(els),
            _ => Err(SmbFsError::invalid_argument(format!(
                "index {index} out of range for {self}"
            ))),
        }
    }
}

impl PathLike for SmbPath {
    fn is_absolute(&self) -> bool {
        self.absolute
    }

    fn root(&self) -> Option<Self> {
        self.absolute.then(|| Self::root_of(self.fs.clone()))
    }

    fn file_name(&self) -> Option<Self> {
        let last = self.elements.as_ref()?.last()?;
        Some(self.with_elements(false, vec![last.clone()]))
    }

    fn parent(&self) -> Option<Self> {
        match &self.elements {
            Some(els) if els.len() > 1 => {
                Some(self.with_elements(self.absolute, els[..els.len() - 1].to_vec()))
            }
            _ => self.root(),
        }
    }

    fn name_count(&self) -> usize {
        self.elements().len()
    }

    fn name(&self, index: usize) -> SmbFsResult<Self> {
        let els = self.check_index(index)?;
        Ok(self.with_elements(false, vec![els[index].clone()]))
    }

    fn subpath(&self, begin: usize, end: usize) -> SmbFsResult<Self> {
        let els = self.check_index(begin)?;
        if end <= begin || end > els.len() {
            return Err(SmbFsError::invalid_argument(format!(
                "subpath [{begin}, {end}) out of range for {self}"
            )));
        }
        Ok(self.with_elements(false, els[begin..end].to_vec()))
    }

    fn resolve(&self, other: &Self) -> Self {
        let Some(theirs) = &other.elements else {
            return Self::root_of(self.fs.clone());
        };
        if other.absolute {
            return self.with_elements(true, theirs.clone());
        }
        match &self.elements {
            None => self.with_elements(true, theirs.clone()),
            Some(ours) => {
                let mut els = ours.clone();
                els.extend(theirs.iter().cloned());
                self.with_elements(self.absolute, els)
            }
        }
    }

    /// Relative paths, the root included, have no working directory to
    /// hang off and fail with `IllegalState`.
    fn to_absolute_path(&self) -> SmbFsResult<Self> {
        if self.absolute {
            Ok(self.clone())
        } else {
            Err(SmbFsError::illegal_state(format!(
                "no working directory to resolve {self} against"
            )))
        }
    }
}

impl fmt::Display for SmbPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl fmt::Debug for SmbPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SmbPath({:?} on {})", self.canonical(), self.fs.share())
    }
}

impl PartialEq for SmbPath {
    fn eq(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}

impl Eq for SmbPath {}

impl PartialOrd for SmbPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmbPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(&other.folded())
    }
}

impl Hash for SmbPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
    }
}
