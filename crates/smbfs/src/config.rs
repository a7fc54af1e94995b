//! File system creation options.
//!
//! The options map handed to `new_file_system`. Everything is optional;
//! an empty TOML document yields the defaults.
//!
//! ```toml
//! port = 4445
//! domain = "WORKGROUP"
//! copy_buffer_size = 131072
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::error::{SmbFsError, SmbFsResult};
use crate::session::DEFAULT_PORT;

/// Default chunk size for cross-filesystem stream copies.
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Options applied when opening a file system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    /// Port used when the URI has none.
    pub port: Option<u16>,

    /// Authentication domain.
    pub domain: Option<String>,

    /// Chunk size for stream copies between file systems.
    pub copy_buffer_size: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            port: None,
            domain: None,
            copy_buffer_size: DEFAULT_COPY_BUFFER_SIZE,
        }
    }
}

impl FsConfig {
    /// Parse options from a TOML document.
    pub fn from_toml_str(s: &str) -> SmbFsResult<Self> {
        toml::from_str(s)
            .map_err(|e| SmbFsError::invalid_argument(format!("file system config: {e}")))
    }

    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SmbFsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SmbFsError::invalid_argument(format!("{}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_copy_buffer_size(mut self, size: usize) -> Self {
        self.copy_buffer_size = size;
        self
    }

    /// Port to dial when the URI names none.
    pub fn default_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Copy chunk size, never zero.
    pub fn copy_buffer_size(&self) -> usize {
        self.copy_buffer_size.max(1)
    }
}
