//! One-shot directory listings.

use crate::error::{SmbFsError, SmbFsResult};

/// A materialized, filtered directory listing.
///
/// The entries are fetched when the stream is created. They can be taken
/// exactly once with [`iter`](Self::iter), and not at all after
/// [`close`](Self::close).
#[derive(Debug)]
pub struct DirectoryStream<P> {
    entries: Option<Vec<P>>,
    closed: bool,
}

impl<P> DirectoryStream<P> {
    pub(crate) fn new(entries: Vec<P>) -> Self {
        Self {
            entries: Some(entries),
            closed: false,
        }
    }

    /// Take the entries. Fails with `IllegalState` once closed or on a
    /// second call.
    pub fn iter(&mut self) -> SmbFsResult<std::vec::IntoIter<P>> {
        if self.closed {
            return Err(SmbFsError::illegal_state("directory stream is closed"));
        }
        self.entries
            .take()
            .map(Vec::into_iter)
            .ok_or_else(|| SmbFsError::illegal_state("directory stream already iterated"))
    }

    /// Release the entries. Idempotent.
    pub fn close(&mut self) {
        self.closed = true;
        self.entries = None;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
