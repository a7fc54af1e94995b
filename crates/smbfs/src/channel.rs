//! Seekable byte channel over a remote file handle.
//!
//! The channel owns both the file handle and the transient share it was
//! opened on; closing the channel closes the file first, then the share.
//! Reads and writes take a single lock for the whole remote call plus the
//! cursor update, so concurrent callers never observe a torn position.

use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

use crate::error::{SmbFsError, SmbFsResult};
use crate::session::{NtStatus, ProtocolError, RemoteFile, Share};

struct Handles {
    file: Box<dyn RemoteFile>,
    share: Box<dyn Share>,
}

struct ChannelState {
    position: u64,
    /// `None` once closed.
    handles: Option<Handles>,
}

/// A positioned read/write channel on one remote file.
pub struct SmbByteChannel {
    path: String,
    append: bool,
    state: Mutex<ChannelState>,
    closed: AtomicBool,
}

impl SmbByteChannel {
    /// Wrap an open handle. In append mode every write lands at the
    /// current remote end of file.
    pub(crate) fn new(
        path: impl Into<String>,
        share: Box<dyn Share>,
        file: Box<dyn RemoteFile>,
        append: bool,
    ) -> Self {
        Self {
            path: path.into(),
            append,
            state: Mutex::new(ChannelState {
                position: 0,
                handles: Some(Handles { file, share }),
            }),
            closed: AtomicBool::new(false),
        }
    }

    /// Path the channel was opened on.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn closed_error(&self) -> SmbFsError {
        SmbFsError::illegal_state(format!("channel on {} is closed", self.path))
    }

    fn io_error(&self, e: ProtocolError) -> SmbFsError {
        SmbFsError::io(self.path.as_str(), e)
    }

    /// Read at the cursor and advance it by the count read. Returns 0 at
    /// end of file.
    pub fn read(&self, dst: &mut [u8]) -> SmbFsResult<usize> {
        let mut state = self.state.lock();
        let position = state.position;
        let handles = state.handles.as_ref().ok_or_else(|| self.closed_error())?;
        let count = handles
            .file
            .read(dst, position)
            .map_err(|e| self.io_error(e))?;
        state.position = position + count as u64;
        Ok(count)
    }

    /// Write at the cursor, or at end of file in append mode, and advance
    /// the cursor past the bytes written.
    pub fn write(&self, src: &[u8]) -> SmbFsResult<usize> {
        let mut state = self.state.lock();
        let handles = state.handles.as_ref().ok_or_else(|| self.closed_error())?;
        let offset = if self.append {
            handles.file.length().map_err(|e| self.io_error(e))?
        } else {
            state.position
        };
        if offset.checked_add(src.len() as u64).is_none() {
            let overflow = ProtocolError::status(NtStatus::InvalidParameter, &self.path);
            return Err(self.io_error(overflow));
        }
        let count = handles
            .file
            .write(src, offset)
            .map_err(|e| self.io_error(e))?;
        state.position = offset + count as u64;
        Ok(count)
    }

    /// Current cursor.
    pub fn position(&self) -> SmbFsResult<u64> {
        let state = self.state.lock();
        if state.handles.is_none() {
            return Err(self.closed_error());
        }
        Ok(state.position)
    }

    /// Move the cursor. Positions past end of file are allowed; a later
    /// write there extends the file.
    pub fn set_position(&self, position: u64) -> SmbFsResult<()> {
        let mut state = self.state.lock();
        if state.handles.is_none() {
            return Err(self.closed_error());
        }
        state.position = position;
        Ok(())
    }

    /// Remote file length.
    pub fn size(&self) -> SmbFsResult<u64> {
        let state = self.state.lock();
        let handles = state.handles.as_ref().ok_or_else(|| self.closed_error())?;
        handles.file.length().map_err(|e| self.io_error(e))
    }

    /// Set the remote length. The cursor is pulled back to `size` if it
    /// was beyond it.
    pub fn truncate(&self, size: u64) -> SmbFsResult<()> {
        let mut state = self.state.lock();
        let handles = state.handles.as_ref().ok_or_else(|| self.closed_error())?;
        handles
            .file
            .set_length(size)
            .map_err(|e| self.io_error(e))?;
        state.position = state.position.min(size);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    /// Close the file handle, then the share. Both are attempted; the
    /// first failure is returned. Closing twice is a no-op.
    pub fn close(&self) -> SmbFsResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let Some(handles) = self.state.lock().handles.take() else {
            return Ok(());
        };
        let file_closed = handles.file.close();
        let share_closed = handles.share.close();
        file_closed
            .and(share_closed)
            .map_err(|e| self.io_error(e))
    }
}

impl std::fmt::Debug for SmbByteChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmbByteChannel")
            .field("path", &self.path)
            .field("append", &self.append)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Drop for SmbByteChannel {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(path = %self.path, error = %e, "failed to close channel on drop");
        }
    }
}

impl io::Read for &SmbByteChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        SmbByteChannel::read(*self, buf).map_err(Into::into)
    }
}

impl io::Write for &SmbByteChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        SmbByteChannel::write(*self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Seek for &SmbByteChannel {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let target = match pos {
            io::SeekFrom::Start(n) => Some(n),
            io::SeekFrom::Current(delta) => self.position()?.checked_add_signed(delta),
            io::SeekFrom::End(delta) => self.size()?.checked_add_signed(delta),
        };
        let target = target.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek before start of file")
        })?;
        self.set_position(target)?;
        Ok(target)
    }
}

impl io::Read for SmbByteChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut &*self, buf)
    }
}

impl io::Write for SmbByteChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Seek for SmbByteChannel {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        io::Seek::seek(&mut &*self, pos)
    }
}
