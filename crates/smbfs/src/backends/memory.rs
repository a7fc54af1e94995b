//! In-memory SMB server.
//!
//! Implements the session traits against shares held in memory. Used for
//! testing and for embedding callers that want a share without a network.
//! Names resolve case-insensitively and keep the case they were created
//! with. Every connection, tree connect, open and close is recorded as a
//! [`ServerEvent`] so callers can assert on release order.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::SystemTime;

use crate::session::{
    AccessMask, AuthContext, Client, Connection, CreateDisposition, CreateOptions,
    FileAllInformation, FileIdBothDirInfo, NtStatus, ProtocolError, RemoteFile, Session, Share,
};

/// Something the server observed, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Connected { host: String, port: u16 },
    Authenticated(String),
    TreeConnect(String),
    TreeDisconnect(String),
    FileOpened(String),
    FileClosed(String),
    Logoff(String),
    Disconnected(String),
}

#[derive(Debug, Clone, Copy)]
struct Times {
    created: SystemTime,
    accessed: SystemTime,
    modified: SystemTime,
    changed: SystemTime,
}

impl Times {
    fn now() -> Self {
        let now = SystemTime::now();
        Self {
            created: now,
            accessed: now,
            modified: now,
            changed: now,
        }
    }

    fn touch(&mut self) {
        let now = SystemTime::now();
        self.modified = now;
        self.changed = now;
    }
}

/// Entry in a share.
#[derive(Debug, Clone)]
enum Entry {
    File {
        name: String,
        data: Vec<u8>,
        times: Times,
    },
    Directory {
        name: String,
        times: Times,
    },
}

impl Entry {
    fn directory(name: &str) -> Self {
        Entry::Directory {
            name: name.to_string(),
            times: Times::now(),
        }
    }

    fn file(name: &str, data: Vec<u8>) -> Self {
        Entry::File {
            name: name.to_string(),
            data,
            times: Times::now(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Entry::File { name, .. } | Entry::Directory { name, .. } => name,
        }
    }

    fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory { .. })
    }

    fn size(&self) -> u64 {
        match self {
            Entry::File { data, .. } => data.len() as u64,
            Entry::Directory { .. } => 0,
        }
    }

    fn information(&self) -> FileAllInformation {
        let times = match self {
            Entry::File { times, .. } | Entry::Directory { times, .. } => *times,
        };
        FileAllInformation {
            is_directory: self.is_directory(),
            end_of_file: self.size(),
            creation_time: times.created,
            last_access_time: times.accessed,
            last_write_time: times.modified,
            change_time: times.changed,
        }
    }
}

/// A path split into segments, with its lookup key.
struct Normalized {
    segments: Vec<String>,
}

impl Normalized {
    /// Split on either separator, resolving `.` and `..`.
    fn new(path: &str) -> Self {
        let mut segments: Vec<String> = Vec::new();
        for seg in path.split(['\\', '/']) {
            match seg {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s.to_string()),
            }
        }
        Self { segments }
    }

    fn key(&self) -> String {
        Self::key_of(&self.segments)
    }

    fn parent_key(&self) -> String {
        Self::key_of(&self.segments[..self.segments.len().saturating_sub(1)])
    }

    fn key_of(segments: &[String]) -> String {
        segments.join("\\").to_lowercase()
    }

    fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

/// Content of one share, keyed by lowercased `\`-joined path. The root is
/// the empty key.
struct ShareData {
    entries: RwLock<HashMap<String, Entry>>,
}

impl ShareData {
    fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(String::new(), Entry::directory(""));
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Create every missing directory above `path`.
    fn ensure_parents(&self, path: &Normalized) {
        let mut entries = self.entries.write();
        for depth in 1..path.segments.len() {
            let prefix = &path.segments[..depth];
            entries
                .entry(Normalized::key_of(prefix))
                .or_insert_with(|| Entry::directory(&prefix[depth - 1]));
        }
    }
}

struct ServerState {
    users: RwLock<HashMap<String, String>>,
    /// Keyed by lowercased share name.
    shares: RwLock<HashMap<String, Arc<ShareData>>>,
    events: Mutex<Vec<ServerEvent>>,
    ports: Mutex<Vec<u16>>,
    open_connections: AtomicUsize,
    open_shares: AtomicUsize,
    open_files: AtomicUsize,
    fail_logoff: AtomicBool,
    fail_copy: AtomicBool,
}

impl ServerState {
    fn record(&self, event: ServerEvent) {
        self.events.lock().push(event);
    }
}

/// In-memory SMB server.
///
/// Cheap to clone; clones share the same state. Thread-safe via internal
/// locks. All data is lost when the last clone is dropped.
#[derive(Clone)]
pub struct MemoryServer {
    state: Arc<ServerState>,
}

impl Default for MemoryServer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryServer")
            .field("shares", &"<locked>")
            .field("open_connections", &self.open_connection_count())
            .finish()
    }
}

impl MemoryServer {
    /// Create a server with no users and no shares.
    pub fn new() -> Self {
        Self {
            state: Arc::new(ServerState {
                users: RwLock::new(HashMap::new()),
                shares: RwLock::new(HashMap::new()),
                events: Mutex::new(Vec::new()),
                ports: Mutex::new(Vec::new()),
                open_connections: AtomicUsize::new(0),
                open_shares: AtomicUsize::new(0),
                open_files: AtomicUsize::new(0),
                fail_logoff: AtomicBool::new(false),
                fail_copy: AtomicBool::new(false),
            }),
        }
    }

    /// Accept `user` with exactly `password`.
    pub fn add_user(&self, user: &str, password: &str) {
        self.state
            .users
            .write()
            .insert(user.to_string(), password.to_string());
    }

    /// Create an empty share. No-op if it exists.
    pub fn add_share(&self, name: &str) {
        self.share_data(name);
    }

    fn share_data(&self, name: &str) -> Arc<ShareData> {
        self.state
            .shares
            .write()
            .entry(name.to_lowercase())
            .or_insert_with(|| Arc::new(ShareData::new()))
            .clone()
    }

    /// Create a directory and any missing parents.
    pub fn create_dir(&self, share: &str, path: &str) {
        let data = self.share_data(share);
        let path = Normalized::new(path);
        if path.is_root() {
            return;
        }
        data.ensure_parents(&path);
        data.entries
            .write()
            .entry(path.key())
            .or_insert_with(|| Entry::directory(path.name()));
    }

    /// Create or replace a file, creating missing parents.
    pub fn put_file(&self, share: &str, path: &str, content: impl Into<Vec<u8>>) {
        let data = self.share_data(share);
        let path = Normalized::new(path);
        if path.is_root() {
            return;
        }
        data.ensure_parents(&path);
        data.entries
            .write()
            .insert(path.key(), Entry::file(path.name(), content.into()));
    }

    /// File content, or `None` if absent or a directory.
    pub fn read_file(&self, share: &str, path: &str) -> Option<Vec<u8>> {
        let data = self.state.shares.read().get(&share.to_lowercase())?.clone();
        let entries = data.entries.read();
        match entries.get(&Normalized::new(path).key())? {
            Entry::File { data, .. } => Some(data.clone()),
            Entry::Directory { .. } => None,
        }
    }

    /// Everything observed so far.
    pub fn events(&self) -> Vec<ServerEvent> {
        self.state.events.lock().clone()
    }

    pub fn clear_events(&self) {
        self.state.events.lock().clear();
    }

    /// Ports of every connect call, in order.
    pub fn connected_ports(&self) -> Vec<u16> {
        self.state.ports.lock().clone()
    }

    /// Make every logoff fail after it is recorded.
    pub fn fail_logoff(&self, fail: bool) {
        self.state.fail_logoff.store(fail, Ordering::SeqCst);
    }

    /// Make server-side copies answer with a malformed response.
    pub fn fail_copy(&self, fail: bool) {
        self.state.fail_copy.store(fail, Ordering::SeqCst);
    }

    pub fn open_connection_count(&self) -> usize {
        self.state.open_connections.load(Ordering::SeqCst)
    }

    pub fn open_share_count(&self) -> usize {
        self.state.open_shares.load(Ordering::SeqCst)
    }

    pub fn open_file_count(&self) -> usize {
        self.state.open_files.load(Ordering::SeqCst)
    }
}

impl Client for MemoryServer {
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn Connection>, ProtocolError> {
        self.state.ports.lock().push(port);
        self.state.record(ServerEvent::Connected {
            host: host.to_string(),
            port,
        });
        self.state.open_connections.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            state: self.state.clone(),
            host: host.to_string(),
            closed: AtomicBool::new(false),
        }))
    }
}

struct MemoryConnection {
    state: Arc<ServerState>,
    host: String,
    closed: AtomicBool,
}

impl Connection for MemoryConnection {
    fn authenticate(&self, auth: &AuthContext) -> Result<Box<dyn Session>, ProtocolError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(io::Error::from(io::ErrorKind::NotConnected).into());
        }
        let accepted = self
            .state
            .users
            .read()
            .get(&auth.username)
            .is_some_and(|password| *password == auth.password);
        if !accepted {
            return Err(ProtocolError::status(NtStatus::LogonFailure, &auth.username));
        }
        self.state
            .record(ServerEvent::Authenticated(auth.username.clone()));
        Ok(Box::new(MemorySession {
            state: self.state.clone(),
            user: auth.username.clone(),
            logged_off: AtomicBool::new(false),
        }))
    }

    fn close(&self) -> Result<(), ProtocolError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.state.open_connections.fetch_sub(1, Ordering::SeqCst);
            self.state
                .record(ServerEvent::Disconnected(self.host.clone()));
        }
        Ok(())
    }
}

struct MemorySession {
    state: Arc<ServerState>,
    user: String,
    logged_off: AtomicBool,
}

impl Session for MemorySession {
    fn connect_share(&self, name: &str) -> Result<Box<dyn Share>, ProtocolError> {
        if self.logged_off.load(Ordering::SeqCst) {
            return Err(ProtocolError::status(NtStatus::NetworkSessionExpired, name));
        }
        let data = self
            .state
            .shares
            .read()
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| ProtocolError::status(NtStatus::BadNetworkName, name))?;
        self.state.open_shares.fetch_add(1, Ordering::SeqCst);
        self.state.record(ServerEvent::TreeConnect(name.to_string()));
        Ok(Box::new(MemoryShare {
            state: self.state.clone(),
            name: name.to_string(),
            data,
            closed: AtomicBool::new(false),
        }))
    }

    fn logoff(&self) -> Result<(), ProtocolError> {
        self.state.record(ServerEvent::Logoff(self.user.clone()));
        if self.state.fail_logoff.load(Ordering::SeqCst) {
            return Err(io::Error::other("logoff rejected").into());
        }
        self.logged_off.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct MemoryShare {
    state: Arc<ServerState>,
    name: String,
    data: Arc<ShareData>,
    closed: AtomicBool,
}

impl MemoryShare {
    fn ensure_connected(&self, path: &str) -> Result<(), ProtocolError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(ProtocolError::status(NtStatus::FileClosed, path))
        } else {
            Ok(())
        }
    }
}

impl Share for MemoryShare {
    fn list(&self, path: &str) -> Result<Vec<FileIdBothDirInfo>, ProtocolError> {
        self.ensure_connected(path)?;
        let normalized = Normalized::new(path);
        let key = normalized.key();
        let entries = self.data.entries.read();

        match entries.get(&key) {
            Some(Entry::Directory { .. }) => {}
            Some(_) => return Err(ProtocolError::status(NtStatus::NotADirectory, path)),
            None => return Err(ProtocolError::status(NtStatus::ObjectNameNotFound, path)),
        }

        let mut children: Vec<FileIdBothDirInfo> = entries
            .iter()
            .filter(|(entry_key, _)| !entry_key.is_empty() && parent_key(entry_key) == key)
            .map(|(_, entry)| FileIdBothDirInfo {
                name: entry.name().to_string(),
                is_directory: entry.is_directory(),
                end_of_file: entry.size(),
            })
            .collect();
        children.sort_by_key(|info| info.name.to_lowercase());

        let dot = |name: &str| FileIdBothDirInfo {
            name: name.to_string(),
            is_directory: true,
            end_of_file: 0,
        };
        let mut listing = vec![dot("."), dot("..")];
        listing.extend(children);
        Ok(listing)
    }

    fn file_information(&self, path: &str) -> Result<FileAllInformation, ProtocolError> {
        self.ensure_connected(path)?;
        self.data
            .entries
            .read()
            .get(&Normalized::new(path).key())
            .map(Entry::information)
            .ok_or_else(|| ProtocolError::status(NtStatus::ObjectNameNotFound, path))
    }

    fn open_file(
        &self,
        path: &str,
        access: AccessMask,
        disposition: CreateDisposition,
        _options: CreateOptions,
    ) -> Result<Box<dyn RemoteFile>, ProtocolError> {
        self.ensure_connected(path)?;
        let normalized = Normalized::new(path);
        if normalized.is_root() {
            return Err(ProtocolError::status(NtStatus::FileIsADirectory, path));
        }
        let key = normalized.key();

        {
            let mut entries = self.data.entries.write();
            match entries.get(&normalized.parent_key()) {
                Some(Entry::Directory { .. }) => {}
                _ => return Err(ProtocolError::status(NtStatus::ObjectPathNotFound, path)),
            }

            match entries.get_mut(&key) {
                Some(Entry::Directory { .. }) => {
                    return Err(ProtocolError::status(NtStatus::FileIsADirectory, path));
                }
                Some(Entry::File { data, times, .. }) => match disposition {
                    CreateDisposition::Create => {
                        return Err(ProtocolError::status(NtStatus::ObjectNameCollision, path));
                    }
                    CreateDisposition::Open | CreateDisposition::OpenIf => {}
                    CreateDisposition::Overwrite
                    | CreateDisposition::OverwriteIf
                    | CreateDisposition::Supersede => {
                        data.clear();
                        times.touch();
                    }
                },
                None => match disposition {
                    CreateDisposition::Open | CreateDisposition::Overwrite => {
                        return Err(ProtocolError::status(NtStatus::ObjectNameNotFound, path));
                    }
                    CreateDisposition::Create
                    | CreateDisposition::OpenIf
                    | CreateDisposition::OverwriteIf
                    | CreateDisposition::Supersede => {
                        entries.insert(key.clone(), Entry::file(normalized.name(), Vec::new()));
                    }
                },
            }
        }

        self.state.open_files.fetch_add(1, Ordering::SeqCst);
        self.state.record(ServerEvent::FileOpened(path.to_string()));
        Ok(Box::new(MemoryFile {
            state: self.state.clone(),
            data: self.data.clone(),
            key,
            path: path.to_string(),
            access,
            closed: AtomicBool::new(false),
        }))
    }

    fn close(&self) -> Result<(), ProtocolError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.state.open_shares.fetch_sub(1, Ordering::SeqCst);
            self.state
                .record(ServerEvent::TreeDisconnect(self.name.clone()));
        }
        Ok(())
    }
}

fn parent_key(key: &str) -> &str {
    key.rsplit_once('\\').map(|(parent, _)| parent).unwrap_or("")
}

struct MemoryFile {
    state: Arc<ServerState>,
    data: Arc<ShareData>,
    key: String,
    path: String,
    access: AccessMask,
    closed: AtomicBool,
}

impl MemoryFile {
    fn check(&self, needs: AccessMask) -> Result<(), ProtocolError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ProtocolError::status(NtStatus::FileClosed, &self.path));
        }
        if !needs.is_empty() && !self.access.intersects(needs) {
            return Err(ProtocolError::status(NtStatus::AccessDenied, &self.path));
        }
        Ok(())
    }

    fn with_data<T>(
        &self,
        f: impl FnOnce(&mut Vec<u8>, &mut Times) -> T,
    ) -> Result<T, ProtocolError> {
        let mut entries = self.data.entries.write();
        match entries.get_mut(&self.key) {
            Some(Entry::File { data, times, .. }) => Ok(f(data, times)),
            Some(Entry::Directory { .. }) => {
                Err(ProtocolError::status(NtStatus::FileIsADirectory, &self.path))
            }
            None => Err(ProtocolError::status(NtStatus::ObjectNameNotFound, &self.path)),
        }
    }
}

const WRITE_ACCESS: AccessMask = AccessMask::FILE_WRITE_DATA.union(AccessMask::FILE_APPEND_DATA);

impl RemoteFile for MemoryFile {
    fn read(&self, buf: &mut [u8], offset: u64) -> Result<usize, ProtocolError> {
        self.check(AccessMask::FILE_READ_DATA)?;
        self.with_data(|data, times| {
            times.accessed = SystemTime::now();
            let start = usize::try_from(offset).unwrap_or(usize::MAX).min(data.len());
            let end = (start + buf.len()).min(data.len());
            buf[..end - start].copy_from_slice(&data[start..end]);
            end - start
        })
    }

    fn write(&self, buf: &[u8], offset: u64) -> Result<usize, ProtocolError> {
        self.check(WRITE_ACCESS)?;
        let invalid = || ProtocolError::status(NtStatus::InvalidParameter, &self.path);
        let offset = usize::try_from(offset).map_err(|_| invalid())?;
        let end = offset.checked_add(buf.len()).ok_or_else(invalid)?;
        self.with_data(|data, times| {
            if end > data.len() {
                data.resize(end, 0);
            }
            data[offset..end].copy_from_slice(buf);
            times.touch();
            buf.len()
        })
    }

    fn length(&self) -> Result<u64, ProtocolError> {
        self.check(AccessMask::empty())?;
        self.with_data(|data, _| data.len() as u64)
    }

    fn set_length(&self, length: u64) -> Result<(), ProtocolError> {
        self.check(WRITE_ACCESS)?;
        let length = usize::try_from(length)
            .map_err(|_| ProtocolError::status(NtStatus::InvalidParameter, &self.path))?;
        self.with_data(|data, times| {
            data.resize(length, 0);
            times.touch();
        })
    }

    fn remote_copy_to(&self, target: &dyn RemoteFile) -> Result<(), ProtocolError> {
        self.check(AccessMask::FILE_READ_DATA)?;
        if self.state.fail_copy.load(Ordering::SeqCst) {
            return Err(ProtocolError::Buffer(format!(
                "short copychunk response for {}",
                self.path
            )));
        }
        let content = self.with_data(|data, _| data.clone())?;
        target.set_length(0)?;
        target.write(&content, 0)?;
        Ok(())
    }

    fn close(&self) -> Result<(), ProtocolError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.state.open_files.fetch_sub(1, Ordering::SeqCst);
            self.state.record(ServerEvent::FileClosed(self.path.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> MemoryServer {
        let server = MemoryServer::new();
        server.add_user("user", "password");
        server.put_file("Share", "Dir\\File.txt", "hello");
        server
    }

    fn share(server: &MemoryServer) -> Box<dyn Share> {
        let connection = server.connect("host", 445).unwrap();
        let session = connection
            .authenticate(&AuthContext::new("user", "password"))
            .unwrap();
        session.connect_share("share").unwrap()
    }

    fn open(
        share: &dyn Share,
        path: &str,
        access: AccessMask,
        disposition: CreateDisposition,
    ) -> Result<Box<dyn RemoteFile>, ProtocolError> {
        share.open_file(path, access, disposition, CreateOptions::empty())
    }

    const READ: AccessMask = AccessMask::FILE_READ_DATA;
    const WRITE: AccessMask = AccessMask::FILE_WRITE_DATA;

    #[test]
    fn test_authentication() {
        let server = server();
        let connection = server.connect("host", 445).unwrap();
        let err = connection
            .authenticate(&AuthContext::new("user", "wrong"))
            .err()
            .unwrap();
        assert_eq!(err.nt_status(), Some(NtStatus::LogonFailure));
        let err = connection
            .authenticate(&AuthContext::new("nobody", "password"))
            .err()
            .unwrap();
        assert_eq!(err.nt_status(), Some(NtStatus::LogonFailure));
        assert!(connection.authenticate(&AuthContext::new("user", "password")).is_ok());
    }

    #[test]
    fn test_unknown_share() {
        let server = server();
        let connection = server.connect("host", 445).unwrap();
        let session = connection
            .authenticate(&AuthContext::new("user", "password"))
            .unwrap();
        let err = session.connect_share("missing").err().unwrap();
        assert_eq!(err.nt_status(), Some(NtStatus::BadNetworkName));

        session.logoff().unwrap();
        let err = session.connect_share("share").err().unwrap();
        assert_eq!(err.nt_status(), Some(NtStatus::NetworkSessionExpired));
    }

    #[test]
    fn test_list_is_case_insensitive_and_keeps_case() {
        let server = server();
        let share = share(&server);
        let names = |path: &str| -> Vec<String> {
            share.list(path).unwrap().into_iter().map(|i| i.name).collect()
        };
        assert_eq!(names("\\dir"), [".", "..", "File.txt"]);
        assert_eq!(names("\\"), [".", "..", "Dir"]);

        let err = share.list("\\dir\\file.txt").unwrap_err();
        assert_eq!(err.nt_status(), Some(NtStatus::NotADirectory));
        let err = share.list("\\nope").unwrap_err();
        assert_eq!(err.nt_status(), Some(NtStatus::ObjectNameNotFound));
    }

    #[test]
    fn test_file_information() {
        let server = server();
        let share = share(&server);
        let info = share.file_information("DIR/file.TXT").unwrap();
        assert!(!info.is_directory);
        assert_eq!(info.end_of_file, 5);
        assert!(share.file_information("\\").unwrap().is_directory);
    }

    #[test]
    fn test_dispositions() {
        let server = server();
        let share = share(&server);
        let share = share.as_ref();
        let rw = READ | WRITE;
        let status = |path: &str, disposition| {
            open(share, path, rw, disposition).err().and_then(|e| e.nt_status())
        };

        assert_eq!(
            status("dir\\file.txt", CreateDisposition::Create),
            Some(NtStatus::ObjectNameCollision)
        );
        assert_eq!(
            status("dir\\new.txt", CreateDisposition::Open),
            Some(NtStatus::ObjectNameNotFound)
        );
        assert_eq!(
            status("nope\\new.txt", CreateDisposition::OpenIf),
            Some(NtStatus::ObjectPathNotFound)
        );
        assert_eq!(
            status("dir", CreateDisposition::Open),
            Some(NtStatus::FileIsADirectory)
        );

        let file = open(share, "dir\\file.txt", rw, CreateDisposition::OverwriteIf).unwrap();
        assert_eq!(file.length().unwrap(), 0);
        file.close().unwrap();

        let file = open(share, "dir\\new.txt", rw, CreateDisposition::OpenIf).unwrap();
        assert_eq!(file.length().unwrap(), 0);
        file.close().unwrap();
        assert_eq!(server.read_file("share", "dir\\new.txt").unwrap(), b"");
    }

    #[test]
    fn test_access_checks() {
        let server = server();
        let share = share(&server);
        let file = open(share.as_ref(), "dir\\file.txt", WRITE, CreateDisposition::Open).unwrap();
        let err = file.read(&mut [0u8; 4], 0).unwrap_err();
        assert_eq!(err.nt_status(), Some(NtStatus::AccessDenied));
        file.write(b"J", 0).unwrap();
        file.close().unwrap();
        let err = file.write(b"x", 0).unwrap_err();
        assert_eq!(err.nt_status(), Some(NtStatus::FileClosed));
        assert_eq!(server.read_file("share", "dir\\file.txt").unwrap(), b"Jello");
    }

    #[test]
    fn test_remote_copy() {
        let server = server();
        let share = share(&server);
        let source = open(share.as_ref(), "dir\\file.txt", READ, CreateDisposition::Open).unwrap();
        let target = open(share.as_ref(), "copy.txt", WRITE, CreateDisposition::Create).unwrap();
        source.remote_copy_to(target.as_ref()).unwrap();
        target.close().unwrap();
        source.close().unwrap();
        assert_eq!(server.read_file("share", "copy.txt").unwrap(), b"hello");
        assert_eq!(server.open_file_count(), 0);
    }

    #[test]
    fn test_events_and_counters() {
        let server = server();
        let share = share(&server);
        let file = open(share.as_ref(), "dir\\file.txt", READ, CreateDisposition::Open).unwrap();
        assert_eq!(server.open_file_count(), 1);
        assert_eq!(server.open_share_count(), 1);
        file.close().unwrap();
        file.close().unwrap();
        share.close().unwrap();
        assert_eq!(
            server.events(),
            vec![
                ServerEvent::Connected { host: "host".into(), port: 445 },
                ServerEvent::Authenticated("user".into()),
                ServerEvent::TreeConnect("share".into()),
                ServerEvent::FileOpened("dir\\file.txt".into()),
                ServerEvent::FileClosed("dir\\file.txt".into()),
                ServerEvent::TreeDisconnect("share".into()),
            ]
        );
        assert_eq!(server.open_file_count(), 0);
        assert_eq!(server.open_share_count(), 0);
    }

    #[test]
    fn test_write_past_addressable_end() {
        let server = server();
        let share = share(&server);
        let file = open(share.as_ref(), "dir\\file.txt", WRITE, CreateDisposition::Open).unwrap();
        let err = file.write(b"x", u64::MAX).unwrap_err();
        assert_eq!(err.nt_status(), Some(NtStatus::InvalidParameter));
        assert_eq!(server.read_file("share", "dir\\file.txt").unwrap(), b"hello");
    }
}
