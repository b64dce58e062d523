//! Virtual filesystem contract consumed by the adapter.
//!
//! The dispatcher drives any backend through these traits; nothing here
//! is driver-specific. All paths are in canonical form (leading slash,
//! forward slashes), produced by [`crate::path::normalize`].

use std::io::SeekFrom;
use std::time::SystemTime;

/// Convenient result alias used by all VFS operations.
pub type FsResult<T> = Result<T, FsError>;

/// Error kinds a backend may report.
///
/// These are kinds, not payloads: the adapter only ever needs to pick an
/// NT status for the driver, which `crate::status` does.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FsError {
    /// The path does not name an existing resource.
    NotFound,
    /// The path or an argument is malformed.
    Invalid,
    /// The backend refused access.
    PermissionDenied,
    /// The resource is locked by someone else.
    Locked,
    /// A directory that should be empty is not.
    NotEmpty,
    /// The destination already exists.
    AlreadyExists,
    /// The backend is out of space.
    NoSpace,
    /// A remote backend lost its connection.
    NetworkDown,
    /// The backend does not implement the operation.
    Unsupported,
    /// A handle number not present in the registry.
    InvalidHandle,
    /// Anything the other kinds do not cover.
    Other,
}

/// Mode a stream was opened with.
///
/// Kept with the handle so the stream can be reopened with the same
/// semantics when the driver issues I/O after the cleanup phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Read/write positioned at the start; the file must exist.
    ReadWrite,
    /// Read/write, creating the file or truncating an existing one.
    Truncate,
}

/// `S_IFMT` mask over [`ResourceInfo::st_mode`].
pub const S_IFMT: u32 = 0o170_000;
/// Directory bit pattern.
pub const S_IFDIR: u32 = 0o040_000;
/// Regular-file bit pattern.
pub const S_IFREG: u32 = 0o100_000;

/// Metadata record returned by [`Vfs::getinfo`], covering the basic and
/// details namespaces in one flat struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    /// POSIX-style mode bits; only the `S_IFMT` portion matters here.
    pub st_mode: u32,
    pub created: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
    pub modified: Option<SystemTime>,
    /// Size in bytes; 0 for directories.
    pub size: u64,
}

impl ResourceInfo {
    pub fn is_dir(&self) -> bool {
        self.st_mode & S_IFMT == S_IFDIR
    }

    pub fn is_file(&self) -> bool {
        self.st_mode & S_IFMT == S_IFREG
    }
}

/// The backend capability set.
///
/// Implementations must be callable from any driver worker thread.
pub trait Vfs: Send + Sync {
    fn exists(&self, path: &str) -> bool;

    fn isdir(&self, path: &str) -> bool;

    fn isfile(&self, path: &str) -> bool;

    /// Create a directory. `Ok(true)` when a directory was created.
    fn make_dir(&self, path: &str) -> FsResult<bool>;

    /// Open a stream on a file.
    fn open(&self, path: &str, mode: OpenMode) -> FsResult<Box<dyn VfsFile>>;

    /// Child names of a directory.
    fn listdir(&self, path: &str) -> FsResult<Vec<String>>;

    /// Child names of a directory, each with its metadata.
    fn listdirinfo(&self, path: &str) -> FsResult<Vec<(String, ResourceInfo)>>;

    fn getinfo(&self, path: &str) -> FsResult<ResourceInfo>;

    /// Update access/modification times; `None` leaves a time unchanged.
    fn settimes(
        &self,
        path: &str,
        accessed: Option<SystemTime>,
        modified: Option<SystemTime>,
    ) -> FsResult<()>;

    /// Remove a file.
    fn remove(&self, path: &str) -> FsResult<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &str) -> FsResult<()>;

    /// Move a file, replacing the destination when `overwrite` is set.
    fn move_file(&self, src: &str, dst: &str, overwrite: bool) -> FsResult<()>;

    /// Move a directory, creating the destination when `create` is set.
    fn move_dir(&self, src: &str, dst: &str, create: bool) -> FsResult<()>;
}

/// An open stream handed out by [`Vfs::open`].
///
/// A closed stream keeps answering `mode` and `closed` so the adapter
/// can reopen it transparently after the driver's cleanup phase.
pub trait VfsFile: Send {
    /// Read into `buf`, returning the number of bytes read; 0 at EOF.
    fn read(&mut self, buf: &mut [u8]) -> FsResult<usize>;

    /// Write from `data`, returning the number of bytes written.
    fn write(&mut self, data: &[u8]) -> FsResult<usize>;

    fn seek(&mut self, pos: SeekFrom) -> FsResult<u64>;

    /// Current stream position.
    fn tell(&self) -> u64;

    /// Drop everything past the current position.
    fn truncate(&mut self) -> FsResult<()>;

    fn flush(&mut self) -> FsResult<()>;

    /// Close the stream. Closing an already closed stream is a no-op.
    fn close(&mut self) -> FsResult<()>;

    fn mode(&self) -> OpenMode;

    fn closed(&self) -> bool;
}
