//! Contract with the native driver binding.
//!
//! The adapter never links the driver library directly; it models the
//! surface it needs. A real binding implements [`Driver`] over the
//! native calls and marshals each kernel callback into the matching
//! [`Operations`] entry; the tests drive the same surface with a mock.

mod table;

use std::path::Path;

use bitflags::bitflags;
use num_derive::FromPrimitive;

pub use table::{
    CreateFileFn, DiskSpaceFn, FileSecurityFn, FindFilesFn, FindFilesWithPatternFn,
    GetFileInformationFn, InfoFn, LockFn, MoveFileFn, OffsetFn, Operations, PathFn, ReadFileFn,
    SetFileAttributesFn, SetFileTimeFn, VolumeInformationFn, WriteFileFn,
};

use crate::time::FileTime;

/// Lowest driver version the adapter is compatible with.
pub const MINIMUM_COMPATIBLE_VERSION: u16 = 110;

bitflags! {
    /// Mount-time behavior switches passed through to the driver.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct MountFlags: u32 {
        /// Emit driver debug output.
        const DEBUG = 1;
        /// Route debug output to stderr.
        const STDERR = 2;
        /// Enable alternate data streams.
        const ALT_STREAM = 4;
        /// Mount the volume write-protected.
        const WRITE_PROTECT = 8;
        /// Present the volume as a network drive.
        const NETWORK = 16;
        /// Present the volume as a removable drive.
        const REMOVABLE = 32;
        /// Register with the mount manager.
        const MOUNT_MANAGER = 64;
        /// Mount for the current session only.
        const CURRENT_SESSION = 128;
        /// Let user mode handle file locking.
        const FILELOCK_USER_MODE = 256;
    }
}

bitflags! {
    /// winnt file access rights, the subset the dispatcher inspects.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct DesiredAccess: u32 {
        const FILE_READ_DATA = 0x1;
        const FILE_WRITE_DATA = 0x2;
        const FILE_APPEND_DATA = 0x4;
        const FILE_READ_EA = 0x8;
        const FILE_WRITE_EA = 0x10;
        const FILE_EXECUTE = 0x20;
        const FILE_READ_ATTRIBUTES = 0x80;
        const FILE_WRITE_ATTRIBUTES = 0x100;
        const DELETE = 0x1_0000;
        const READ_CONTROL = 0x2_0000;
        const WRITE_DAC = 0x4_0000;
        const WRITE_OWNER = 0x8_0000;
        const SYNCHRONIZE = 0x10_0000;

        const FILE_GENERIC_READ = Self::READ_CONTROL.bits()
            | Self::FILE_READ_DATA.bits()
            | Self::FILE_READ_ATTRIBUTES.bits()
            | Self::FILE_READ_EA.bits()
            | Self::SYNCHRONIZE.bits();
        const FILE_GENERIC_WRITE = Self::READ_CONTROL.bits()
            | Self::FILE_WRITE_DATA.bits()
            | Self::FILE_WRITE_ATTRIBUTES.bits()
            | Self::FILE_WRITE_EA.bits()
            | Self::FILE_APPEND_DATA.bits()
            | Self::SYNCHRONIZE.bits();
    }
}

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ShareAccess: u32 {
        const READ = 0x1;
        const WRITE = 0x2;
        const DELETE = 0x4;
    }
}

bitflags! {
    /// NT create options, the subset the dispatcher inspects.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct CreateOptions: u32 {
        const DIRECTORY_FILE = 0x1;
        const WRITE_THROUGH = 0x2;
        const SEQUENTIAL_ONLY = 0x4;
        const NON_DIRECTORY_FILE = 0x40;
        const RANDOM_ACCESS = 0x800;
        const DELETE_ON_CLOSE = 0x1000;
    }
}

bitflags! {
    /// Volume capability flags reported via GetVolumeInformation.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct FileSystemFlags: u32 {
        const CASE_SENSITIVE_SEARCH = 0x1;
        const CASE_PRESERVED_NAMES = 0x2;
        const UNICODE_ON_DISK = 0x4;
        const PERSISTENT_ACLS = 0x8;
        const SUPPORTS_REMOTE_STORAGE = 0x100;
    }
}

/// NT create dispositions, in wire order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum CreateDisposition {
    Supersede = 0,
    Open = 1,
    Create = 2,
    OpenIf = 3,
    Overwrite = 4,
    OverwriteIf = 5,
}

pub const FILE_ATTRIBUTE_READONLY: u32 = 0x01;
pub const FILE_ATTRIBUTE_HIDDEN: u32 = 0x02;
pub const FILE_ATTRIBUTE_SYSTEM: u32 = 0x04;
pub const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x10;
pub const FILE_ATTRIBUTE_ARCHIVE: u32 = 0x20;
pub const FILE_ATTRIBUTE_NORMAL: u32 = 0x80;

/// Everything ZwCreateFile receives besides the path and the file info.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub desired_access: DesiredAccess,
    pub file_attributes: u32,
    pub share_access: ShareAccess,
    /// Raw disposition; parsed with [`CreateDisposition`] where needed.
    pub disposition: u32,
    pub create_options: CreateOptions,
}

/// Opaque driver token identifying an in-flight request; handed back to
/// the driver on deadline resets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct RequestInfo(pub u64);

/// Per-callback file context owned by the driver.
///
/// `context` is the adapter's slot: it holds the registry handle for
/// open streams and 0 otherwise. The driver preserves it between
/// callbacks on the same kernel file object.
#[derive(Debug, Clone, Default)]
pub struct FileInfo {
    pub context: u64,
    pub is_directory: bool,
    pub delete_on_close: bool,
    pub paging_io: bool,
    pub synchronous_io: bool,
    pub no_cache: bool,
    pub write_to_end_of_file: bool,
    pub process_id: u32,
    pub request: RequestInfo,
}

/// Find-data record delivered to the driver's fill callback during
/// directory enumeration.
#[derive(Debug, Clone, Default)]
pub struct FindData {
    pub file_attributes: u32,
    pub creation_time: FileTime,
    pub last_access_time: FileTime,
    pub last_write_time: FileTime,
    pub file_size_high: u32,
    pub file_size_low: u32,
    pub file_name: String,
    pub alternate_file_name: String,
}

/// Per-file record filled by GetFileInformation.
#[derive(Debug, Clone, Default)]
pub struct FileInformation {
    pub file_attributes: u32,
    pub creation_time: FileTime,
    pub last_access_time: FileTime,
    pub last_write_time: FileTime,
    pub volume_serial_number: u32,
    pub file_size_high: u32,
    pub file_size_low: u32,
    pub number_of_links: u32,
    pub file_index_high: u32,
    pub file_index_low: u32,
}

/// Options handed to the driver's main entry point.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub version: u16,
    /// Worker threads the driver should spawn; 0 means driver default.
    pub thread_count: u16,
    pub flags: MountFlags,
    pub mount_point: String,
    /// Per-operation deadline the driver enforces, in milliseconds.
    pub timeout_ms: u32,
    pub allocation_unit_size: u32,
    pub sector_size: u32,
}

/// The native library surface the adapter needs.
///
/// `main` runs the driver's event loop and blocks until the volume is
/// unmounted. `read_directory_security` is the Windows `GetFileSecurityW`
/// call against a real host directory, used to template descriptors for
/// backend directories.
pub trait Driver: Send + Sync {
    fn main(&self, options: &DriverOptions, operations: Operations) -> i32;

    fn remove_mount_point(&self, mount_point: &str) -> bool;

    /// Push out the deadline of the request identified by `info`.
    fn reset_timeout(&self, timeout_ms: u32, info: &RequestInfo) -> bool;

    /// The kernel's wildcard matcher used by FindFilesWithPattern.
    fn is_name_in_expression(&self, expression: &str, name: &str, ignore_case: bool) -> bool;

    /// Read `directory`'s security descriptor into `descriptor`, storing
    /// the required length in `length_needed`. False when the buffer is
    /// too small.
    fn read_directory_security(
        &self,
        directory: &Path,
        security_information: u32,
        descriptor: &mut [u8],
        length_needed: &mut u32,
    ) -> bool;
}
