//! The callback table handed to the driver.
//!
//! The native operations struct is a table of function pointers; here it
//! is an explicit struct of boxed callables, one per NT operation, built
//! by [`Operations::bind`] in `crate::ops`. A binding marshals each
//! kernel callback into the matching entry on whichever worker thread
//! the driver chooses, so every entry is `Send + Sync`.

use super::{CreateRequest, FileInfo, FileInformation, FindData};
use crate::status::NtStatus;
use crate::time::FileTime;

pub type CreateFileFn =
    Box<dyn Fn(&str, &CreateRequest, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type PathFn = Box<dyn Fn(&str, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type ReadFileFn =
    Box<dyn Fn(&str, &mut [u8], &mut u32, i64, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type WriteFileFn =
    Box<dyn Fn(&str, &[u8], &mut u32, i64, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type GetFileInformationFn =
    Box<dyn Fn(&str, &mut FileInformation, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type FindFilesFn =
    Box<dyn Fn(&str, &mut dyn FnMut(&FindData), &mut FileInfo) -> NtStatus + Send + Sync>;
pub type FindFilesWithPatternFn =
    Box<dyn Fn(&str, &str, &mut dyn FnMut(&FindData), &mut FileInfo) -> NtStatus + Send + Sync>;
pub type SetFileAttributesFn = Box<dyn Fn(&str, u32, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type SetFileTimeFn = Box<
    dyn Fn(&str, Option<FileTime>, Option<FileTime>, Option<FileTime>, &mut FileInfo) -> NtStatus
        + Send
        + Sync,
>;
pub type MoveFileFn = Box<dyn Fn(&str, &str, bool, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type OffsetFn = Box<dyn Fn(&str, i64, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type DiskSpaceFn =
    Box<dyn Fn(&mut u64, &mut u64, &mut u64, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type VolumeInformationFn = Box<
    dyn Fn(&mut [u16], &mut u32, &mut u32, &mut u32, &mut [u16], &mut FileInfo) -> NtStatus
        + Send
        + Sync,
>;
pub type LockFn = Box<dyn Fn(&str, i64, i64, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type FileSecurityFn =
    Box<dyn Fn(&str, u32, &mut [u8], &mut u32, &mut FileInfo) -> NtStatus + Send + Sync>;
pub type InfoFn = Box<dyn Fn(&mut FileInfo) -> NtStatus + Send + Sync>;

/// One entry per driver callback.
pub struct Operations {
    pub zw_create_file: CreateFileFn,
    pub cleanup: PathFn,
    pub close_file: PathFn,
    pub read_file: ReadFileFn,
    pub write_file: WriteFileFn,
    pub flush_file_buffers: PathFn,
    pub get_file_information: GetFileInformationFn,
    pub find_files: FindFilesFn,
    pub find_files_with_pattern: FindFilesWithPatternFn,
    pub set_file_attributes: SetFileAttributesFn,
    pub set_file_time: SetFileTimeFn,
    pub delete_file: PathFn,
    pub delete_directory: PathFn,
    pub move_file: MoveFileFn,
    pub set_end_of_file: OffsetFn,
    pub set_allocation_size: OffsetFn,
    pub get_disk_free_space: DiskSpaceFn,
    pub get_volume_information: VolumeInformationFn,
    pub mounted: InfoFn,
    pub unmounted: InfoFn,
    pub get_file_security: FileSecurityFn,
    pub set_file_security: FileSecurityFn,
    pub lock_file: LockFn,
    pub unlock_file: LockFn,
    pub find_streams: FindFilesFn,
}
