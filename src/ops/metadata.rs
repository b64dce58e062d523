//! Attribute and timestamp updates.

use super::{FsOperations, OpResult};
use crate::driver::FileInfo;
use crate::path;
use crate::status::STATUS_SUCCESS;
use crate::time::{self, FileTime};
use crate::vfs::FsError;

impl FsOperations {
    /// The backend has no attribute storage; accept and ignore.
    pub(crate) fn set_file_attributes(
        &self,
        _file_name: &str,
        _file_attributes: u32,
        _info: &mut FileInfo,
    ) -> OpResult {
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn set_file_time(
        &self,
        file_name: &str,
        _creation_time: Option<FileTime>,
        last_access_time: Option<FileTime>,
        last_write_time: Option<FileTime>,
        _info: &mut FileInfo,
    ) -> OpResult {
        let file_name = path::normalize(file_name);
        // Creation time is not settable through the backend contract.
        let accessed = last_access_time.and_then(time::filetime_to_system);
        let modified = last_write_time.and_then(time::filetime_to_system);
        match self.fs.settimes(&file_name, accessed, modified) {
            // Some programs demand this succeed; fake it for backends
            // without time storage.
            Err(FsError::Unsupported) => Ok(STATUS_SUCCESS),
            other => other.map(|()| STATUS_SUCCESS),
        }
    }
}
