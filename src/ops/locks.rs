//! Byte-range locks.
//!
//! Locks are advisory records in the registry, checked by read and
//! write; the backend never sees them.

use super::{FsOperations, OpResult};
use crate::driver::FileInfo;
use crate::path;
use crate::status::{STATUS_LOCK_NOT_GRANTED, STATUS_NOT_LOCKED, STATUS_SUCCESS};

impl FsOperations {
    pub(crate) fn lock_file(
        &self,
        file_name: &str,
        byte_offset: i64,
        length: i64,
        info: &mut FileInfo,
    ) -> OpResult {
        let file_name = path::normalize(file_name);
        if self.registry.add_lock(&file_name, info.context, byte_offset as u64, length as u64) {
            Ok(STATUS_SUCCESS)
        } else {
            Ok(STATUS_LOCK_NOT_GRANTED)
        }
    }

    pub(crate) fn unlock_file(
        &self,
        file_name: &str,
        byte_offset: i64,
        length: i64,
        info: &mut FileInfo,
    ) -> OpResult {
        let file_name = path::normalize(file_name);
        if self.registry.remove_lock(&file_name, info.context, byte_offset as u64, length as u64) {
            Ok(STATUS_SUCCESS)
        } else {
            Ok(STATUS_NOT_LOCKED)
        }
    }
}
