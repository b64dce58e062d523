//! Volume-level queries, security and the lifecycle hooks.

use super::{FsOperations, OpResult};
use crate::driver::{FileInfo, FileSystemFlags, FindData};
use crate::path;
use crate::status::{
    STATUS_BUFFER_OVERFLOW, STATUS_NOT_IMPLEMENTED, STATUS_SUCCESS,
};

/// 100 GiB: claiming plenty of space fails gracefully at actual I/O,
/// while claiming none would pre-fail legal operations.
const FREE_BYTES: u64 = 100 * 1024 * 1024 * 1024;

impl FsOperations {
    pub(crate) fn get_disk_free_space(
        &self,
        free_bytes_available: &mut u64,
        total_number_of_bytes: &mut u64,
        total_number_of_free_bytes: &mut u64,
        _info: &mut FileInfo,
    ) -> OpResult {
        *total_number_of_free_bytes = FREE_BYTES;
        *total_number_of_bytes = 2 * FREE_BYTES;
        *free_bytes_available = *total_number_of_free_bytes;
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn get_volume_information(
        &self,
        volume_name: &mut [u16],
        serial_number: &mut u32,
        maximum_component_length: &mut u32,
        file_system_flags: &mut u32,
        file_system_name: &mut [u16],
        _info: &mut FileInfo,
    ) -> OpResult {
        write_wide(volume_name, &self.volume_name);
        *serial_number = 0;
        *maximum_component_length = 255;
        *file_system_flags = (FileSystemFlags::CASE_SENSITIVE_SEARCH
            | FileSystemFlags::CASE_PRESERVED_NAMES
            | FileSystemFlags::SUPPORTS_REMOTE_STORAGE
            | FileSystemFlags::UNICODE_ON_DISK
            | FileSystemFlags::PERSISTENT_ACLS)
            .bits();
        write_wide(file_system_name, &self.fs_name);
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn get_file_security(
        &self,
        file_name: &str,
        security_information: u32,
        descriptor: &mut [u8],
        length_needed: &mut u32,
        _info: &mut FileInfo,
    ) -> OpResult {
        let file_name = path::normalize(file_name);
        if self.fs.isdir(&file_name) {
            // Backend directories borrow the descriptor of a real host
            // directory; files have nothing sensible to offer.
            let ok = self.driver.read_directory_security(
                &self.security_template_dir,
                security_information,
                descriptor,
                length_needed,
            );
            return Ok(if ok { STATUS_SUCCESS } else { STATUS_BUFFER_OVERFLOW });
        }
        Ok(STATUS_NOT_IMPLEMENTED)
    }

    pub(crate) fn set_file_security(
        &self,
        _file_name: &str,
        _security_information: u32,
        _descriptor: &mut [u8],
        _length_needed: &mut u32,
        _info: &mut FileInfo,
    ) -> OpResult {
        Ok(STATUS_NOT_IMPLEMENTED)
    }

    pub(crate) fn find_streams(
        &self,
        _file_name: &str,
        _fill: &mut dyn FnMut(&FindData),
        _info: &mut FileInfo,
    ) -> OpResult {
        Ok(STATUS_NOT_IMPLEMENTED)
    }

    pub(crate) fn mounted(&self, _info: &mut FileInfo) -> OpResult {
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn unmounted(&self, _info: &mut FileInfo) -> OpResult {
        Ok(STATUS_SUCCESS)
    }
}

/// Copy `value` into a fixed-capacity UTF-16 buffer, truncating and
/// NUL-terminating the way the native calls do.
fn write_wide(buf: &mut [u16], value: &str) {
    if buf.is_empty() {
        return;
    }
    let mut n = 0;
    for unit in value.encode_utf16().take(buf.len() - 1) {
        buf[n] = unit;
        n += 1;
    }
    buf[n] = 0;
}
