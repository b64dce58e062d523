//! Open, cleanup and close.

use num_traits::FromPrimitive;
use tracing::debug;

use super::{FsOperations, OpResult};
use crate::driver::{CreateDisposition, CreateOptions, CreateRequest, DesiredAccess, FileInfo};
use crate::path;
use crate::registry::MIN_HANDLE;
use crate::status::{
    ERROR_ALREADY_EXISTS, FILE_DOES_NOT_EXIST, FILE_OVERWRITTEN, FILE_SUPERSEDED,
    STATUS_ACCESS_DENIED, STATUS_SUCCESS,
};
use crate::vfs::OpenMode;

impl FsOperations {
    pub(crate) fn zw_create_file(
        &self,
        file_name: &str,
        request: &CreateRequest,
        info: &mut FileInfo,
    ) -> OpResult {
        let file_name = path::normalize(file_name);
        // A path marked for deletion cannot be opened anew.
        if self.registry.is_pending_delete(&file_name) {
            return Ok(STATUS_ACCESS_DENIED);
        }

        let disposition = CreateDisposition::from_u32(request.disposition);
        let data_access = DesiredAccess::FILE_READ_DATA
            | DesiredAccess::FILE_WRITE_DATA
            | DesiredAccess::FILE_APPEND_DATA
            | DesiredAccess::FILE_EXECUTE;
        if !request.desired_access.intersects(data_access)
            && matches!(
                disposition,
                Some(CreateDisposition::Open) | Some(CreateDisposition::Create)
            )
        {
            // ZwCreateFile forbids these rights when opening or creating
            // a directory, so their absence marks a directory request.
            info.is_directory = false;
        }

        if self.fs.isdir(&file_name) || info.is_directory {
            info.is_directory = true;
            return Ok(match disposition {
                Some(CreateDisposition::Open) => {
                    if self.fs.exists(&file_name) {
                        STATUS_SUCCESS
                    } else {
                        FILE_DOES_NOT_EXIST
                    }
                }
                Some(CreateDisposition::Create) => {
                    if self.fs.make_dir(&file_name)? {
                        STATUS_SUCCESS
                    } else {
                        FILE_DOES_NOT_EXIST
                    }
                }
                Some(CreateDisposition::OpenIf) => {
                    if self.fs.exists(&file_name) || self.fs.make_dir(&file_name)? {
                        STATUS_SUCCESS
                    } else {
                        FILE_DOES_NOT_EXIST
                    }
                }
                _ => STATUS_SUCCESS,
            });
        }

        if request.desired_access.is_empty() {
            return Ok(FILE_DOES_NOT_EXIST);
        }
        let mut action = STATUS_SUCCESS;
        let mode = match disposition {
            Some(CreateDisposition::Open) => {
                if !self.fs.exists(&file_name) {
                    return Ok(FILE_DOES_NOT_EXIST);
                }
                OpenMode::ReadWrite
            }
            Some(CreateDisposition::Create) => {
                if self.fs.exists(&file_name) {
                    return Ok(ERROR_ALREADY_EXISTS);
                }
                OpenMode::Truncate
            }
            Some(CreateDisposition::Overwrite) => {
                if !self.fs.exists(&file_name) {
                    return Ok(FILE_DOES_NOT_EXIST);
                }
                OpenMode::Truncate
            }
            Some(CreateDisposition::OverwriteIf) => {
                action = FILE_OVERWRITTEN;
                OpenMode::Truncate
            }
            Some(CreateDisposition::Supersede) => {
                action = FILE_SUPERSEDED;
                OpenMode::Truncate
            }
            Some(CreateDisposition::OpenIf) => OpenMode::Truncate,
            None => OpenMode::ReadWrite,
        };

        let file = self.fs.open(&file_name, mode)?;
        info.context = self.registry.register(file, &file_name, mode);
        debug!(path = %file_name, handle = info.context, ?mode, "opened");
        if action == STATUS_SUCCESS && request.create_options.contains(CreateOptions::DELETE_ON_CLOSE)
        {
            self.registry.mark_pending_delete(&file_name);
        }
        Ok(action)
    }

    /// Last user reference released; the kernel file object stays valid
    /// and may still receive I/O until CloseFile.
    pub(crate) fn cleanup(&self, file_name: &str, info: &mut FileInfo) -> OpResult {
        let file_name = path::normalize(file_name);
        if info.is_directory {
            if info.delete_on_close {
                self.fs.remove_dir(&file_name)?;
                self.registry.clear_pending_delete(&file_name);
            }
            return Ok(STATUS_SUCCESS);
        }

        let open = self.registry.get(info.context)?;
        {
            let mut file = open.lock();
            file.close()?;
        }
        if info.delete_on_close {
            self.fs.remove(&file_name)?;
            self.registry.clear_pending_delete(&file_name);
            self.registry.unregister(info.context);
            info.context = 0;
        }
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn close_file(&self, _file_name: &str, info: &mut FileInfo) -> OpResult {
        if info.context >= MIN_HANDLE {
            let open = self.registry.get(info.context)?;
            {
                let mut file = open.lock();
                if !file.closed() {
                    file.close()?;
                }
            }
            self.registry.unregister(info.context);
            info.context = 0;
        }
        Ok(STATUS_SUCCESS)
    }
}
