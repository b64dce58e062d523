//! Deletion and renaming.

use tracing::debug;

use super::{FsOperations, OpResult};
use crate::driver::FileInfo;
use crate::path;
use crate::registry::MIN_HANDLE;
use crate::status::{
    STATUS_ACCESS_DENIED, STATUS_DIRECTORY_NOT_EMPTY, STATUS_OBJECT_NAME_NOT_FOUND,
    STATUS_SUCCESS,
};

impl FsOperations {
    pub(crate) fn delete_file(&self, file_name: &str, _info: &mut FileInfo) -> OpResult {
        let file_name = path::normalize(file_name);
        if !self.fs.isfile(&file_name) {
            return Ok(if !self.fs.exists(&file_name) {
                STATUS_ACCESS_DENIED
            } else {
                STATUS_OBJECT_NAME_NOT_FOUND
            });
        }
        // The actual removal happens at cleanup.
        self.registry.mark_pending_delete(&file_name);
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn delete_directory(&self, file_name: &str, _info: &mut FileInfo) -> OpResult {
        let file_name = path::normalize(file_name);
        for name in self.fs.listdir(&file_name)? {
            if !self.registry.is_pending_delete(&path::combine(&file_name, &name)) {
                return Ok(STATUS_DIRECTORY_NOT_EMPTY);
            }
        }
        self.registry.mark_pending_delete(&file_name);
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn move_file(
        &self,
        file_name: &str,
        new_file_name: &str,
        _replace_if_existing: bool,
        info: &mut FileInfo,
    ) -> OpResult {
        // An open handle would pin the source; close and drop it first.
        if info.context >= MIN_HANDLE {
            let open = self.registry.get(info.context)?;
            {
                let mut file = open.lock();
                if !file.closed() {
                    file.close()?;
                }
            }
            self.registry.unregister(info.context);
        }
        let file_name = path::normalize(file_name);
        let new_file_name = path::normalize(new_file_name);
        debug!(from = %file_name, to = %new_file_name, "move");
        if info.is_directory {
            self.fs.move_dir(&file_name, &new_file_name, true)?;
        } else {
            self.fs.move_file(&file_name, &new_file_name, true)?;
        }
        Ok(STATUS_SUCCESS)
    }
}
