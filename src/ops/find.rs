//! Metadata queries and directory enumeration.

use super::{FsOperations, OpResult};
use crate::driver::{
    FileInfo, FileInformation, FindData, FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_NORMAL,
};
use crate::path;
use crate::status::STATUS_SUCCESS;
use crate::time;
use crate::vfs::ResourceInfo;

impl FsOperations {
    pub(crate) fn get_file_information(
        &self,
        file_name: &str,
        out: &mut FileInformation,
        info: &mut FileInfo,
    ) -> OpResult {
        let file_name = path::normalize(file_name);
        let res = self.fs.getinfo(&file_name)?;
        let data = self.find_data_for(&file_name, &res, Some(info));
        out.file_attributes = data.file_attributes;
        out.creation_time = data.creation_time;
        out.last_access_time = data.last_access_time;
        out.last_write_time = data.last_write_time;
        out.file_size_high = data.file_size_high;
        out.file_size_low = data.file_size_low;
        // A backend may buffer writes it has not observed yet; our own
        // high-water mark wins when it is larger.
        if let Some(written) = self.registry.written_size(&file_name) {
            let reported = (u64::from(out.file_size_high) << 32) | u64::from(out.file_size_low);
            if written > reported {
                out.file_size_high = (written >> 32) as u32;
                out.file_size_low = written as u32;
            }
        }
        out.number_of_links = 1;
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn find_files(
        &self,
        file_name: &str,
        fill: &mut dyn FnMut(&FindData),
        _info: &mut FileInfo,
    ) -> OpResult {
        let file_name = path::normalize(file_name);
        for (name, res) in self.fs.listdirinfo(&file_name)? {
            let child = path::combine(&file_name, &name);
            if self.registry.is_pending_delete(&child) {
                continue;
            }
            fill(&self.find_data_for(&child, &res, None));
        }
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn find_files_with_pattern(
        &self,
        file_name: &str,
        pattern: &str,
        fill: &mut dyn FnMut(&FindData),
        _info: &mut FileInfo,
    ) -> OpResult {
        let file_name = path::normalize(file_name);
        for name in self.fs.listdir(&file_name)? {
            let child = path::combine(&file_name, &name);
            let res = self.fs.getinfo(&child)?;
            if self.registry.is_pending_delete(&child) {
                continue;
            }
            if !self.driver.is_name_in_expression(pattern, &name, true) {
                continue;
            }
            fill(&self.find_data_for(&child, &res, None));
        }
        Ok(STATUS_SUCCESS)
    }

    fn attribute_mask(&self, file_name: &str, res: &ResourceInfo, info: Option<&FileInfo>) -> u32 {
        if res.is_dir() {
            return FILE_ATTRIBUTE_DIRECTORY;
        }
        if res.is_file() {
            return FILE_ATTRIBUTE_NORMAL;
        }
        // Mode bits absent: fall back to the caller's view, then ours.
        if let Some(info) = info {
            return if info.is_directory { FILE_ATTRIBUTE_DIRECTORY } else { FILE_ATTRIBUTE_NORMAL };
        }
        if self.fs.isdir(file_name) {
            FILE_ATTRIBUTE_DIRECTORY
        } else {
            FILE_ATTRIBUTE_NORMAL
        }
    }

    fn find_data_for(
        &self,
        file_name: &str,
        res: &ResourceInfo,
        info: Option<&FileInfo>,
    ) -> FindData {
        FindData {
            file_attributes: self.attribute_mask(file_name, res, info),
            creation_time: time::system_to_filetime(res.created),
            last_access_time: time::system_to_filetime(res.accessed),
            last_write_time: time::system_to_filetime(res.modified),
            file_size_high: (res.size >> 32) as u32,
            file_size_low: res.size as u32,
            file_name: path::basename(file_name).to_owned(),
            alternate_file_name: String::new(),
        }
    }
}
