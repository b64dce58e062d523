//! Stream I/O: read, write, flush and size changes.

use std::io::SeekFrom;

use super::{FsOperations, OpResult};
use crate::driver::FileInfo;
use crate::path;
use crate::registry::OpenFile;
use crate::status::{STATUS_LOCK_NOT_GRANTED, STATUS_SUCCESS};
use crate::vfs::{FsError, VfsFile};

impl FsOperations {
    pub(crate) fn read_file(
        &self,
        file_name: &str,
        buffer: &mut [u8],
        read_length: &mut u32,
        offset: i64,
        info: &mut FileInfo,
    ) -> OpResult {
        let file_name = path::normalize(file_name);
        let open = self.registry.get(info.context)?;
        if self.registry.lock_conflicts(
            &file_name,
            offset as u64,
            buffer.len() as u64,
            Some(info.context),
        ) {
            return Ok(STATUS_LOCK_NOT_GRANTED);
        }

        let mut file = open.lock();
        self.reopen_if_closed(&file_name, &open, &mut file)?;
        file.seek(SeekFrom::Start(offset as u64))?;
        let mut total = 0;
        while total < buffer.len() {
            let n = file.read(&mut buffer[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }
        *read_length = total as u32;
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn write_file(
        &self,
        file_name: &str,
        data: &[u8],
        bytes_written: &mut u32,
        offset: i64,
        info: &mut FileInfo,
    ) -> OpResult {
        let file_name = path::normalize(file_name);
        let handle = info.context;
        let open = self.registry.get(handle)?;
        if self.registry.lock_conflicts(&file_name, offset as u64, data.len() as u64, Some(handle))
        {
            return Ok(STATUS_LOCK_NOT_GRANTED);
        }

        {
            let mut file = open.lock();
            self.reopen_if_closed(&file_name, &open, &mut file)?;
            if info.write_to_end_of_file {
                file.seek(SeekFrom::End(0))?;
            } else {
                file.seek(SeekFrom::Start(offset as u64))?;
            }
            let mut written = 0;
            while written < data.len() {
                let n = file.write(&data[written..])?;
                if n == 0 {
                    return Err(FsError::NoSpace);
                }
                written += n;
            }
            *bytes_written = data.len() as u32;
        }
        self.registry
            .record_written(&file_name, handle, offset as u64 + u64::from(*bytes_written));
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn flush_file_buffers(&self, _file_name: &str, info: &mut FileInfo) -> OpResult {
        let open = self.registry.get(info.context)?;
        open.lock().flush()?;
        Ok(STATUS_SUCCESS)
    }

    pub(crate) fn set_end_of_file(
        &self,
        _file_name: &str,
        offset: i64,
        info: &mut FileInfo,
    ) -> OpResult {
        let new_size = offset as u64;
        let open = self.registry.get(info.context)?;
        let mut file = open.lock();
        let pos = file.tell();
        if new_size != pos {
            file.seek(SeekFrom::Start(new_size))?;
        }
        file.truncate()?;
        if pos < new_size {
            file.seek(SeekFrom::Start(pos.min(new_size)))?;
        }
        Ok(STATUS_SUCCESS)
    }

    /// Space reservation has no backend equivalent; report success.
    pub(crate) fn set_allocation_size(
        &self,
        _file_name: &str,
        _length: i64,
        _info: &mut FileInfo,
    ) -> OpResult {
        Ok(STATUS_SUCCESS)
    }

    /// The host can dispatch I/O after the cleanup phase closed the
    /// stream; reopen it with the recorded mode and swap it in.
    fn reopen_if_closed(
        &self,
        file_name: &str,
        open: &OpenFile,
        file: &mut Box<dyn VfsFile>,
    ) -> Result<(), FsError> {
        if file.closed() {
            let fresh = self.fs.open(file_name, open.mode())?;
            OpenFile::rebind(file, fresh);
        }
        Ok(())
    }
}
