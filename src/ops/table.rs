//! Binds a dispatcher into the driver's callback table.
//!
//! Every entry funnels through [`FsOperations::guarded`], so the timeout
//! watcher stays armed for the whole call and backend errors become NT
//! statuses at this boundary and nowhere else.

use std::sync::Arc;

use crate::driver::{CreateRequest, FileInfo, FileInformation, FindData, Operations};
use crate::time::FileTime;

use super::FsOperations;

impl Operations {
    /// Build the callback table over a shared dispatcher.
    pub fn bind(ops: Arc<FsOperations>) -> Operations {
        Operations {
            zw_create_file: {
                let ops = ops.clone();
                Box::new(move |path: &str, request: &CreateRequest, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.zw_create_file(path, request, info))
                })
            },
            cleanup: {
                let ops = ops.clone();
                Box::new(move |path: &str, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.cleanup(path, info))
                })
            },
            close_file: {
                let ops = ops.clone();
                Box::new(move |path: &str, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.close_file(path, info))
                })
            },
            read_file: {
                let ops = ops.clone();
                Box::new(
                    move |path: &str,
                          buffer: &mut [u8],
                          read_length: &mut u32,
                          offset: i64,
                          info: &mut FileInfo| {
                        ops.guarded(info.request, || {
                            ops.read_file(path, buffer, read_length, offset, info)
                        })
                    },
                )
            },
            write_file: {
                let ops = ops.clone();
                Box::new(
                    move |path: &str,
                          data: &[u8],
                          bytes_written: &mut u32,
                          offset: i64,
                          info: &mut FileInfo| {
                        ops.guarded(info.request, || {
                            ops.write_file(path, data, bytes_written, offset, info)
                        })
                    },
                )
            },
            flush_file_buffers: {
                let ops = ops.clone();
                Box::new(move |path: &str, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.flush_file_buffers(path, info))
                })
            },
            get_file_information: {
                let ops = ops.clone();
                Box::new(move |path: &str, out: &mut FileInformation, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.get_file_information(path, out, info))
                })
            },
            find_files: {
                let ops = ops.clone();
                Box::new(move |path: &str, fill: &mut dyn FnMut(&FindData), info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.find_files(path, fill, info))
                })
            },
            find_files_with_pattern: {
                let ops = ops.clone();
                Box::new(
                    move |path: &str,
                          pattern: &str,
                          fill: &mut dyn FnMut(&FindData),
                          info: &mut FileInfo| {
                        ops.guarded(info.request, || {
                            ops.find_files_with_pattern(path, pattern, fill, info)
                        })
                    },
                )
            },
            set_file_attributes: {
                let ops = ops.clone();
                Box::new(move |path: &str, attributes: u32, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.set_file_attributes(path, attributes, info))
                })
            },
            set_file_time: {
                let ops = ops.clone();
                Box::new(
                    move |path: &str,
                          creation: Option<FileTime>,
                          access: Option<FileTime>,
                          write: Option<FileTime>,
                          info: &mut FileInfo| {
                        ops.guarded(info.request, || {
                            ops.set_file_time(path, creation, access, write, info)
                        })
                    },
                )
            },
            delete_file: {
                let ops = ops.clone();
                Box::new(move |path: &str, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.delete_file(path, info))
                })
            },
            delete_directory: {
                let ops = ops.clone();
                Box::new(move |path: &str, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.delete_directory(path, info))
                })
            },
            move_file: {
                let ops = ops.clone();
                Box::new(
                    move |path: &str, new_path: &str, replace: bool, info: &mut FileInfo| {
                        ops.guarded(info.request, || {
                            ops.move_file(path, new_path, replace, info)
                        })
                    },
                )
            },
            set_end_of_file: {
                let ops = ops.clone();
                Box::new(move |path: &str, offset: i64, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.set_end_of_file(path, offset, info))
                })
            },
            set_allocation_size: {
                let ops = ops.clone();
                Box::new(move |path: &str, length: i64, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.set_allocation_size(path, length, info))
                })
            },
            get_disk_free_space: {
                let ops = ops.clone();
                Box::new(
                    move |free: &mut u64, total: &mut u64, total_free: &mut u64, info: &mut FileInfo| {
                        ops.guarded(info.request, || {
                            ops.get_disk_free_space(free, total, total_free, info)
                        })
                    },
                )
            },
            get_volume_information: {
                let ops = ops.clone();
                Box::new(
                    move |volume_name: &mut [u16],
                          serial: &mut u32,
                          max_component: &mut u32,
                          fs_flags: &mut u32,
                          fs_name: &mut [u16],
                          info: &mut FileInfo| {
                        ops.guarded(info.request, || {
                            ops.get_volume_information(
                                volume_name,
                                serial,
                                max_component,
                                fs_flags,
                                fs_name,
                                info,
                            )
                        })
                    },
                )
            },
            mounted: {
                let ops = ops.clone();
                Box::new(move |info: &mut FileInfo| ops.guarded(info.request, || ops.mounted(info)))
            },
            unmounted: {
                let ops = ops.clone();
                Box::new(move |info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.unmounted(info))
                })
            },
            get_file_security: {
                let ops = ops.clone();
                Box::new(
                    move |path: &str,
                          security_information: u32,
                          descriptor: &mut [u8],
                          length_needed: &mut u32,
                          info: &mut FileInfo| {
                        ops.guarded(info.request, || {
                            ops.get_file_security(
                                path,
                                security_information,
                                descriptor,
                                length_needed,
                                info,
                            )
                        })
                    },
                )
            },
            set_file_security: {
                let ops = ops.clone();
                Box::new(
                    move |path: &str,
                          security_information: u32,
                          descriptor: &mut [u8],
                          length_needed: &mut u32,
                          info: &mut FileInfo| {
                        ops.guarded(info.request, || {
                            ops.set_file_security(
                                path,
                                security_information,
                                descriptor,
                                length_needed,
                                info,
                            )
                        })
                    },
                )
            },
            lock_file: {
                let ops = ops.clone();
                Box::new(move |path: &str, offset: i64, length: i64, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.lock_file(path, offset, length, info))
                })
            },
            unlock_file: {
                let ops = ops.clone();
                Box::new(move |path: &str, offset: i64, length: i64, info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.unlock_file(path, offset, length, info))
                })
            },
            find_streams: {
                let ops = ops.clone();
                Box::new(move |path: &str, fill: &mut dyn FnMut(&FindData), info: &mut FileInfo| {
                    ops.guarded(info.request, || ops.find_streams(path, fill, info))
                })
            },
        }
    }
}
