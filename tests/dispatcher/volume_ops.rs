use dokan_vfs::driver::FileInfo;
use dokan_vfs::status::{
    STATUS_BUFFER_OVERFLOW, STATUS_NOT_IMPLEMENTED, STATUS_SUCCESS,
};

use crate::common::Fixture;

fn decode_wide(buf: &[u16]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16(&buf[..end]).expect("well-formed UTF-16")
}

#[test]
fn test_disk_free_space() {
    let fixture = Fixture::new();
    let (mut free, mut total, mut total_free) = (0u64, 0u64, 0u64);
    let mut info = FileInfo::default();
    let status =
        (fixture.table.get_disk_free_space)(&mut free, &mut total, &mut total_free, &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(total_free, 100 * 1024 * 1024 * 1024);
    assert_eq!(total, 2 * total_free);
    assert_eq!(free, total_free);
}

#[test]
fn test_volume_information() {
    let fixture = Fixture::new();
    let mut name = [0u16; 32];
    let mut fs_name = [0u16; 32];
    let (mut serial, mut max_component, mut flags) = (u32::MAX, 0u32, 0u32);
    let mut info = FileInfo::default();
    let status = (fixture.table.get_volume_information)(
        &mut name,
        &mut serial,
        &mut max_component,
        &mut flags,
        &mut fs_name,
        &mut info,
    );
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(decode_wide(&name), "Dokan Volume");
    assert_eq!(decode_wide(&fs_name), "NTFS");
    assert_eq!(serial, 0);
    assert_eq!(max_component, 255);
    // CASE_SENSITIVE_SEARCH | CASE_PRESERVED_NAMES | UNICODE_ON_DISK
    // | PERSISTENT_ACLS | SUPPORTS_REMOTE_STORAGE
    assert_eq!(flags, 0x10f);
}

#[test]
fn test_volume_information_truncates_names() {
    let fixture = Fixture::new();
    let mut name = [0u16; 4];
    let mut fs_name = [0u16; 3];
    let (mut serial, mut max_component, mut flags) = (0u32, 0u32, 0u32);
    let mut info = FileInfo::default();
    let status = (fixture.table.get_volume_information)(
        &mut name,
        &mut serial,
        &mut max_component,
        &mut flags,
        &mut fs_name,
        &mut info,
    );
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(decode_wide(&name), "Dok");
    assert_eq!(decode_wide(&fs_name), "NT");
}

#[test]
fn test_directory_security_from_template() {
    let fixture = Fixture::new();
    let mut descriptor = vec![0u8; 256];
    let mut needed = 0u32;
    let mut info = FileInfo::default();
    let status = (fixture.table.get_file_security)(
        "\\TestDir",
        0x7,
        &mut descriptor,
        &mut needed,
        &mut info,
    );
    assert_eq!(status, STATUS_SUCCESS);
    let len = fixture.driver.descriptor.len();
    assert_eq!(needed as usize, len);
    assert_eq!(&descriptor[..len], fixture.driver.descriptor.as_slice());
}

#[test]
fn test_directory_security_small_buffer_overflows() {
    let fixture = Fixture::new();
    let mut descriptor = vec![0u8; 4];
    let mut needed = 0u32;
    let mut info = FileInfo::default();
    let status = (fixture.table.get_file_security)(
        "\\TestDir",
        0x7,
        &mut descriptor,
        &mut needed,
        &mut info,
    );
    assert_eq!(status, STATUS_BUFFER_OVERFLOW);
    assert_eq!(needed as usize, fixture.driver.descriptor.len());
}

#[test]
fn test_file_security_not_implemented() {
    let fixture = Fixture::new();
    let mut descriptor = vec![0u8; 256];
    let mut needed = 0u32;
    let mut info = FileInfo::default();
    let status = (fixture.table.get_file_security)(
        "\\test.txt",
        0x7,
        &mut descriptor,
        &mut needed,
        &mut info,
    );
    assert_eq!(status, STATUS_NOT_IMPLEMENTED);
}

#[test]
fn test_set_file_security_not_implemented() {
    let fixture = Fixture::new();
    let mut descriptor = vec![0u8; 16];
    let mut needed = 0u32;
    let mut info = FileInfo::default();
    let status = (fixture.table.set_file_security)(
        "\\test.txt",
        0x7,
        &mut descriptor,
        &mut needed,
        &mut info,
    );
    assert_eq!(status, STATUS_NOT_IMPLEMENTED);
}

#[test]
fn test_find_streams_not_implemented() {
    let fixture = Fixture::new();
    let mut info = FileInfo::default();
    let status = (fixture.table.find_streams)("\\test.txt", &mut |_| {}, &mut info);
    assert_eq!(status, STATUS_NOT_IMPLEMENTED);
}

#[test]
fn test_lifecycle_hooks() {
    let fixture = Fixture::new();
    let mut info = FileInfo::default();
    assert_eq!((fixture.table.mounted)(&mut info), STATUS_SUCCESS);
    assert_eq!((fixture.table.unmounted)(&mut info), STATUS_SUCCESS);
}
