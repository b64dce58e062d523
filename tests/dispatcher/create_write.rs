use dokan_vfs::driver::{CreateDisposition, FileInfo};
use dokan_vfs::registry::MIN_HANDLE;
use dokan_vfs::status::{
    ERROR_ALREADY_EXISTS, FILE_DOES_NOT_EXIST, FILE_OVERWRITTEN, STATUS_ACCESS_DENIED,
    STATUS_SUCCESS,
};

use crate::common::Fixture;

#[test]
fn test_create_and_read() {
    let fixture = Fixture::new();
    let (status, mut info) = fixture.open("\\test.txt", CreateDisposition::Open);
    assert_eq!(status, STATUS_SUCCESS);
    assert!(info.context >= MIN_HANDLE);

    let (status, data) = fixture.read("\\test.txt", &mut info, 0, 1024);
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(data.len(), 19);
    assert_eq!(data, b"This is a test file");

    let status = (fixture.table.close_file)("\\test.txt", &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(info.context, 0);
}

#[test]
fn test_create_collision_with_existing_file() {
    let fixture = Fixture::new();
    let (status, _info) = fixture.open("\\test.txt", CreateDisposition::Create);
    assert_eq!(status, ERROR_ALREADY_EXISTS);
}

#[test]
fn test_post_mount_creation_visible() {
    let fixture = Fixture::new();
    fixture.fs.create("/PostMountCreatedFile.txt").expect("create after mount");
    let names = fixture.list("\\");
    assert!(names.contains(&"PostMountCreatedFile.txt".to_owned()), "{names:?}");
}

#[test]
fn test_open_missing_file() {
    let fixture = Fixture::new();
    let (status, info) = fixture.open("\\nope.txt", CreateDisposition::Open);
    assert_eq!(status, FILE_DOES_NOT_EXIST);
    assert_eq!(info.context, 0);
}

#[test]
fn test_overwrite_missing_file() {
    let fixture = Fixture::new();
    let (status, _info) = fixture.open("\\nope.txt", CreateDisposition::Overwrite);
    assert_eq!(status, FILE_DOES_NOT_EXIST);
}

#[test]
fn test_overwrite_if_truncates_and_reports() {
    let fixture = Fixture::new();
    let (status, mut info) = fixture.open("\\test.txt", CreateDisposition::OverwriteIf);
    assert_eq!(status, FILE_OVERWRITTEN);
    assert!(info.context >= MIN_HANDLE);
    let (status, data) = fixture.read("\\test.txt", &mut info, 0, 64);
    assert_eq!(status, STATUS_SUCCESS);
    assert!(data.is_empty());
}

#[test]
fn test_supersede_truncates() {
    let fixture = Fixture::new();
    // FILE_SUPERSEDED shares the numeric value of success.
    let (status, mut info) = fixture.open("\\test.txt", CreateDisposition::Supersede);
    assert_eq!(status, STATUS_SUCCESS);
    let (_, data) = fixture.read("\\test.txt", &mut info, 0, 64);
    assert!(data.is_empty());
}

#[test]
fn test_zero_desired_access_on_file() {
    let fixture = Fixture::new();
    let mut request = Fixture::request(CreateDisposition::OverwriteIf);
    request.desired_access = dokan_vfs::driver::DesiredAccess::empty();
    let mut info = FileInfo::default();
    let status = (fixture.table.zw_create_file)("\\test.txt", &request, &mut info);
    assert_eq!(status, FILE_DOES_NOT_EXIST);
}

#[test]
fn test_handles_unique_across_opens() {
    let fixture = Fixture::new();
    let mut seen = Vec::new();
    for _ in 0..8 {
        let (status, info) = fixture.open("\\test.txt", CreateDisposition::Open);
        assert_eq!(status, STATUS_SUCCESS);
        assert!(info.context >= MIN_HANDLE);
        assert!(!seen.contains(&info.context));
        seen.push(info.context);
    }
}

#[test]
fn test_write_and_read_back() {
    let fixture = Fixture::empty();
    let (status, mut info) = fixture.open("\\out.bin", CreateDisposition::Create);
    assert_eq!(status, STATUS_SUCCESS);

    let (status, written) = fixture.write("\\out.bin", &mut info, 0, b"hello, volume");
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(written, 13);

    let (status, data) = fixture.read("\\out.bin", &mut info, 7, 1024);
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(data, b"volume");
}

#[test]
fn test_write_to_end_of_file_appends() {
    let fixture = Fixture::new();
    let (_, mut info) = fixture.open("\\test.txt", CreateDisposition::Open);
    info.write_to_end_of_file = true;
    let (status, _) = fixture.write("\\test.txt", &mut info, 0, b"!");
    assert_eq!(status, STATUS_SUCCESS);
    info.write_to_end_of_file = false;
    let (_, data) = fixture.read("\\test.txt", &mut info, 0, 64);
    assert_eq!(data, b"This is a test file!");
}

#[test]
fn test_read_after_cleanup_reopens_transparently() {
    let fixture = Fixture::new();
    let (_, mut info) = fixture.open("\\test.txt", CreateDisposition::Open);

    // Cleanup closes the stream, but the kernel may keep dispatching.
    let status = (fixture.table.cleanup)("\\test.txt", &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    assert!(info.context >= MIN_HANDLE);

    let (status, data) = fixture.read("\\test.txt", &mut info, 0, 1024);
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(data, b"This is a test file");

    let status = (fixture.table.close_file)("\\test.txt", &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(info.context, 0);
}

#[test]
fn test_stale_handle_is_access_denied() {
    let fixture = Fixture::new();
    let (_, mut info) = fixture.open("\\test.txt", CreateDisposition::Open);
    let handle = info.context;
    (fixture.table.close_file)("\\test.txt", &mut info);

    let mut stale = FileInfo { context: handle, ..FileInfo::default() };
    let (status, _) = fixture.read("\\test.txt", &mut stale, 0, 16);
    assert_eq!(status, STATUS_ACCESS_DENIED);
}

#[test]
fn test_pending_delete_blocks_open() {
    let fixture = Fixture::new();
    let (_, mut info) = fixture.open("\\test.txt", CreateDisposition::Open);
    let status = (fixture.table.delete_file)("\\test.txt", &mut info);
    assert_eq!(status, STATUS_SUCCESS);

    let (status, _) = fixture.open("\\test.txt", CreateDisposition::Open);
    assert_eq!(status, STATUS_ACCESS_DENIED);
}

#[test]
fn test_set_end_of_file_truncates() {
    let fixture = Fixture::new();
    let (_, mut info) = fixture.open("\\test.txt", CreateDisposition::Open);
    let status = (fixture.table.set_end_of_file)("\\test.txt", 4, &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    let (_, data) = fixture.read("\\test.txt", &mut info, 0, 64);
    assert_eq!(data, b"This");
}

#[test]
fn test_set_allocation_size_is_noop() {
    let fixture = Fixture::new();
    let (_, mut info) = fixture.open("\\test.txt", CreateDisposition::Open);
    let status = (fixture.table.set_allocation_size)("\\test.txt", 1 << 20, &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    let (_, data) = fixture.read("\\test.txt", &mut info, 0, 64);
    assert_eq!(data.len(), 19);
}

#[test]
fn test_flush_succeeds() {
    let fixture = Fixture::new();
    let (_, mut info) = fixture.open("\\test.txt", CreateDisposition::Open);
    let status = (fixture.table.flush_file_buffers)("\\test.txt", &mut info);
    assert_eq!(status, STATUS_SUCCESS);
}
