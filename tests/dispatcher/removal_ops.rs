use dokan_vfs::driver::{CreateDisposition, CreateOptions, FileInfo};
use dokan_vfs::status::{
    STATUS_ACCESS_DENIED, STATUS_DIRECTORY_NOT_EMPTY, STATUS_OBJECT_NAME_NOT_FOUND,
    STATUS_SUCCESS,
};
use dokan_vfs::vfs::Vfs;

use crate::common::Fixture;

#[test]
fn test_delete_missing_path() {
    let fixture = Fixture::new();
    let mut info = FileInfo::default();
    let status = (fixture.table.delete_file)("\\ghost.txt", &mut info);
    assert_eq!(status, STATUS_ACCESS_DENIED);
}

#[test]
fn test_delete_file_on_directory() {
    let fixture = Fixture::new();
    let mut info = FileInfo::default();
    let status = (fixture.table.delete_file)("\\TestDir", &mut info);
    assert_eq!(status, STATUS_OBJECT_NAME_NOT_FOUND);
}

#[test]
fn test_delete_defers_removal_to_cleanup() {
    let fixture = Fixture::new();
    let (_, mut info) = fixture.open("\\test.txt", CreateDisposition::Open);

    let status = (fixture.table.delete_file)("\\test.txt", &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    // Still present until the final cleanup.
    assert!(fixture.fs.exists("/test.txt"));

    info.delete_on_close = true;
    let status = (fixture.table.cleanup)("\\test.txt", &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(info.context, 0);
    assert!(!fixture.fs.exists("/test.txt"));
}

#[test]
fn test_delete_on_close_full_cycle() {
    let fixture = Fixture::empty();
    let mut request = Fixture::request(CreateDisposition::Create);
    request.create_options = CreateOptions::DELETE_ON_CLOSE;
    let mut info = FileInfo::default();
    let status = (fixture.table.zw_create_file)("\\scratch.tmp", &request, &mut info);
    assert_eq!(status, STATUS_SUCCESS);

    let (status, _) = fixture.write("\\scratch.tmp", &mut info, 0, b"temporary bytes");
    assert_eq!(status, STATUS_SUCCESS);

    info.delete_on_close = true;
    let status = (fixture.table.cleanup)("\\scratch.tmp", &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    let status = (fixture.table.close_file)("\\scratch.tmp", &mut info);
    assert_eq!(status, STATUS_SUCCESS);

    assert!(!fixture.fs.exists("/scratch.tmp"));
    // The pending-delete mark is gone: the name is reusable immediately.
    let (status, _) = fixture.open("\\scratch.tmp", CreateDisposition::Create);
    assert_eq!(status, STATUS_SUCCESS);
}

#[test]
fn test_delete_directory_nonempty() {
    let fixture = Fixture::new();
    let mut info = FileInfo::default();
    let status = (fixture.table.delete_directory)("\\TestDir", &mut info);
    assert_eq!(status, STATUS_DIRECTORY_NOT_EMPTY);
}

#[test]
fn test_delete_directory_with_doomed_children() {
    let fixture = Fixture::new();
    let (_, mut child_info) = fixture.open("\\TestDir\\subtest.txt", CreateDisposition::Open);
    let status = (fixture.table.delete_file)("\\TestDir\\subtest.txt", &mut child_info);
    assert_eq!(status, STATUS_SUCCESS);

    // Every surviving child is pending delete, so the directory may go.
    let mut dir_info = FileInfo { is_directory: true, ..FileInfo::default() };
    let status = (fixture.table.delete_directory)("\\TestDir", &mut dir_info);
    assert_eq!(status, STATUS_SUCCESS);

    // The host releases the child first, then the directory.
    child_info.delete_on_close = true;
    let status = (fixture.table.cleanup)("\\TestDir\\subtest.txt", &mut child_info);
    assert_eq!(status, STATUS_SUCCESS);

    dir_info.delete_on_close = true;
    let status = (fixture.table.cleanup)("\\TestDir", &mut dir_info);
    assert_eq!(status, STATUS_SUCCESS);
    assert!(!fixture.fs.exists("/TestDir"));
}

#[test]
fn test_cleanup_directory_without_delete() {
    let fixture = Fixture::new();
    let mut info = FileInfo { is_directory: true, ..FileInfo::default() };
    let status = (fixture.table.cleanup)("\\TestDir", &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    assert!(fixture.fs.isdir("/TestDir"));
}

#[test]
fn test_delete_directory_then_recreate() {
    let fixture = Fixture::empty();
    fixture.fs.make_dir("/Short").expect("seed dir");
    let mut info = FileInfo { is_directory: true, ..FileInfo::default() };
    let status = (fixture.table.delete_directory)("\\Short", &mut info);
    assert_eq!(status, STATUS_SUCCESS);

    info.delete_on_close = true;
    let status = (fixture.table.cleanup)("\\Short", &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    assert!(!fixture.fs.exists("/Short"));
    assert!(fixture.fs.make_dir("/Short").expect("recreate"));
}
