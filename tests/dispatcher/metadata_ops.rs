use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dokan_vfs::driver::{
    FileInfo, FileInformation, FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_NORMAL,
};
use dokan_vfs::status::STATUS_SUCCESS;
use dokan_vfs::time::{filetime_to_system, system_to_filetime, FileTime};
use dokan_vfs::vfs::Vfs;

use crate::common::Fixture;

fn stat(fixture: &Fixture, path: &str) -> (u32, FileInformation) {
    let mut out = FileInformation::default();
    let mut info = FileInfo::default();
    let status = (fixture.table.get_file_information)(path, &mut out, &mut info);
    (status, out)
}

#[test]
fn test_file_information() {
    let fixture = Fixture::new();
    let (status, out) = stat(&fixture, "\\test.txt");
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(out.file_attributes, FILE_ATTRIBUTE_NORMAL);
    assert_eq!(out.file_size_low, 19);
    assert_eq!(out.file_size_high, 0);
    assert_eq!(out.number_of_links, 1);
    assert!(!out.last_write_time.is_zero());
}

#[test]
fn test_directory_information() {
    let fixture = Fixture::new();
    let (status, out) = stat(&fixture, "\\TestDir");
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(out.file_attributes, FILE_ATTRIBUTE_DIRECTORY);
    assert_eq!(out.file_size_low, 0);
    assert_eq!(out.number_of_links, 1);
}

#[test]
fn test_missing_path_information() {
    let fixture = Fixture::new();
    let (status, _) = stat(&fixture, "\\ghost.txt");
    // NotFound passes through as its raw errno.
    assert_eq!(status, 2);
}

#[test]
fn test_set_file_attributes_accepted() {
    let fixture = Fixture::new();
    let mut info = FileInfo::default();
    let status = (fixture.table.set_file_attributes)("\\test.txt", 0x27, &mut info);
    assert_eq!(status, STATUS_SUCCESS);
}

#[test]
fn test_set_file_time_updates_backend() {
    let fixture = Fixture::new();
    let stamp = UNIX_EPOCH + Duration::from_secs(1_234_567_890);
    let mut info = FileInfo::default();
    let status = (fixture.table.set_file_time)(
        "\\test.txt",
        None,
        Some(system_to_filetime(Some(stamp))),
        Some(system_to_filetime(Some(stamp))),
        &mut info,
    );
    assert_eq!(status, STATUS_SUCCESS);

    let res = fixture.fs.getinfo("/test.txt").expect("stat seeded file");
    assert_eq!(res.accessed, Some(stamp));
    assert_eq!(res.modified, Some(stamp));
}

#[test]
fn test_set_file_time_zero_sentinel_leaves_times() {
    let fixture = Fixture::new();
    let before = fixture.fs.getinfo("/test.txt").expect("stat seeded file");
    let mut info = FileInfo::default();
    let status = (fixture.table.set_file_time)(
        "\\test.txt",
        None,
        Some(FileTime::ZERO),
        Some(FileTime::ZERO),
        &mut info,
    );
    assert_eq!(status, STATUS_SUCCESS);
    let after = fixture.fs.getinfo("/test.txt").expect("stat seeded file");
    assert_eq!(after.modified, before.modified);
}

#[test]
fn test_set_file_time_round_trips_through_find_data() {
    let fixture = Fixture::new();
    let stamp = UNIX_EPOCH + Duration::from_secs(946_684_800);
    let mut info = FileInfo::default();
    (fixture.table.set_file_time)(
        "\\test.txt",
        None,
        None,
        Some(system_to_filetime(Some(stamp))),
        &mut info,
    );
    let (_, out) = stat(&fixture, "\\test.txt");
    assert_eq!(filetime_to_system(out.last_write_time), Some(stamp));
}

#[test]
fn test_creation_time_argument_is_ignored() {
    let fixture = Fixture::new();
    let before = fixture.fs.getinfo("/test.txt").expect("stat seeded file");
    let forged = system_to_filetime(Some(SystemTime::now()));
    let mut info = FileInfo::default();
    let status =
        (fixture.table.set_file_time)("\\test.txt", Some(forged), None, None, &mut info);
    assert_eq!(status, STATUS_SUCCESS);
    let after = fixture.fs.getinfo("/test.txt").expect("stat seeded file");
    assert_eq!(after.created, before.created);
}
