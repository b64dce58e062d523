use std::thread;

use dokan_vfs::driver::{CreateDisposition, FileInfo};
use dokan_vfs::status::STATUS_SUCCESS;

use crate::common::Fixture;

const BLOCK: usize = 64;
const ROUNDS: usize = 50;

/// Two threads hammering one handle never interleave within a write:
/// the file ends up as whole blocks in some order.
#[test]
fn test_writes_on_one_handle_serialize() {
    let fixture = Fixture::empty();
    let (status, info) = fixture.open("\\log.bin", CreateDisposition::Create);
    assert_eq!(status, STATUS_SUCCESS);
    let handle = info.context;

    thread::scope(|scope| {
        for fill in [b'A', b'B'] {
            let fixture = &fixture;
            scope.spawn(move || {
                let block = [fill; BLOCK];
                let mut info = FileInfo {
                    context: handle,
                    write_to_end_of_file: true,
                    ..FileInfo::default()
                };
                for _ in 0..ROUNDS {
                    let (status, written) = fixture.write("\\log.bin", &mut info, 0, &block);
                    assert_eq!(status, STATUS_SUCCESS);
                    assert_eq!(written as usize, BLOCK);
                }
            });
        }
    });

    let mut info = FileInfo { context: handle, ..FileInfo::default() };
    let (status, data) = fixture.read("\\log.bin", &mut info, 0, 2 * ROUNDS * BLOCK + 1);
    assert_eq!(status, STATUS_SUCCESS);
    assert_eq!(data.len(), 2 * ROUNDS * BLOCK);

    let (mut a_blocks, mut b_blocks) = (0, 0);
    for chunk in data.chunks(BLOCK) {
        assert!(
            chunk.iter().all(|&b| b == chunk[0]),
            "interleaved write detected: {:?}",
            &chunk[..8]
        );
        match chunk[0] {
            b'A' => a_blocks += 1,
            b'B' => b_blocks += 1,
            other => panic!("unexpected fill byte {other}"),
        }
    }
    assert_eq!(a_blocks, ROUNDS);
    assert_eq!(b_blocks, ROUNDS);
}

/// Operations on different handles proceed independently.
#[test]
fn test_distinct_handles_run_in_parallel() {
    let fixture = Fixture::empty();
    fixture.fs.create("/left.bin").expect("seed left");
    fixture.fs.create("/right.bin").expect("seed right");

    thread::scope(|scope| {
        for name in ["\\left.bin", "\\right.bin"] {
            let fixture = &fixture;
            scope.spawn(move || {
                let (status, mut info) = fixture.open(name, CreateDisposition::Open);
                assert_eq!(status, STATUS_SUCCESS);
                for round in 0..20 {
                    let payload = vec![round as u8; 128];
                    let (status, _) =
                        fixture.write(name, &mut info, i64::from(round) * 128, &payload);
                    assert_eq!(status, STATUS_SUCCESS);
                }
                let (status, data) = fixture.read(name, &mut info, 0, 20 * 128);
                assert_eq!(status, STATUS_SUCCESS);
                assert_eq!(data.len(), 20 * 128);
            });
        }
    });
}
